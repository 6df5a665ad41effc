use std::fs;

use anyhow::{Context, Result};
use chrono::Utc;

use pageport_lib::export::ExportBuilder;
use pageport_lib::package::{export_filename, package_to_json};

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, ids: &[u64], output: Option<&str>, format: &OutputFormat) -> Result<()> {
    let builder = ExportBuilder::new(&app.content, &app.media, &app.settings.site_url);
    let package = builder.build_export(ids).context("Export failed")?;
    let json = package_to_json(&package)?;

    if output == Some("-") {
        println!("{}", json);
        return Ok(());
    }

    let path = output
        .map(|p| p.to_string())
        .unwrap_or_else(|| export_filename(Utc::now()));
    fs::write(&path, &json).with_context(|| format!("Failed to write {}", path))?;

    match format {
        OutputFormat::Json => {
            let summary = serde_json::json!({
                "path": path,
                "pages": package.pages.len(),
                "blocks": package.blocks.len(),
                "media": package.media.len(),
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        OutputFormat::Plain => {
            println!(
                "Exported {} pages, {} blocks and {} media URLs to {}",
                package.pages.len(),
                package.blocks.len(),
                package.media.len(),
                path
            );
        }
    }

    Ok(())
}
