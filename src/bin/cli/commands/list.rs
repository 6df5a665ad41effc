use anyhow::{Context, Result};

use pageport_lib::export::list_exportable_pages;

use crate::app::App;
use crate::render::terminal::{paint, Color};
use crate::OutputFormat;

pub fn run(app: &App, limit: Option<usize>, format: &OutputFormat, use_color: bool) -> Result<()> {
    let limit = limit.unwrap_or(app.settings.list_limit);
    let pages = list_exportable_pages(&app.content, limit).context("Failed to list pages")?;

    match format {
        OutputFormat::Json => {
            let output: Vec<_> = pages
                .iter()
                .map(|p| {
                    serde_json::json!({
                        "id": p.id,
                        "title": p.title,
                        "slug": p.slug,
                        "status": p.status,
                        "updatedAt": p.updated_at.to_rfc3339(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if pages.is_empty() {
                println!("(no exportable pages)");
            }
            for page in &pages {
                println!(
                    "{:>6}  {}  {}",
                    page.id,
                    page.title,
                    paint(&format!("/{} [{}]", page.slug, page.status), Color::DIM, use_color)
                );
            }
        }
    }

    Ok(())
}
