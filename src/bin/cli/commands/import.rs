use anyhow::{Context, Result};

use pageport_lib::import::Importer;

use crate::app::App;
use crate::render::terminal;
use crate::OutputFormat;

pub fn run(app: &App, path: &str, format: &OutputFormat, use_color: bool) -> Result<()> {
    let json = App::read_input(path)?;

    let importer = Importer::new(&app.content, &app.media, &app.settings.site_url)
        .with_fetch_timeout(app.settings.fetch_timeout());
    let report = importer.import_json(&json).context("Import failed")?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Plain => println!("{}", terminal::render_report(&report, use_color)),
    }

    Ok(())
}
