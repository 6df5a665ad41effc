use anyhow::{Context, Result};

use pageport_lib::package::{parse_package, PackageSummary};

use crate::app::App;
use crate::OutputFormat;

pub fn run(path: &str, format: &OutputFormat) -> Result<()> {
    let json = App::read_input(path)?;
    let package = parse_package(&json).with_context(|| format!("{} is not a valid package", path))?;
    let summary = PackageSummary::from_package(&package);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Plain => {
            println!("Package version {}", summary.version);
            if !summary.site_origin.is_empty() {
                println!("  Origin: {}", summary.site_origin);
            }
            if !summary.generated_at.is_empty() {
                println!("  Generated: {}", summary.generated_at);
            }
            println!("  Pages ({}): {}", summary.page_count, summary.page_slugs.join(", "));
            println!("  Blocks ({}): {}", summary.block_count, summary.block_slugs.join(", "));
            println!("  Media: {}", summary.media_count);
        }
    }

    Ok(())
}
