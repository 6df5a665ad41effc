use anyhow::{Context, Result};

use pageport_lib::settings::{get_settings_path, normalize_base_url, save_settings};

use crate::app::App;
use crate::OutputFormat;

pub fn run(
    app: &App,
    site_url: Option<String>,
    timeout: Option<u64>,
    list_limit: Option<usize>,
    format: &OutputFormat,
) -> Result<()> {
    let mut settings = app.stored_settings.clone();
    let changed = site_url.is_some() || timeout.is_some() || list_limit.is_some();

    if let Some(url) = site_url {
        settings.site_url = normalize_base_url(&url);
    }
    if let Some(secs) = timeout {
        settings.fetch_timeout_secs = secs;
    }
    if let Some(limit) = list_limit {
        settings.list_limit = limit;
    }

    if changed {
        save_settings(&app.data_dir, &settings).context("Failed to save settings")?;
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&settings)?),
        OutputFormat::Plain => {
            if changed {
                println!("Saved {}", get_settings_path(&app.data_dir).display());
            }
            println!("  Site URL: {}", settings.site_url);
            println!("  Fetch timeout: {}s", settings.fetch_timeout_secs);
            println!("  List limit: {}", settings.list_limit);
        }
    }

    Ok(())
}
