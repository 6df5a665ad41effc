use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use pageport_lib::settings::{load_settings, normalize_base_url, TransferSettings};
use pageport_lib::storage::{FileMediaStore, FileStorage, HttpDownloader};

/// Values given on the command line that take precedence over settings.json
#[derive(Debug, Default)]
pub struct Overrides {
    pub data_dir: Option<PathBuf>,
    pub site_url: Option<String>,
    pub timeout: Option<u64>,
}

/// Shared application state for CLI commands
pub struct App {
    pub data_dir: PathBuf,
    /// Settings as stored on disk
    pub stored_settings: TransferSettings,
    /// Settings with command line overrides applied
    pub settings: TransferSettings,
    pub content: FileStorage,
    pub media: FileMediaStore,
}

impl App {
    pub fn new(overrides: Overrides) -> Result<Self> {
        let data_dir = match overrides.data_dir {
            Some(dir) => dir,
            None => FileStorage::default_data_dir().context("Failed to get data directory")?,
        };

        let stored_settings = load_settings(&data_dir)
            .with_context(|| format!("Failed to load settings from {}", data_dir.display()))?;

        let mut settings = stored_settings.clone();
        if let Some(url) = overrides.site_url {
            settings.site_url = url;
        }
        if let Some(secs) = overrides.timeout {
            settings.fetch_timeout_secs = secs;
        }
        settings.site_url = normalize_base_url(&settings.site_url);

        let content = FileStorage::new(data_dir.clone());
        content.init().context("Failed to initialize storage")?;

        let downloader = HttpDownloader::new().context("Failed to create HTTP client")?;
        let media = FileMediaStore::new(data_dir.clone(), &settings.site_url, Arc::new(downloader));

        log::debug!("Using data directory {}", data_dir.display());

        Ok(Self {
            data_dir,
            stored_settings,
            settings,
            content,
            media,
        })
    }

    /// Read a package document from a file, or stdin for "-"
    pub fn read_input(path: &str) -> Result<String> {
        if path == "-" {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read package from stdin")?;
            return Ok(buf);
        }
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))
    }
}
