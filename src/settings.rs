//! Transfer settings stored in `settings.json` inside the data directory

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::storage::Result;

/// Default bound on a single media download
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransferSettings {
    /// Public base URL of this deployment (e.g., "https://example.com/")
    pub site_url: String,
    /// Timeout for each remote media fetch, in seconds
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
    /// Number of pages shown when listing export candidates
    #[serde(default = "default_list_limit")]
    pub list_limit: usize,
}

fn default_fetch_timeout() -> u64 {
    DEFAULT_FETCH_TIMEOUT_SECS
}

fn default_list_limit() -> usize {
    20
}

impl Default for TransferSettings {
    fn default() -> Self {
        Self {
            site_url: "http://localhost/".to_string(),
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            list_limit: default_list_limit(),
        }
    }
}

impl TransferSettings {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs.max(1))
    }

    /// Site URL with a trailing slash
    pub fn base_url(&self) -> String {
        normalize_base_url(&self.site_url)
    }
}

/// Get the settings file path
pub fn get_settings_path(data_dir: &Path) -> PathBuf {
    data_dir.join("settings.json")
}

/// Load settings from file, falling back to defaults when it does not exist
pub fn load_settings(data_dir: &Path) -> Result<TransferSettings> {
    let settings_path = get_settings_path(data_dir);

    if !settings_path.exists() {
        return Ok(TransferSettings::default());
    }

    let content = fs::read_to_string(&settings_path)?;
    let settings: TransferSettings = serde_json::from_str(&content)?;
    Ok(settings)
}

/// Save settings to file
pub fn save_settings(data_dir: &Path, settings: &TransferSettings) -> Result<()> {
    fs::create_dir_all(data_dir)?;
    let content = serde_json::to_string_pretty(settings)?;
    fs::write(get_settings_path(data_dir), content)?;
    Ok(())
}

/// Ensure a base URL ends with exactly one trailing slash.
/// An empty input stays empty.
pub fn normalize_base_url(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{}/", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let settings = load_settings(temp.path()).unwrap();
        assert_eq!(settings, TransferSettings::default());
        assert_eq!(settings.fetch_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let settings = TransferSettings {
            site_url: "https://new.example.com".to_string(),
            fetch_timeout_secs: 5,
            list_limit: 50,
        };
        save_settings(temp.path(), &settings).unwrap();

        let loaded = load_settings(temp.path()).unwrap();
        assert_eq!(loaded, settings);
        assert_eq!(loaded.base_url(), "https://new.example.com/");
    }

    #[test]
    fn test_partial_file_uses_field_defaults() {
        let temp = TempDir::new().unwrap();
        fs::write(
            get_settings_path(temp.path()),
            r#"{"siteUrl": "https://a.test/"}"#,
        )
        .unwrap();

        let loaded = load_settings(temp.path()).unwrap();
        assert_eq!(loaded.fetch_timeout_secs, DEFAULT_FETCH_TIMEOUT_SECS);
        assert_eq!(loaded.list_limit, 20);
    }

    #[test]
    fn test_saved_keys_are_camel_case() {
        let temp = TempDir::new().unwrap();
        save_settings(temp.path(), &TransferSettings::default()).unwrap();

        let raw = fs::read_to_string(get_settings_path(temp.path())).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["siteUrl"], "http://localhost/");
        assert_eq!(value["fetchTimeoutSecs"], 30);
        assert_eq!(value["listLimit"], 20);
    }

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(normalize_base_url("https://a.test"), "https://a.test/");
        assert_eq!(normalize_base_url("https://a.test///"), "https://a.test/");
        assert_eq!(normalize_base_url(""), "");
    }
}
