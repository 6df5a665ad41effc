//! Transfer package format
//!
//! A package is one JSON document holding the selected pages, the blocks
//! they reference and the media URLs both embed. Field names follow the
//! established wire format (`wp_blocks`, `post_name`, ...).

mod models;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ValidationError;

pub use models::{EntityRecord, Package};

/// Format version written by this crate
pub const PACKAGE_VERSION: &str = "1.0.0";

/// Parse and structurally validate a package document.
///
/// The document must be a JSON object with a non-empty string `version`.
pub fn parse_package(json: &str) -> Result<Package, ValidationError> {
    let value: Value =
        serde_json::from_str(json).map_err(|e| ValidationError::Malformed(e.to_string()))?;

    let object = value
        .as_object()
        .ok_or_else(|| ValidationError::Malformed("package must be a JSON object".to_string()))?;

    match object.get("version") {
        Some(Value::String(version)) if !version.trim().is_empty() => {}
        _ => return Err(ValidationError::MissingVersion),
    }

    serde_json::from_value(value).map_err(|e| ValidationError::Malformed(e.to_string()))
}

/// Serialize a package for download
pub fn package_to_json(package: &Package) -> serde_json::Result<String> {
    serde_json::to_string_pretty(package)
}

/// Default download name for a package generated at `now`
pub fn export_filename(now: DateTime<Utc>) -> String {
    format!("export-{}.json", now.format("%Y%m%d-%H%M%S"))
}

/// Counts shown when inspecting a package
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PackageSummary {
    pub version: String,
    pub site_origin: String,
    pub generated_at: String,
    pub page_count: usize,
    pub block_count: usize,
    pub media_count: usize,
    /// Slugs of the pages, in package order
    pub page_slugs: Vec<String>,
    /// Slugs of the blocks, in package order
    pub block_slugs: Vec<String>,
}

impl PackageSummary {
    pub fn from_package(package: &Package) -> Self {
        Self {
            version: package.version.clone(),
            site_origin: package.site_origin.clone(),
            generated_at: package.generated_at.clone(),
            page_count: package.pages.len(),
            block_count: package.blocks.len(),
            media_count: package.media.len(),
            page_slugs: package.pages.iter().map(|r| r.slug.clone()).collect(),
            block_slugs: package.blocks.iter().map(|r| r.slug.clone()).collect(),
        }
    }
}
