use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata attached to an entity: key to ordered list of raw values.
/// Repeated keys are represented by multi-element lists.
pub type Metadata = BTreeMap<String, Vec<serde_json::Value>>;

/// Statuses that may be selected for export and resolved as block references.
pub const EXPORTABLE_STATUSES: [&str; 4] = ["publish", "draft", "pending", "private"];

pub fn is_exportable_status(status: &str) -> bool {
    EXPORTABLE_STATUSES.contains(&status)
}

/// The two kinds of content entity that can be transferred
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    #[serde(rename = "page")]
    Page,
    #[serde(rename = "wp_block")]
    Block,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::Block => "wp_block",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored page or block
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub id: u64,
    pub kind: EntityKind,
    pub title: String,
    pub slug: String,
    pub status: String,
    pub content: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub parent: u64,
    #[serde(default)]
    pub menu_order: i64,
    #[serde(default)]
    pub meta: Metadata,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Field values written by `create` and `update`.
///
/// Metadata is not part of a draft; it is managed per key through
/// `delete_meta` / `add_meta` so that existing keys survive an update.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityDraft {
    pub kind: EntityKind,
    pub title: String,
    pub slug: String,
    pub status: String,
    pub content: String,
    pub excerpt: String,
    pub parent: u64,
    pub menu_order: i64,
}

impl EntityDraft {
    pub fn new(kind: EntityKind, title: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            slug: slug.into(),
            status: "draft".to_string(),
            content: String::new(),
            excerpt: String::new(),
            parent: 0,
            menu_order: 0,
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }
}

/// A persisted media file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: u64,
    /// Path relative to the uploads directory
    pub file: String,
    /// Canonical public URL
    pub url: String,
    /// URL the file was downloaded from, if it was sideloaded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A fetched resource waiting to be persisted or discarded
#[derive(Debug, Clone)]
pub struct TempResource {
    pub path: PathBuf,
    /// File name to persist under (basename of the source URL path)
    pub file_name: String,
    pub source_url: String,
}
