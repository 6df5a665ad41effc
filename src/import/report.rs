use std::collections::BTreeMap;

use serde::Serialize;

use crate::storage::EntityKind;

/// Result of processing one package item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "lowercase")]
pub enum ItemOutcome {
    Skipped,
    Created,
    Updated,
    Failed(String),
}

/// A media URL that could not be brought over
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaError {
    pub url: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MediaReport {
    /// Number of files fetched and persisted
    pub downloaded: usize,
    /// Old URL to new URL for every persisted file
    pub uploaded: BTreeMap<String, String>,
    pub errors: Vec<MediaError>,
    /// URLs already under the target base, mapped to themselves
    pub reused: Vec<String>,
}

/// A page or block that could not be written
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityError {
    #[serde(rename = "type")]
    pub kind: EntityKind,
    pub slug: String,
    pub error: String,
}

/// Per-item outcome, in package order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemResult {
    pub slug: String,
    /// Target id, absent when the item failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(flatten)]
    pub outcome: ItemOutcome,
}

/// Created, updated and failed items of one kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EntityReport {
    pub created: Vec<String>,
    pub updated: Vec<String>,
    pub errors: Vec<EntityError>,
    pub items: Vec<ItemResult>,
}

impl EntityReport {
    pub fn record(&mut self, kind: EntityKind, slug: &str, id: Option<u64>, outcome: ItemOutcome) {
        match &outcome {
            ItemOutcome::Created => self.created.push(slug.to_string()),
            ItemOutcome::Updated => self.updated.push(slug.to_string()),
            ItemOutcome::Failed(error) => self.errors.push(EntityError {
                kind,
                slug: slug.to_string(),
                error: error.clone(),
            }),
            ItemOutcome::Skipped => {}
        }
        self.items.push(ItemResult {
            slug: slug.to_string(),
            id,
            outcome,
        });
    }
}

/// Everything an import run did
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub media: MediaReport,
    pub blocks: EntityReport,
    pub pages: EntityReport,
}

impl ImportReport {
    pub fn entities(&self, kind: EntityKind) -> &EntityReport {
        match kind {
            EntityKind::Page => &self.pages,
            EntityKind::Block => &self.blocks,
        }
    }

    pub fn error_count(&self) -> usize {
        self.media.errors.len() + self.blocks.errors.len() + self.pages.errors.len()
    }
}
