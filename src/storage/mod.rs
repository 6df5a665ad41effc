//! Storage collaborators
//!
//! The transfer engine only talks to storage through [`ContentStore`] and
//! [`MediaStore`]. [`FileStorage`] and [`FileMediaStore`] are the on-disk
//! implementations used by the CLI and by tests.

mod download;
mod file_storage;
mod media_store;
mod models;

use std::time::Duration;

pub use download::{Downloader, FetchError, HttpDownloader};
pub use file_storage::{FileStorage, Result, StorageError};
pub use media_store::FileMediaStore;
pub use models::*;

/// Access to pages and blocks in a deployment
pub trait ContentStore {
    fn get_by_id(&self, id: u64) -> Result<Option<Entity>>;

    /// Find an entity by its slug within one kind
    fn get_by_slug_and_kind(&self, slug: &str, kind: EntityKind) -> Result<Option<Entity>>;

    /// Fetch several entities of one kind at once. Ids that do not exist,
    /// belong to another kind or have a non-exportable status are left out.
    fn bulk_get_by_ids(&self, ids: &[u64], kind: EntityKind) -> Result<Vec<Entity>>;

    fn list_by_kind(&self, kind: EntityKind) -> Result<Vec<Entity>>;

    /// Create an entity and return its new id
    fn create(&self, draft: &EntityDraft) -> Result<u64>;

    /// Overwrite the fields of an existing entity, keeping its id and metadata
    fn update(&self, id: u64, draft: &EntityDraft) -> Result<()>;

    /// Remove every value stored under `key`
    fn delete_meta(&self, id: u64, key: &str) -> Result<()>;

    /// Append one value under `key`
    fn add_meta(&self, id: u64, key: &str, value: &serde_json::Value) -> Result<()>;
}

/// Access to the media library of a deployment
pub trait MediaStore {
    /// Download a remote file into a temporary resource.
    ///
    /// `timeout` bounds the whole request.
    fn fetch_remote(&self, url: &str, timeout: Duration) -> std::result::Result<TempResource, FetchError>;

    /// Move a temporary resource into the media library
    fn persist_temp_as_media(&self, temp: &TempResource) -> Result<Attachment>;

    /// Remove a temporary resource that will not be persisted
    fn discard_temp(&self, temp: &TempResource) -> Result<()>;

    /// Canonical URL of an attachment, `None` if the id is not an attachment
    fn resolve_attachment_url(&self, id: u64) -> Result<Option<String>>;
}
