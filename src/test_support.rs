//! Shared fixtures for unit tests

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tempfile::TempDir;

use crate::storage::{
    ContentStore, Downloader, Entity, EntityDraft, EntityKind, FetchError, FileMediaStore,
    FileStorage, Result, StorageError,
};

/// Downloader answering from a fixed URL → bytes table; anything else is a 404.
/// Every request is recorded.
#[derive(Default)]
pub struct StubDownloader {
    responses: HashMap<String, Vec<u8>>,
    requests: Mutex<Vec<String>>,
}

impl StubDownloader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: &str, bytes: &[u8]) -> Self {
        self.responses.insert(url.to_string(), bytes.to_vec());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl Downloader for StubDownloader {
    fn download(&self, url: &str, _timeout: Duration) -> std::result::Result<Vec<u8>, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());
        self.responses
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Status {
                url: url.to_string(),
                status: 404,
            })
    }
}

/// Content store that rejects writes for chosen slugs
pub struct FlakyStore {
    pub inner: FileStorage,
    pub reject_slugs: HashSet<String>,
}

impl FlakyStore {
    pub fn new(inner: FileStorage, reject: &[&str]) -> Self {
        Self {
            inner,
            reject_slugs: reject.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn check(&self, draft: &EntityDraft) -> Result<()> {
        if self.reject_slugs.contains(&draft.slug) {
            return Err(StorageError::InvalidOperation(format!(
                "Could not write {}",
                draft.slug
            )));
        }
        Ok(())
    }
}

impl ContentStore for FlakyStore {
    fn get_by_id(&self, id: u64) -> Result<Option<Entity>> {
        self.inner.get_by_id(id)
    }

    fn get_by_slug_and_kind(&self, slug: &str, kind: EntityKind) -> Result<Option<Entity>> {
        self.inner.get_by_slug_and_kind(slug, kind)
    }

    fn bulk_get_by_ids(&self, ids: &[u64], kind: EntityKind) -> Result<Vec<Entity>> {
        self.inner.bulk_get_by_ids(ids, kind)
    }

    fn list_by_kind(&self, kind: EntityKind) -> Result<Vec<Entity>> {
        self.inner.list_by_kind(kind)
    }

    fn create(&self, draft: &EntityDraft) -> Result<u64> {
        self.check(draft)?;
        self.inner.create(draft)
    }

    fn update(&self, id: u64, draft: &EntityDraft) -> Result<()> {
        self.check(draft)?;
        self.inner.update(id, draft)
    }

    fn delete_meta(&self, id: u64, key: &str) -> Result<()> {
        self.inner.delete_meta(id, key)
    }

    fn add_meta(&self, id: u64, key: &str, value: &serde_json::Value) -> Result<()> {
        self.inner.add_meta(id, key, value)
    }
}

/// A content store and media store sharing one temporary data directory
pub struct Site {
    pub url: String,
    pub content: FileStorage,
    pub media: FileMediaStore,
    pub downloader: Arc<StubDownloader>,
    _dir: TempDir,
}

impl Site {
    pub fn new(url: &str, downloader: StubDownloader) -> Self {
        let dir = TempDir::new().unwrap();
        let content = FileStorage::new(dir.path().to_path_buf());
        content.init().unwrap();
        let downloader = Arc::new(downloader);
        let media = FileMediaStore::new(dir.path().to_path_buf(), url, downloader.clone());
        Self {
            url: url.to_string(),
            content,
            media,
            downloader,
            _dir: dir,
        }
    }

    pub fn add(&self, kind: EntityKind, title: &str, slug: &str, content: &str) -> u64 {
        self.content
            .create(
                &EntityDraft::new(kind, title, slug)
                    .with_content(content)
                    .with_status("publish"),
            )
            .unwrap()
    }
}
