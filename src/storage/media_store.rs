use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use reqwest::Url;
use uuid::Uuid;

use super::download::{Downloader, FetchError};
use super::file_storage::{Result, StorageError};
use super::models::{Attachment, TempResource};
use super::MediaStore;
use crate::settings::normalize_base_url;

/// Media library kept under `<base>/uploads` with a JSON attachment index
pub struct FileMediaStore {
    base_path: PathBuf,
    site_url: String,
    downloader: Arc<dyn Downloader>,
}

impl FileMediaStore {
    pub fn new(base_path: PathBuf, site_url: &str, downloader: Arc<dyn Downloader>) -> Self {
        Self {
            base_path,
            site_url: normalize_base_url(site_url),
            downloader,
        }
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.base_path.join("uploads")
    }

    fn temp_dir(&self) -> PathBuf {
        self.uploads_dir().join(".tmp")
    }

    fn index_path(&self) -> PathBuf {
        self.base_path.join("media.json")
    }

    /// List every attachment in the library
    pub fn list_attachments(&self) -> Result<Vec<Attachment>> {
        let path = self.index_path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn save_attachments(&self, attachments: &[Attachment]) -> Result<()> {
        let content = serde_json::to_string_pretty(attachments)?;
        fs::write(self.index_path(), content)?;
        Ok(())
    }
}

impl MediaStore for FileMediaStore {
    fn fetch_remote(&self, url: &str, timeout: Duration) -> std::result::Result<TempResource, FetchError> {
        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", url, e)))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(FetchError::InvalidUrl(format!("{}: unsupported scheme", url)));
        }

        let bytes = self.downloader.download(url, timeout)?;

        let temp_dir = self.temp_dir();
        fs::create_dir_all(&temp_dir)?;
        let path = temp_dir.join(Uuid::new_v4().to_string());
        fs::write(&path, bytes)?;

        Ok(TempResource {
            path,
            file_name: file_name_from_url(&parsed),
            source_url: url.to_string(),
        })
    }

    fn persist_temp_as_media(&self, temp: &TempResource) -> Result<Attachment> {
        let size = fs::metadata(&temp.path)?.len();
        if size == 0 {
            return Err(StorageError::InvalidOperation(format!(
                "Downloaded file {} is empty",
                temp.file_name
            )));
        }

        let mut attachments = self.list_attachments()?;

        let subdir = Utc::now().format("%Y/%m").to_string();
        let target_dir = self.uploads_dir().join(&subdir);
        fs::create_dir_all(&target_dir)?;

        let target_name = unique_file_name(&target_dir, &temp.file_name);
        let target_path = target_dir.join(&target_name);
        fs::rename(&temp.path, &target_path)?;

        let id = attachments.iter().map(|a| a.id).max().unwrap_or(0) + 1;
        let file = format!("{}/{}", subdir, target_name);
        let attachment = Attachment {
            id,
            url: format!("{}uploads/{}", self.site_url, file),
            file,
            source_url: Some(temp.source_url.clone()),
            created_at: Utc::now(),
        };
        attachments.push(attachment.clone());
        if let Err(e) = self.save_attachments(&attachments) {
            // Callers discard the temp resource on error, so it must exist again
            if let Err(restore) = fs::rename(&target_path, &temp.path) {
                log::warn!("Failed to move {:?} back: {}", target_path, restore);
            }
            return Err(e);
        }

        log::info!("Stored media {} as {}", temp.source_url, attachment.url);
        Ok(attachment)
    }

    fn discard_temp(&self, temp: &TempResource) -> Result<()> {
        fs::remove_file(&temp.path)?;
        Ok(())
    }

    fn resolve_attachment_url(&self, id: u64) -> Result<Option<String>> {
        Ok(self
            .list_attachments()?
            .into_iter()
            .find(|a| a.id == id)
            .map(|a| a.url))
    }
}

/// Basename of the URL path, decoded and made safe for the filesystem
fn file_name_from_url(url: &Url) -> String {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .map(|segment| {
            urlencoding::decode(segment)
                .map(|s| s.into_owned())
                .unwrap_or_else(|_| segment.to_string())
        })
        .map(|name| sanitize_filename(&name))
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| format!("media-{}", Uuid::new_v4()))
}

fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() || c.is_whitespace() => '-',
            c => c,
        })
        .collect::<String>()
        .trim_matches(|c| c == '.' || c == '-')
        .to_string()
}

/// Pick `name`, or `stem_N.ext` when `name` is already taken in `dir`
fn unique_file_name(dir: &Path, name: &str) -> String {
    if !dir.join(name).exists() {
        return name.to_string();
    }

    let path = Path::new(name);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let ext = path.extension().map(|s| s.to_string_lossy().to_string());

    let mut counter = 1;
    loop {
        let candidate = match &ext {
            Some(ext) => format!("{}_{}.{}", stem, counter, ext),
            None => format!("{}_{}", stem, counter),
        };
        if !dir.join(&candidate).exists() {
            return candidate;
        }
        counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StubDownloader;
    use tempfile::TempDir;

    const TIMEOUT: Duration = Duration::from_secs(5);

    fn create_test_store(downloader: StubDownloader) -> (FileMediaStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = FileMediaStore::new(
            temp_dir.path().to_path_buf(),
            "https://target.test",
            Arc::new(downloader),
        );
        (store, temp_dir)
    }

    #[test]
    fn test_fetch_and_persist() {
        let downloader = StubDownloader::new()
            .with("https://origin.test/wp-content/uploads/My%20Photo.jpg", b"jpeg");
        let (store, _temp) = create_test_store(downloader);

        let temp = store
            .fetch_remote("https://origin.test/wp-content/uploads/My%20Photo.jpg", TIMEOUT)
            .unwrap();
        assert_eq!(temp.file_name, "My-Photo.jpg");
        assert!(temp.path.exists());

        let attachment = store.persist_temp_as_media(&temp).unwrap();
        assert!(!temp.path.exists());
        assert!(attachment.url.starts_with("https://target.test/uploads/"));
        assert!(attachment.url.ends_with("/My-Photo.jpg"));
        assert_eq!(
            store.resolve_attachment_url(attachment.id).unwrap(),
            Some(attachment.url.clone())
        );
    }

    #[test]
    fn test_persist_same_name_twice_gets_suffix() {
        let downloader = StubDownloader::new()
            .with("https://a.test/x/logo.png", b"one")
            .with("https://b.test/y/logo.png", b"two");
        let (store, _temp) = create_test_store(downloader);

        let first = store.fetch_remote("https://a.test/x/logo.png", TIMEOUT).unwrap();
        let first = store.persist_temp_as_media(&first).unwrap();
        let second = store.fetch_remote("https://b.test/y/logo.png", TIMEOUT).unwrap();
        let second = store.persist_temp_as_media(&second).unwrap();

        assert!(first.url.ends_with("/logo.png"));
        assert!(second.url.ends_with("/logo_1.png"));
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_empty_download_is_rejected_at_persist() {
        let downloader = StubDownloader::new().with("https://a.test/empty.gif", b"");
        let (store, _temp) = create_test_store(downloader);

        let temp = store.fetch_remote("https://a.test/empty.gif", TIMEOUT).unwrap();
        let result = store.persist_temp_as_media(&temp);
        assert!(matches!(result, Err(StorageError::InvalidOperation(_))));

        store.discard_temp(&temp).unwrap();
        assert!(!temp.path.exists());
    }

    #[test]
    fn test_unreadable_index_leaves_temp_in_place() {
        let downloader = StubDownloader::new().with("https://a.test/pic.png", b"png");
        let (store, temp_dir) = create_test_store(downloader);
        fs::write(temp_dir.path().join("media.json"), "{broken").unwrap();

        let temp = store.fetch_remote("https://a.test/pic.png", TIMEOUT).unwrap();
        let result = store.persist_temp_as_media(&temp);
        assert!(matches!(result, Err(StorageError::Json(_))));

        assert!(temp.path.exists());
        let stored: Vec<_> = fs::read_dir(store.uploads_dir())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name() != ".tmp")
            .collect();
        assert!(stored.is_empty());

        store.discard_temp(&temp).unwrap();
    }

    #[test]
    fn test_fetch_unknown_url_fails() {
        let (store, _temp) = create_test_store(StubDownloader::new());

        let result = store.fetch_remote("https://a.test/missing.png", TIMEOUT);
        assert!(matches!(result, Err(FetchError::Status { status: 404, .. })));

        let result = store.fetch_remote("not a url", TIMEOUT);
        assert!(matches!(result, Err(FetchError::InvalidUrl(_))));
    }

    #[test]
    fn test_resolve_unknown_attachment() {
        let (store, _temp) = create_test_store(StubDownloader::new());
        assert_eq!(store.resolve_attachment_url(7).unwrap(), None);
    }
}
