use std::collections::{BTreeMap, HashSet};
use std::time::Duration;

use crate::storage::MediaStore;

use super::report::{MediaError, MediaReport};

/// Bring every media URL of a package into the target media library.
///
/// URLs already under `target_base` map to themselves without a fetch.
/// A URL is attempted at most once, even when it repeats or failed before.
/// Each failure is recorded and the batch carries on. `url_map` receives an
/// entry for every URL that now has a local counterpart.
pub fn materialize(
    store: &dyn MediaStore,
    urls: &[String],
    origin_base: &str,
    target_base: &str,
    timeout: Duration,
    url_map: &mut BTreeMap<String, String>,
) -> MediaReport {
    let mut report = MediaReport::default();
    if urls.is_empty() {
        return report;
    }

    log::info!(
        "Importing {} media files from {}",
        urls.len(),
        if origin_base.is_empty() { "unknown origin" } else { origin_base }
    );

    let mut attempted: HashSet<&str> = HashSet::new();

    for url in urls {
        if !attempted.insert(url.as_str()) || url_map.contains_key(url) {
            continue;
        }

        if !target_base.is_empty() && url.starts_with(target_base) {
            url_map.insert(url.clone(), url.clone());
            report.reused.push(url.clone());
            continue;
        }

        let temp = match store.fetch_remote(url, timeout) {
            Ok(temp) => temp,
            Err(e) => {
                log::warn!("Failed to fetch {}: {}", url, e);
                report.errors.push(MediaError {
                    url: url.clone(),
                    error: e.to_string(),
                });
                continue;
            }
        };

        match store.persist_temp_as_media(&temp) {
            Ok(attachment) => {
                url_map.insert(url.clone(), attachment.url.clone());
                report.uploaded.insert(url.clone(), attachment.url);
                report.downloaded += 1;
            }
            Err(e) => {
                let mut error = e.to_string();
                if let Err(cleanup) = store.discard_temp(&temp) {
                    error.push_str(&format!(" Temporary file removal failed: {}", cleanup));
                }
                log::warn!("Failed to store {}: {}", url, error);
                report.errors.push(MediaError {
                    url: url.clone(),
                    error,
                });
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{Attachment, FetchError, Result, StorageError, TempResource};
    use crate::test_support::{Site, StubDownloader};
    use std::path::PathBuf;

    const TARGET: &str = "https://new.test/";
    const TIMEOUT: Duration = Duration::from_secs(5);

    fn urls(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_list() {
        let site = Site::new(TARGET, StubDownloader::new());
        let mut map = BTreeMap::new();

        let report = materialize(&site.media, &[], "https://old.test/", TARGET, TIMEOUT, &mut map);
        assert_eq!(report.downloaded, 0);
        assert!(report.errors.is_empty());
        assert!(map.is_empty());
    }

    #[test]
    fn test_local_urls_are_not_fetched() {
        let site = Site::new(TARGET, StubDownloader::new());
        let mut map = BTreeMap::new();
        let list = urls(&[
            "https://new.test/uploads/2024/01/a.png",
            "https://new.test/uploads/2024/01/b.mp4",
        ]);

        let report = materialize(&site.media, &list, "https://old.test/", TARGET, TIMEOUT, &mut map);

        assert!(site.downloader.requests().is_empty());
        assert_eq!(report.downloaded, 0);
        assert_eq!(report.reused, list);
        for url in &list {
            assert_eq!(&map[url], url);
        }
    }

    #[test]
    fn test_download_and_duplicates() {
        let site = Site::new(
            TARGET,
            StubDownloader::new().with("https://old.test/photo.jpg", b"jpeg"),
        );
        let mut map = BTreeMap::new();
        let list = urls(&["https://old.test/photo.jpg", "https://old.test/photo.jpg"]);

        let report = materialize(&site.media, &list, "https://old.test/", TARGET, TIMEOUT, &mut map);

        assert_eq!(site.downloader.requests().len(), 1);
        assert_eq!(report.downloaded, 1);
        let new_url = &report.uploaded["https://old.test/photo.jpg"];
        assert!(new_url.starts_with("https://new.test/uploads/"));
        assert!(new_url.ends_with("/photo.jpg"));
        assert_eq!(&map["https://old.test/photo.jpg"], new_url);
    }

    #[test]
    fn test_failures_do_not_stop_the_batch() {
        let site = Site::new(
            TARGET,
            StubDownloader::new()
                .with("https://old.test/empty.png", b"")
                .with("https://old.test/ok.png", b"png"),
        );
        let mut map = BTreeMap::new();
        let list = urls(&[
            "https://old.test/missing.png",
            "https://old.test/empty.png",
            "https://old.test/ok.png",
        ]);

        let report = materialize(&site.media, &list, "https://old.test/", TARGET, TIMEOUT, &mut map);

        assert_eq!(report.downloaded, 1);
        let failed: Vec<&str> = report.errors.iter().map(|e| e.url.as_str()).collect();
        assert_eq!(
            failed,
            vec!["https://old.test/missing.png", "https://old.test/empty.png"]
        );
        assert!(report.errors[0].error.contains("404"));
        assert!(!map.contains_key("https://old.test/missing.png"));
    }

    #[test]
    fn test_failed_url_is_attempted_once() {
        let site = Site::new(TARGET, StubDownloader::new());
        let mut map = BTreeMap::new();
        let list = urls(&[
            "https://old.test/gone.png",
            "https://old.test/gone.png",
            "https://new.test/uploads/a.png",
            "https://new.test/uploads/a.png",
        ]);

        let report = materialize(&site.media, &list, "https://old.test/", TARGET, TIMEOUT, &mut map);

        assert_eq!(site.downloader.requests(), vec!["https://old.test/gone.png"]);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.reused, vec!["https://new.test/uploads/a.png"]);
    }

    /// Media store whose persist and cleanup both fail
    struct BrokenStore;

    impl MediaStore for BrokenStore {
        fn fetch_remote(
            &self,
            url: &str,
            _timeout: Duration,
        ) -> std::result::Result<TempResource, FetchError> {
            Ok(TempResource {
                path: PathBuf::from("/nonexistent/tmp-file"),
                file_name: "a.png".to_string(),
                source_url: url.to_string(),
            })
        }

        fn persist_temp_as_media(&self, _temp: &TempResource) -> Result<Attachment> {
            Err(StorageError::InvalidOperation("Sideload rejected".to_string()))
        }

        fn discard_temp(&self, _temp: &TempResource) -> Result<()> {
            Err(StorageError::InvalidOperation("locked".to_string()))
        }

        fn resolve_attachment_url(&self, _id: u64) -> Result<Option<String>> {
            Ok(None)
        }
    }

    #[test]
    fn test_cleanup_failure_is_appended() {
        let mut map = BTreeMap::new();
        let list = urls(&["https://old.test/a.png"]);

        let report = materialize(&BrokenStore, &list, "https://old.test/", TARGET, TIMEOUT, &mut map);

        assert_eq!(report.errors.len(), 1);
        assert_eq!(
            report.errors[0].error,
            "Invalid operation: Sideload rejected Temporary file removal failed: Invalid operation: locked"
        );
    }
}
