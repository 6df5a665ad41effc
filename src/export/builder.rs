use std::collections::{HashMap, HashSet};

use chrono::{DateTime, SecondsFormat, Utc};

use crate::errors::{TransferResult, ValidationError};
use crate::package::{EntityRecord, Package, PACKAGE_VERSION};
use crate::scanner::{extract_block_refs, extract_media, OrderedSet};
use crate::settings::normalize_base_url;
use crate::storage::{ContentStore, EntityKind, MediaStore};

/// Assembles a package from a selection of pages.
///
/// Export only reads from the stores.
pub struct ExportBuilder<'a> {
    content: &'a dyn ContentStore,
    media: &'a dyn MediaStore,
    site_origin: String,
}

/// Media references accumulated across pages and blocks
#[derive(Default)]
struct MediaCollector {
    ids: OrderedSet<u64>,
    urls: OrderedSet<String>,
}

impl MediaCollector {
    fn scan(&mut self, content: &str) {
        let found = extract_media(content);
        self.ids.extend(found.ids);
        self.urls.extend(found.urls);
    }
}

impl<'a> ExportBuilder<'a> {
    pub fn new(content: &'a dyn ContentStore, media: &'a dyn MediaStore, site_origin: &str) -> Self {
        Self {
            content,
            media,
            site_origin: normalize_base_url(site_origin),
        }
    }

    /// Build a package for the given pages, stamped with the current time
    pub fn build_export(&self, page_ids: &[u64]) -> TransferResult<Package> {
        self.build_export_at(page_ids, Utc::now())
    }

    /// Build a package for the given pages.
    ///
    /// Ids are deduplicated and zero ids ignored. Ids that are missing or
    /// are not pages are skipped. Referenced blocks that cannot be found are
    /// left out; their directives stay in the page content as they are.
    pub fn build_export_at(&self, page_ids: &[u64], now: DateTime<Utc>) -> TransferResult<Package> {
        let mut selected = OrderedSet::default();
        selected.extend(page_ids.iter().copied().filter(|id| *id > 0));
        if selected.is_empty() {
            return Err(ValidationError::NoSelection.into());
        }

        let mut pages = Vec::new();
        let mut block_ids = OrderedSet::default();
        let mut media = MediaCollector::default();

        for &id in selected.as_slice() {
            let entity = match self.content.get_by_id(id)? {
                Some(entity) if entity.kind == EntityKind::Page => entity,
                Some(entity) => {
                    log::debug!("Skipping {} {}: not a page", entity.kind, id);
                    continue;
                }
                None => {
                    log::debug!("Skipping page {}: not found", id);
                    continue;
                }
            };

            media.scan(&entity.content);
            block_ids.extend(extract_block_refs(&entity.content));
            pages.push(EntityRecord::from_entity(&entity));
        }

        let blocks = self.resolve_blocks(block_ids.as_slice())?;
        for block in &blocks {
            media.scan(&block.content);
        }

        let mut media_urls = media.urls;
        for &attachment_id in media.ids.as_slice() {
            match self.media.resolve_attachment_url(attachment_id)? {
                Some(url) => {
                    media_urls.insert(url);
                }
                None => log::debug!("Id {} is not an attachment", attachment_id),
            }
        }

        log::info!(
            "Exported {} pages, {} blocks, {} media files",
            pages.len(),
            blocks.len(),
            media_urls.len()
        );

        Ok(Package {
            version: PACKAGE_VERSION.to_string(),
            site_origin: self.site_origin.clone(),
            generated_at: now.to_rfc3339_opts(SecondsFormat::Secs, false),
            pages,
            blocks,
            media: media_urls.into_vec(),
        })
    }

    /// Load referenced blocks, in the order they were first referenced
    fn resolve_blocks(&self, ids: &[u64]) -> TransferResult<Vec<EntityRecord>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let order: HashMap<u64, usize> = ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();
        let mut found = self.content.bulk_get_by_ids(ids, EntityKind::Block)?;
        found.retain(|b| order.contains_key(&b.id));
        found.sort_by_key(|b| order[&b.id]);

        let mut seen = HashSet::new();
        found.retain(|b| seen.insert(b.id));

        if found.len() < ids.len() {
            log::debug!(
                "{} referenced blocks were not found and are left unresolved",
                ids.len() - found.len()
            );
        }

        Ok(found.iter().map(EntityRecord::from_entity).collect())
    }
}
