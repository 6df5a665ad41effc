use std::time::Duration;

use crate::errors::TransferResult;
use crate::package::{parse_package, EntityRecord, Package};
use crate::settings::{normalize_base_url, DEFAULT_FETCH_TIMEOUT_SECS};
use crate::storage::{ContentStore, EntityKind, MediaStore};

use super::context::{ImportContext, ImportPhase};
use super::media::materialize;
use super::remap::{remap_block_refs, rewrite_urls};
use super::report::{EntityReport, ImportReport, ItemOutcome};
use super::upsert::{resolve_slug, upsert};

/// Applies packages to a target deployment.
///
/// Media are brought over first, then blocks, then pages, so that page
/// content can point at the new block ids.
pub struct Importer<'a> {
    content: &'a dyn ContentStore,
    media: &'a dyn MediaStore,
    target_base: String,
    fetch_timeout: Duration,
}

impl<'a> Importer<'a> {
    pub fn new(content: &'a dyn ContentStore, media: &'a dyn MediaStore, target_base: &str) -> Self {
        Self {
            content,
            media,
            target_base: normalize_base_url(target_base),
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
        }
    }

    /// Bound each remote media download
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Parse a package document and import it
    pub fn import_json(&self, json: &str) -> TransferResult<ImportReport> {
        let package = parse_package(json)?;
        Ok(self.run_import(&package))
    }

    /// Import a package.
    ///
    /// Always runs to completion. Item failures end up in the report.
    pub fn run_import(&self, package: &Package) -> ImportReport {
        let origin = normalize_base_url(&package.site_origin);
        let mut ctx = ImportContext::new();
        let mut report = ImportReport::default();

        log::info!(
            "Importing package {} ({} pages, {} blocks, {} media)",
            package.version,
            package.pages.len(),
            package.blocks.len(),
            package.media.len()
        );

        while ctx.advance() != ImportPhase::Done {
            match ctx.phase() {
                ImportPhase::Media => {
                    report.media = materialize(
                        self.media,
                        &package.media,
                        &origin,
                        &self.target_base,
                        self.fetch_timeout,
                        &mut ctx.url_map,
                    );
                }
                ImportPhase::Blocks => {
                    report.blocks = self.import_records(&mut ctx, EntityKind::Block, &package.blocks, &origin);
                }
                ImportPhase::Pages => {
                    report.pages = self.import_records(&mut ctx, EntityKind::Page, &package.pages, &origin);
                }
                ImportPhase::Idle | ImportPhase::Done => {}
            }
        }

        log::info!(
            "Import finished: {} media downloaded, {} blocks and {} pages written, {} errors",
            report.media.downloaded,
            report.blocks.created.len() + report.blocks.updated.len(),
            report.pages.created.len() + report.pages.updated.len(),
            report.error_count()
        );

        report
    }

    fn import_records(
        &self,
        ctx: &mut ImportContext,
        kind: EntityKind,
        records: &[EntityRecord],
        origin: &str,
    ) -> EntityReport {
        let mut report = EntityReport::default();

        for record in records {
            let slug = resolve_slug(record);

            let mut content = rewrite_urls(&record.content, &ctx.url_map, origin, &self.target_base);
            if kind == EntityKind::Page {
                content = remap_block_refs(&content, &ctx.block_ids);
            }

            match upsert(self.content, ctx, kind, record, &slug, content) {
                Ok((outcome, id)) => {
                    ctx.register_slug(kind, &slug, id);
                    if kind == EntityKind::Block {
                        ctx.register_block(record.id, id);
                    }
                    log::debug!("{:?} {} {} as {}", outcome, kind, slug, id);
                    report.record(kind, &slug, Some(id), outcome.into());
                }
                Err(e) => {
                    log::warn!("Failed to import {} {}: {}", kind, slug, e);
                    report.record(kind, &slug, None, ItemOutcome::Failed(e.to_string()));
                }
            }
        }

        report
    }
}
