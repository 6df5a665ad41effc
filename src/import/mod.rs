//! Package import
//!
//! Runs in three phases over one [`ImportContext`]:
//! 1. media files are fetched into the target media library
//! 2. blocks are upserted by slug, recording old id to new id
//! 3. pages are rewritten against both maps and upserted by slug
//!
//! Nothing is rolled back. Every item that fails is listed in the
//! [`ImportReport`].

mod context;
mod media;
mod pipeline;
mod remap;
mod report;
mod upsert;

pub use context::{ImportContext, ImportPhase};
pub use media::materialize;
pub use pipeline::Importer;
pub use remap::{remap_block_refs, rewrite_urls};
pub use report::{EntityError, EntityReport, ImportReport, ItemOutcome, ItemResult, MediaError, MediaReport};
pub use upsert::{resolve_slug, sanitize_key, slugify, upsert, UpsertOutcome};
