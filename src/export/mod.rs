//! Selective export
//!
//! Packages a set of pages together with every block they reference and
//! every media file found in either.

mod builder;

pub use builder::ExportBuilder;

use crate::storage::{is_exportable_status, ContentStore, Entity, EntityKind, Result};

/// Pages that can be offered for export, sorted by title
pub fn list_exportable_pages(store: &dyn ContentStore, limit: usize) -> Result<Vec<Entity>> {
    let mut pages: Vec<Entity> = store
        .list_by_kind(EntityKind::Page)?
        .into_iter()
        .filter(|p| is_exportable_status(&p.status))
        .collect();

    pages.sort_by(|a, b| {
        a.title
            .to_lowercase()
            .cmp(&b.title.to_lowercase())
            .then(a.id.cmp(&b.id))
    });
    pages.truncate(limit);
    Ok(pages)
}
