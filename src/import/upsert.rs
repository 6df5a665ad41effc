use uuid::Uuid;

use crate::package::EntityRecord;
use crate::storage::{ContentStore, EntityDraft, EntityKind, Result};

use super::context::ImportContext;
use super::report::ItemOutcome;

/// What an upsert did to the target store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

impl From<UpsertOutcome> for ItemOutcome {
    fn from(outcome: UpsertOutcome) -> Self {
        match outcome {
            UpsertOutcome::Created => ItemOutcome::Created,
            UpsertOutcome::Updated => ItemOutcome::Updated,
        }
    }
}

/// Turn a title into a URL-safe slug
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Lowercase a metadata key and drop everything outside `[a-z0-9_-]`
pub fn sanitize_key(key: &str) -> String {
    key.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_' || *c == '-')
        .collect()
}

/// Slug a record will be stored under. Never empty.
pub fn resolve_slug(record: &EntityRecord) -> String {
    if !record.slug.is_empty() {
        return record.slug.clone();
    }
    let slug = slugify(&record.title);
    if !slug.is_empty() {
        return slug;
    }
    format!("item-{}", Uuid::new_v4())
}

/// Create or update the entity of `kind` matching `slug`, then restore its
/// metadata.
///
/// `content` is the already rewritten markup. Registering the result in the
/// context maps is left to the caller.
pub fn upsert(
    store: &dyn ContentStore,
    ctx: &ImportContext,
    kind: EntityKind,
    record: &EntityRecord,
    slug: &str,
    content: String,
) -> Result<(UpsertOutcome, u64)> {
    let draft = EntityDraft {
        kind,
        title: record.title.clone(),
        slug: slug.to_string(),
        status: record.status.clone(),
        content,
        excerpt: record.excerpt.clone(),
        parent: record.parent,
        menu_order: match kind {
            EntityKind::Page => record.menu_order,
            EntityKind::Block => 0,
        },
    };

    let existing = match ctx.slug_id(kind, slug) {
        Some(id) => Some(id),
        None => store.get_by_slug_and_kind(slug, kind)?.map(|e| e.id),
    };

    let (outcome, id) = match existing {
        Some(id) => {
            store.update(id, &draft)?;
            (UpsertOutcome::Updated, id)
        }
        None => (UpsertOutcome::Created, store.create(&draft)?),
    };

    for (key, values) in &record.meta {
        let key = sanitize_key(key);
        if key.is_empty() {
            continue;
        }
        store.delete_meta(id, &key)?;
        for value in values {
            store.add_meta(id, &key, value)?;
        }
    }

    Ok((outcome, id))
}
