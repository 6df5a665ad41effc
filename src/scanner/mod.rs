//! Reference scanning over content markup
//!
//! Finds the blocks and media a piece of content depends on:
//! - block references (`<!-- wp:block {"ref":N} /-->` directives)
//! - attachment ids (`"id": N` attributes)
//! - absolute media URLs (by file extension)
//!
//! Every function here is pure and returns results in first-seen order
//! without duplicates.

mod directive;
mod media;

use std::collections::HashSet;
use std::hash::Hash;

use serde::Serialize;

pub use directive::{find_block_directives, BlockDirective};

/// Media referenced by a piece of content
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MediaRefs {
    pub ids: Vec<u64>,
    pub urls: Vec<String>,
}

/// Ids of every block referenced from `content`
pub fn extract_block_refs(content: &str) -> Vec<u64> {
    let mut refs = OrderedSet::default();
    for directive in find_block_directives(content) {
        if let Some(id) = directive.ref_id.filter(|id| *id > 0) {
            refs.insert(id);
        }
    }
    refs.into_vec()
}

/// Attachment ids and media URLs referenced from `content`
pub fn extract_media(content: &str) -> MediaRefs {
    let mut ids = OrderedSet::default();
    for id in media::attribute_ids(content) {
        ids.insert(id);
    }

    let mut urls = OrderedSet::default();
    for url in media::media_urls(content) {
        urls.insert(url.to_string());
    }

    MediaRefs {
        ids: ids.into_vec(),
        urls: urls.into_vec(),
    }
}

/// Insertion-ordered set
#[derive(Debug, Clone)]
pub struct OrderedSet<T> {
    items: Vec<T>,
    seen: HashSet<T>,
}

impl<T> Default for OrderedSet<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            seen: HashSet::new(),
        }
    }
}

impl<T: Eq + Hash + Clone> OrderedSet<T> {
    /// Returns false if the value was already present
    pub fn insert(&mut self, value: T) -> bool {
        if self.seen.insert(value.clone()) {
            self.items.push(value);
            true
        } else {
            false
        }
    }

    pub fn extend<I: IntoIterator<Item = T>>(&mut self, values: I) {
        for value in values {
            self.insert(value);
        }
    }

    pub fn contains(&self, value: &T) -> bool {
        self.seen.contains(value)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}
