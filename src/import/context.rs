use std::collections::{BTreeMap, HashMap};

use crate::storage::EntityKind;

/// Stage of an import run. Phases always run in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportPhase {
    Idle,
    Media,
    Blocks,
    Pages,
    Done,
}

impl ImportPhase {
    pub fn next(self) -> Self {
        match self {
            Self::Idle => Self::Media,
            Self::Media => Self::Blocks,
            Self::Blocks => Self::Pages,
            Self::Pages | Self::Done => Self::Done,
        }
    }
}

/// Mapping state threaded through one import run
#[derive(Debug)]
pub struct ImportContext {
    phase: ImportPhase,
    /// Old media URL to new media URL, sorted for stable output
    pub url_map: BTreeMap<String, String>,
    /// Source block id to target block id
    pub block_ids: HashMap<u64, u64>,
    block_slugs: HashMap<String, u64>,
    page_slugs: HashMap<String, u64>,
}

impl Default for ImportContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ImportContext {
    pub fn new() -> Self {
        Self {
            phase: ImportPhase::Idle,
            url_map: BTreeMap::new(),
            block_ids: HashMap::new(),
            block_slugs: HashMap::new(),
            page_slugs: HashMap::new(),
        }
    }

    pub fn phase(&self) -> ImportPhase {
        self.phase
    }

    /// Move to the next phase and return it
    pub fn advance(&mut self) -> ImportPhase {
        self.phase = self.phase.next();
        log::debug!("Import phase: {:?}", self.phase);
        self.phase
    }

    fn slugs(&self, kind: EntityKind) -> &HashMap<String, u64> {
        match kind {
            EntityKind::Page => &self.page_slugs,
            EntityKind::Block => &self.block_slugs,
        }
    }

    pub fn slug_id(&self, kind: EntityKind, slug: &str) -> Option<u64> {
        self.slugs(kind).get(slug).copied()
    }

    pub fn register_slug(&mut self, kind: EntityKind, slug: &str, id: u64) {
        let slugs = match kind {
            EntityKind::Page => &mut self.page_slugs,
            EntityKind::Block => &mut self.block_slugs,
        };
        slugs.insert(slug.to_string(), id);
    }

    /// Record where a source block ended up. Source ids of zero are ignored.
    pub fn register_block(&mut self, old_id: u64, new_id: u64) {
        if old_id > 0 {
            self.block_ids.insert(old_id, new_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_order() {
        let mut ctx = ImportContext::new();
        assert_eq!(ctx.phase(), ImportPhase::Idle);
        assert_eq!(ctx.advance(), ImportPhase::Media);
        assert_eq!(ctx.advance(), ImportPhase::Blocks);
        assert_eq!(ctx.advance(), ImportPhase::Pages);
        assert_eq!(ctx.advance(), ImportPhase::Done);
        assert_eq!(ctx.advance(), ImportPhase::Done);
    }

    #[test]
    fn test_slug_maps_are_per_kind() {
        let mut ctx = ImportContext::new();
        ctx.register_slug(EntityKind::Block, "about", 7);

        assert_eq!(ctx.slug_id(EntityKind::Block, "about"), Some(7));
        assert_eq!(ctx.slug_id(EntityKind::Page, "about"), None);
    }

    #[test]
    fn test_zero_block_id_not_registered() {
        let mut ctx = ImportContext::new();
        ctx.register_block(0, 5);
        ctx.register_block(12, 99);

        assert_eq!(ctx.block_ids.len(), 1);
        assert_eq!(ctx.block_ids[&12], 99);
    }
}
