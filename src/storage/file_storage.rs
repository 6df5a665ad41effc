use std::fs;
use std::path::PathBuf;

use chrono::Utc;
use thiserror::Error;

use super::models::{is_exportable_status, Entity, EntityDraft, EntityKind};
use super::ContentStore;

const MAX_TITLE_LEN: usize = 1000;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Entity not found: {0}")]
    EntityNotFound(u64),

    #[error("Data directory not found")]
    DataDirNotFound,

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Content store keeping one JSON document per entity on disk
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// Get the default data directory
    pub fn default_data_dir() -> Result<PathBuf> {
        dirs::data_local_dir()
            .map(|p| p.join("pageport"))
            .ok_or(StorageError::DataDirNotFound)
    }

    /// Initialize storage directories
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(self.entities_dir())?;
        Ok(())
    }

    pub fn base_path(&self) -> &PathBuf {
        &self.base_path
    }

    fn entities_dir(&self) -> PathBuf {
        self.base_path.join("content").join("entities")
    }

    fn entity_path(&self, id: u64) -> PathBuf {
        self.entities_dir().join(format!("{}.json", id))
    }

    fn counter_path(&self) -> PathBuf {
        self.base_path.join("content").join("next_id")
    }

    fn next_id(&self) -> Result<u64> {
        let path = self.counter_path();
        let current = if path.exists() {
            fs::read_to_string(&path)?
                .trim()
                .parse::<u64>()
                .map_err(|e| StorageError::InvalidOperation(format!("Corrupt id counter: {}", e)))?
        } else {
            1
        };
        fs::write(&path, (current + 1).to_string())?;
        Ok(current)
    }

    fn read_entity(&self, id: u64) -> Result<Option<Entity>> {
        let path = self.entity_path(id);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn load_entity(&self, id: u64) -> Result<Entity> {
        self.read_entity(id)?.ok_or(StorageError::EntityNotFound(id))
    }

    fn write_entity(&self, entity: &Entity) -> Result<()> {
        let content = serde_json::to_string_pretty(entity)?;
        fs::write(self.entity_path(entity.id), content)?;
        Ok(())
    }

    fn list_entities(&self) -> Result<Vec<Entity>> {
        let dir = self.entities_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut entities = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().map_or(false, |e| e == "json") {
                match fs::read_to_string(&path)
                    .map_err(StorageError::from)
                    .and_then(|c| serde_json::from_str::<Entity>(&c).map_err(StorageError::from))
                {
                    Ok(entity) => entities.push(entity),
                    Err(e) => log::warn!("Skipping unreadable entity {:?}: {}", path, e),
                }
            }
        }
        entities.sort_by_key(|e| e.id);
        Ok(entities)
    }

    fn validate(draft: &EntityDraft) -> Result<()> {
        if draft.slug.trim().is_empty() {
            return Err(StorageError::InvalidOperation(
                "Slug must not be empty".to_string(),
            ));
        }
        if draft.title.chars().count() > MAX_TITLE_LEN {
            return Err(StorageError::InvalidOperation(format!(
                "Title exceeds {} characters",
                MAX_TITLE_LEN
            )));
        }
        Ok(())
    }
}

impl ContentStore for FileStorage {
    fn get_by_id(&self, id: u64) -> Result<Option<Entity>> {
        self.read_entity(id)
    }

    fn get_by_slug_and_kind(&self, slug: &str, kind: EntityKind) -> Result<Option<Entity>> {
        Ok(self
            .list_entities()?
            .into_iter()
            .find(|e| e.kind == kind && e.slug == slug))
    }

    fn bulk_get_by_ids(&self, ids: &[u64], kind: EntityKind) -> Result<Vec<Entity>> {
        let mut found = Vec::new();
        for id in ids {
            if let Some(entity) = self.read_entity(*id)? {
                if entity.kind == kind && is_exportable_status(&entity.status) {
                    found.push(entity);
                }
            }
        }
        Ok(found)
    }

    fn list_by_kind(&self, kind: EntityKind) -> Result<Vec<Entity>> {
        Ok(self
            .list_entities()?
            .into_iter()
            .filter(|e| e.kind == kind)
            .collect())
    }

    fn create(&self, draft: &EntityDraft) -> Result<u64> {
        Self::validate(draft)?;
        self.init()?;

        let now = Utc::now();
        let entity = Entity {
            id: self.next_id()?,
            kind: draft.kind,
            title: draft.title.clone(),
            slug: draft.slug.clone(),
            status: draft.status.clone(),
            content: draft.content.clone(),
            excerpt: draft.excerpt.clone(),
            parent: draft.parent,
            menu_order: draft.menu_order,
            meta: Default::default(),
            created_at: now,
            updated_at: now,
        };
        self.write_entity(&entity)?;
        Ok(entity.id)
    }

    fn update(&self, id: u64, draft: &EntityDraft) -> Result<()> {
        Self::validate(draft)?;
        let mut entity = self.load_entity(id)?;
        if entity.kind != draft.kind {
            return Err(StorageError::InvalidOperation(format!(
                "Entity {} is a {}, not a {}",
                id, entity.kind, draft.kind
            )));
        }

        entity.title = draft.title.clone();
        entity.slug = draft.slug.clone();
        entity.status = draft.status.clone();
        entity.content = draft.content.clone();
        entity.excerpt = draft.excerpt.clone();
        entity.parent = draft.parent;
        entity.menu_order = draft.menu_order;
        entity.updated_at = Utc::now();
        self.write_entity(&entity)
    }

    fn delete_meta(&self, id: u64, key: &str) -> Result<()> {
        let mut entity = self.load_entity(id)?;
        if entity.meta.remove(key).is_some() {
            self.write_entity(&entity)?;
        }
        Ok(())
    }

    fn add_meta(&self, id: u64, key: &str, value: &serde_json::Value) -> Result<()> {
        let mut entity = self.load_entity(id)?;
        entity
            .meta
            .entry(key.to_string())
            .or_default()
            .push(value.clone());
        self.write_entity(&entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn create_test_storage() -> (FileStorage, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path().to_path_buf());
        storage.init().unwrap();
        (storage, temp_dir)
    }

    #[test]
    fn test_create_and_lookup_by_slug() {
        let (storage, _temp) = create_test_storage();

        let id = storage
            .create(&EntityDraft::new(EntityKind::Page, "About", "about"))
            .unwrap();

        let page = storage.get_by_id(id).unwrap().unwrap();
        assert_eq!(page.title, "About");
        assert_eq!(page.status, "draft");

        let found = storage
            .get_by_slug_and_kind("about", EntityKind::Page)
            .unwrap()
            .unwrap();
        assert_eq!(found.id, id);

        // Same slug, other kind
        assert!(storage
            .get_by_slug_and_kind("about", EntityKind::Block)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_ids_are_unique_and_increasing() {
        let (storage, _temp) = create_test_storage();

        let a = storage.create(&EntityDraft::new(EntityKind::Page, "A", "a")).unwrap();
        let b = storage.create(&EntityDraft::new(EntityKind::Block, "B", "b")).unwrap();
        assert!(b > a);
    }

    #[test]
    fn test_rejects_empty_slug() {
        let (storage, _temp) = create_test_storage();

        let result = storage.create(&EntityDraft::new(EntityKind::Page, "Untitled", ""));
        assert!(matches!(result, Err(StorageError::InvalidOperation(_))));
    }

    #[test]
    fn test_update_preserves_identity_and_meta() {
        let (storage, _temp) = create_test_storage();

        let id = storage
            .create(&EntityDraft::new(EntityKind::Block, "Footer", "footer"))
            .unwrap();
        storage.add_meta(id, "color", &json!("blue")).unwrap();

        let draft = EntityDraft::new(EntityKind::Block, "Footer v2", "footer")
            .with_content("<p>new</p>");
        storage.update(id, &draft).unwrap();

        let block = storage.get_by_id(id).unwrap().unwrap();
        assert_eq!(block.title, "Footer v2");
        assert_eq!(block.content, "<p>new</p>");
        assert_eq!(block.meta["color"], vec![json!("blue")]);
    }

    #[test]
    fn test_update_missing_entity() {
        let (storage, _temp) = create_test_storage();

        let result = storage.update(42, &EntityDraft::new(EntityKind::Page, "X", "x"));
        assert!(matches!(result, Err(StorageError::EntityNotFound(42))));
    }

    #[test]
    fn test_meta_delete_then_add_keeps_order() {
        let (storage, _temp) = create_test_storage();

        let id = storage.create(&EntityDraft::new(EntityKind::Page, "P", "p")).unwrap();
        storage.add_meta(id, "k", &json!(1)).unwrap();
        storage.delete_meta(id, "k").unwrap();
        storage.add_meta(id, "k", &json!(2)).unwrap();
        storage.add_meta(id, "k", &json!(3)).unwrap();

        let page = storage.get_by_id(id).unwrap().unwrap();
        assert_eq!(page.meta["k"], vec![json!(2), json!(3)]);
    }

    #[test]
    fn test_bulk_get_filters_kind_and_status() {
        let (storage, _temp) = create_test_storage();

        let block = storage
            .create(&EntityDraft::new(EntityKind::Block, "B", "b").with_status("publish"))
            .unwrap();
        let trashed = storage
            .create(&EntityDraft::new(EntityKind::Block, "T", "t").with_status("trash"))
            .unwrap();
        let page = storage.create(&EntityDraft::new(EntityKind::Page, "P", "p")).unwrap();

        let found = storage
            .bulk_get_by_ids(&[block, trashed, page, 999], EntityKind::Block)
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, block);
    }
}
