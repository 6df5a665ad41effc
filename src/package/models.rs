use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::storage::{Entity, EntityKind, Metadata};

/// Self-contained transfer unit produced by export and consumed by import
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Package {
    /// Package format version
    pub version: String,
    /// Base URL of the exporting site, with trailing slash
    #[serde(default, deserialize_with = "null_as_default")]
    pub site_origin: String,
    /// ISO-8601 UTC generation time
    #[serde(default, deserialize_with = "null_as_default")]
    pub generated_at: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pages: Vec<EntityRecord>,
    #[serde(rename = "wp_blocks", default, deserialize_with = "null_as_default")]
    pub blocks: Vec<EntityRecord>,
    /// Distinct absolute media URLs
    #[serde(default, deserialize_with = "null_as_default")]
    pub media: Vec<String>,
}

impl Package {
    pub fn records(&self, kind: EntityKind) -> &[EntityRecord] {
        match kind {
            EntityKind::Page => &self.pages,
            EntityKind::Block => &self.blocks,
        }
    }
}

/// A page or block as it travels inside a package.
///
/// Every field is optional on the wire. Missing or `null` values fall back
/// to their defaults so one sloppy record never invalidates a package.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntityRecord {
    /// Source id, only meaningful inside the same package
    #[serde(rename = "ID", default, deserialize_with = "null_as_default")]
    pub id: u64,
    /// Declared kind. Import goes by the array a record sits in instead.
    #[serde(
        rename = "post_type",
        default,
        deserialize_with = "deserialize_kind",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<EntityKind>,
    #[serde(rename = "post_title", default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(rename = "post_name", default, deserialize_with = "null_as_default")]
    pub slug: String,
    #[serde(
        rename = "post_status",
        default = "default_status",
        deserialize_with = "deserialize_status"
    )]
    pub status: String,
    /// Carried through unchanged; never remapped
    #[serde(rename = "post_parent", default, deserialize_with = "null_as_default")]
    pub parent: u64,
    #[serde(rename = "post_content", default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(rename = "post_excerpt", default, deserialize_with = "null_as_default")]
    pub excerpt: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub menu_order: i64,
    #[serde(default, deserialize_with = "deserialize_meta")]
    pub meta: Metadata,
}

fn default_status() -> String {
    "draft".to_string()
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn deserialize_status<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?
        .filter(|s| !s.is_empty())
        .unwrap_or_else(default_status))
}

/// Unknown or missing `post_type` values become `None`
fn deserialize_kind<'de, D>(deserializer: D) -> Result<Option<EntityKind>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

impl EntityRecord {
    /// Build a record from a stored entity.
    ///
    /// An entity without a slug gets one from its title, or `item-<id>`.
    pub fn from_entity(entity: &Entity) -> Self {
        let mut slug = entity.slug.clone();
        if slug.is_empty() {
            slug = crate::import::slugify(&entity.title);
            if slug.is_empty() {
                slug = format!("item-{}", entity.id);
            }
        }

        Self {
            id: entity.id,
            kind: Some(entity.kind),
            title: entity.title.clone(),
            slug,
            status: entity.status.clone(),
            parent: entity.parent,
            content: entity.content.clone(),
            excerpt: entity.excerpt.clone(),
            menu_order: entity.menu_order,
            meta: entity.meta.clone(),
        }
    }
}

/// Accept `{key: [values]}`, tolerating `[]` for an empty map, `null`, and
/// bare scalars in place of single-value lists.
fn deserialize_meta<'de, D>(deserializer: D) -> Result<Metadata, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(Metadata::new()),
        Value::Array(items) if items.is_empty() => Ok(Metadata::new()),
        Value::Object(map) => Ok(map
            .into_iter()
            .map(|(key, values)| match values {
                Value::Array(values) => (key, values),
                Value::Null => (key, Vec::new()),
                other => (key, vec![other]),
            })
            .collect()),
        other => Err(D::Error::custom(format!(
            "expected meta to be an object, found {}",
            other
        ))),
    }
}
