use anyhow::{bail, Context, Result};

use pageport_lib::import::slugify;
use pageport_lib::storage::{ContentStore, EntityDraft, EntityKind};

use crate::app::App;
use crate::OutputFormat;

pub fn run(
    app: &App,
    kind: EntityKind,
    title: &str,
    slug: Option<&str>,
    content: Option<String>,
    status: &str,
    format: &OutputFormat,
) -> Result<()> {
    let slug = slug.map(|s| s.to_string()).unwrap_or_else(|| slugify(title));
    if slug.is_empty() {
        bail!("Cannot derive a slug from '{}'; pass --slug", title);
    }

    if app
        .content
        .get_by_slug_and_kind(&slug, kind)
        .context("Failed to look up slug")?
        .is_some()
    {
        bail!("A {} with slug '{}' already exists", kind, slug);
    }

    let draft = EntityDraft::new(kind, title, slug.as_str())
        .with_content(content.unwrap_or_default())
        .with_status(status);
    let id = app
        .content
        .create(&draft)
        .with_context(|| format!("Failed to create {}", kind))?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "id": id,
                "type": kind,
                "title": title,
                "slug": slug,
                "status": status,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("Created {} \"{}\"", kind, title);
            println!("  Slug: {}", slug);
            println!("  ID: {}", id);
        }
    }

    Ok(())
}
