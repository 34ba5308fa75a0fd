//! Template lookup.
//!
//! [`CatalogStore`] serves the built-in catalog plus any JSON files found in an
//! optional directory. [`PgTemplateStore`] reads the `templates` table and falls back
//! to the catalog for ids the database does not have.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::template::{Template, TemplateRow, TemplateSummary};
use crate::templates::builtin::builtin_templates;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Template '{id}' is malformed: {source}")]
    Malformed {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read-only access to template documents. Returned templates are shared; callers
/// that need to change one must clone it.
#[async_trait]
pub trait TemplateStore: Send + Sync {
    async fn list(&self) -> Result<Vec<TemplateSummary>, StoreError>;

    async fn get(&self, id: &str) -> Result<Arc<Template>, StoreError>;
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory catalog
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    templates: Vec<Arc<Template>>,
}

impl CatalogStore {
    pub fn new(templates: Vec<Template>) -> Self {
        let mut store = Self::default();
        templates.into_iter().for_each(|t| store.insert(t));
        store
    }

    pub fn builtin() -> anyhow::Result<Self> {
        Ok(Self::new(builtin_templates()?))
    }

    /// Adds every `*.json` template in `dir` (file-name order). A file whose id is
    /// already in the catalog replaces that entry.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize, StoreError> {
        let mut paths: Vec<_> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        for path in &paths {
            let raw = std::fs::read_to_string(path)?;
            let template: Template =
                serde_json::from_str(&raw).map_err(|source| StoreError::Malformed {
                    id: path.display().to_string(),
                    source,
                })?;
            info!(template_id = %template.id, path = %path.display(), "loaded template");
            self.insert(template);
        }
        Ok(paths.len())
    }

    fn insert(&mut self, template: Template) {
        match self.templates.iter_mut().find(|t| t.id == template.id) {
            Some(existing) => *existing = Arc::new(template),
            None => self.templates.push(Arc::new(template)),
        }
    }

    pub fn find(&self, id: &str) -> Option<Arc<Template>> {
        self.templates.iter().find(|t| t.id == id).cloned()
    }

    pub fn summaries(&self) -> Vec<TemplateSummary> {
        self.templates.iter().map(|t| t.summary()).collect()
    }
}

#[async_trait]
impl TemplateStore for CatalogStore {
    async fn list(&self) -> Result<Vec<TemplateSummary>, StoreError> {
        Ok(self.summaries())
    }

    async fn get(&self, id: &str) -> Result<Arc<Template>, StoreError> {
        self.find(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// PostgreSQL
// ────────────────────────────────────────────────────────────────────────────

pub struct PgTemplateStore {
    db: PgPool,
    fallback: CatalogStore,
}

impl PgTemplateStore {
    pub fn new(db: PgPool, fallback: CatalogStore) -> Self {
        Self { db, fallback }
    }
}

#[async_trait]
impl TemplateStore for PgTemplateStore {
    async fn list(&self) -> Result<Vec<TemplateSummary>, StoreError> {
        let rows = sqlx::query_as::<_, TemplateRow>("SELECT * FROM templates ORDER BY name ASC")
            .fetch_all(&self.db)
            .await?;

        let mut summaries = Vec::with_capacity(rows.len());
        for row in rows {
            let id = row.id.clone();
            match row.into_template() {
                Ok(template) => summaries.push(template.summary()),
                Err(e) => warn!(template_id = %id, "skipping malformed template row: {e}"),
            }
        }

        for summary in self.fallback.summaries() {
            if !summaries.iter().any(|s| s.id == summary.id) {
                summaries.push(summary);
            }
        }
        Ok(summaries)
    }

    async fn get(&self, id: &str) -> Result<Arc<Template>, StoreError> {
        let row = sqlx::query_as::<_, TemplateRow>("SELECT * FROM templates WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        match row {
            Some(row) => row
                .into_template()
                .map(Arc::new)
                .map_err(|source| StoreError::Malformed {
                    id: id.to_string(),
                    source,
                }),
            None => self.fallback.get(id).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn template_json(id: &str, name: &str) -> String {
        json!({
            "id": id,
            "name": name,
            "theme": { "colors": { "primary": "#000000" } },
            "structure": { "type": "container", "sections": [] }
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_builtin_catalog_lookup() {
        let store = CatalogStore::builtin().unwrap();

        let template = store.get("minimal-clean").await.unwrap();
        assert_eq!(template.id, "minimal-clean");

        let ids: Vec<String> = store.list().await.unwrap().into_iter().map(|s| s.id).collect();
        assert_eq!(
            ids,
            [
                "modern-professional",
                "classic-elegant",
                "creative-bold",
                "minimal-clean",
                "dark-vision",
                "neo-elegant",
            ]
        );

        assert!(matches!(
            store.get("nope").await,
            Err(StoreError::NotFound(id)) if id == "nope"
        ));
    }

    #[tokio::test]
    async fn test_load_dir_adds_and_overrides() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.json"), template_json("custom", "Custom")).unwrap();
        std::fs::write(
            dir.path().join("b.json"),
            template_json("minimal-clean", "Minimal (house style)"),
        )
        .unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let mut store = CatalogStore::builtin().unwrap();
        assert_eq!(store.load_dir(dir.path()).unwrap(), 2);

        assert_eq!(store.get("custom").await.unwrap().name, "Custom");
        assert_eq!(
            store.get("minimal-clean").await.unwrap().name,
            "Minimal (house style)"
        );
        assert_eq!(store.list().await.unwrap().len(), 5);
    }

    #[test]
    fn test_load_dir_rejects_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.json"), "{ not json").unwrap();

        let mut store = CatalogStore::default();
        assert!(matches!(
            store.load_dir(dir.path()),
            Err(StoreError::Malformed { .. })
        ));
    }

    #[test]
    fn test_load_dir_missing_directory() {
        let mut store = CatalogStore::default();
        assert!(matches!(
            store.load_dir(Path::new("/definitely/not/here")),
            Err(StoreError::Io(_))
        ));
    }
}
