use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use crate::render::path::{is_present, resolve_path};

/// Normalized resume content consumed by the renderer.
///
/// Canonical shape: `personalInfo.*` scalars plus ordered collections
/// (`experience`, `education`, `skills`, `projects`, `awards`, ...). Every field is
/// optional; the renderer treats absence as "render nothing".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResumeData(pub Value);

/// Section ids paired with the data path that decides whether the section has content.
pub const CONTENT_SECTIONS: &[(&str, &str)] = &[
    ("summary", "personalInfo.summary"),
    ("experience", "experience"),
    ("education", "education"),
    ("skills", "skills"),
    ("projects", "projects"),
    ("awards", "awards"),
    ("volunteer", "volunteer"),
    ("publications", "publications"),
    ("languages", "languages"),
    ("interests", "interests"),
];

impl ResumeData {
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Section ids whose backing data is non-empty, in canonical order.
    pub fn populated_sections(&self) -> Vec<&'static str> {
        CONTENT_SECTIONS
            .iter()
            .filter(|(_, path)| resolve_path(&self.0, path).is_some_and(is_present))
            .map(|(id, _)| *id)
            .collect()
    }
}

impl From<Value> for ResumeData {
    fn from(value: Value) -> Self {
        ResumeData(value)
    }
}

/// A persisted resume document, owned by a single user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub template_id: String,
    pub theme: Option<String>,
    pub style: Option<Value>,
    pub basics: Option<Value>,
    /// Editor content blocks, in display order.
    pub content: Option<Value>,
    /// Composed render data, if the client saved one.
    pub resume_data: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_populated_sections_skips_empty_collections() {
        let data = ResumeData(json!({
            "personalInfo": { "name": "Jane Doe", "summary": "Engineer" },
            "experience": [{ "title": "Dev" }],
            "education": [],
            "skills": ["Go", "Rust"],
            "projects": null
        }));
        assert_eq!(
            data.populated_sections(),
            vec!["summary", "experience", "skills"]
        );
    }

    #[test]
    fn test_blank_summary_is_not_populated() {
        let data = ResumeData(json!({ "personalInfo": { "summary": "   " } }));
        assert!(data.populated_sections().is_empty());
    }

    #[test]
    fn test_non_object_data_has_no_sections() {
        assert!(ResumeData(Value::Null).populated_sections().is_empty());
        assert!(ResumeData(json!("text")).populated_sections().is_empty());
    }
}
