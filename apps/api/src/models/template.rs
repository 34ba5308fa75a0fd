//! Template document model: the declarative grammar a resume template is written in.
//!
//! Templates are shared, read-only inputs to the renderer. Nodes are parsed leniently:
//! any node whose `type` is unknown, or whose fields do not fit the grammar, is kept
//! verbatim as [`TemplateNode::Unknown`] so it round-trips through storage and renders
//! as nothing.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;

// ────────────────────────────────────────────────────────────────────────────
// Template document
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub theme: Theme,
    pub structure: TemplateRoot,
    /// Root-scope path rewrites for templates authored against a legacy data shape,
    /// e.g. `"basics" -> "personalInfo"`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub data_aliases: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    /// Palette keys (primary, secondary, accent, text, background, card) to literal colours.
    #[serde(default)]
    pub colors: BTreeMap<String, String>,
    #[serde(default)]
    pub fonts: Map<String, Value>,
}

/// Lightweight listing entry for the template picker.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSummary {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub colors: BTreeMap<String, String>,
}

impl Template {
    pub fn summary(&self) -> TemplateSummary {
        TemplateSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            colors: self.theme.colors.clone(),
        }
    }
}

/// A template as stored in the `templates` table (JSONB columns).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TemplateRow {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub theme: Value,
    pub structure: Value,
    pub data_aliases: Option<Value>,
    pub updated_at: DateTime<Utc>,
}

impl TemplateRow {
    pub fn into_template(self) -> Result<Template, serde_json::Error> {
        Ok(Template {
            id: self.id,
            name: self.name,
            description: self.description,
            category: self.category,
            theme: serde_json::from_value(self.theme)?,
            structure: serde_json::from_value(self.structure)?,
            data_aliases: match self.data_aliases {
                Some(Value::Null) | None => BTreeMap::new(),
                Some(aliases) => serde_json::from_value(aliases)?,
            },
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Structure grammar
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RootKind {
    Grid,
    #[default]
    #[serde(other)]
    Container,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateRoot {
    #[serde(rename = "type", default)]
    pub kind: RootKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Style>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<TemplateNode>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TemplateNode {
    Known(NodeKind),
    /// Forward-compatible or malformed node, preserved as authored.
    Unknown(Value),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum NodeKind {
    Sidebar(LayoutNode),
    Main(LayoutNode),
    Section(SectionNode),
    RepeatableSection(SectionNode),
    Text(TextNode),
    List(ListNode),
    TagList(TagListNode),
    Avatar(AvatarNode),
    ContactRow(ContactNode),
    ContactList(ContactNode),
    Group(GroupNode),
    FlexRow(GroupNode),
}

impl TemplateNode {
    pub fn kind(&self) -> Option<&NodeKind> {
        match self {
            TemplateNode::Known(kind) => Some(kind),
            TemplateNode::Unknown(_) => None,
        }
    }

    /// The authored `type` string, including for unknown nodes.
    pub fn type_name(&self) -> &str {
        match self {
            TemplateNode::Known(kind) => kind.type_name(),
            TemplateNode::Unknown(raw) => raw.get("type").and_then(Value::as_str).unwrap_or(""),
        }
    }

    /// Section identifier (`id`) for content sections; `None` for layout and leaf nodes.
    pub fn section_id(&self) -> Option<&str> {
        match self.kind()? {
            NodeKind::Section(s) | NodeKind::RepeatableSection(s) => s.id.as_deref(),
            _ => None,
        }
    }
}

impl NodeKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            NodeKind::Sidebar(_) => "sidebar",
            NodeKind::Main(_) => "main",
            NodeKind::Section(_) => "section",
            NodeKind::RepeatableSection(_) => "repeatable-section",
            NodeKind::Text(_) => "text",
            NodeKind::List(_) => "list",
            NodeKind::TagList(_) => "tag-list",
            NodeKind::Avatar(_) => "avatar",
            NodeKind::ContactRow(_) => "contact-row",
            NodeKind::ContactList(_) => "contact-list",
            NodeKind::Group(_) => "group",
            NodeKind::FlexRow(_) => "flex-row",
        }
    }
}

/// `sidebar` / `main`: grouping containers with nested `sections[]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Style>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<TemplateNode>>,
}

/// `section` / `repeatable-section`. `data_path` is only meaningful for the repeatable form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub show_title: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Style>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_style: Option<Style>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_style: Option<Style>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elements: Option<Vec<TemplateNode>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_path: Option<String>,
    /// `"{company} | {location}"` field substitution, or the `{join:'sep'}` form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Style>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_path: Option<String>,
    /// `disc`, `circle`, ... for bulleted lists; `none`; or `custom` with `list_marker`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_marker: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Style>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_style: Option<Style>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker_style: Option<Style>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagListNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Style>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_style: Option<Style>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvatarNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Style>,
}

/// `contact-row` / `contact-list`. `separator` only applies to rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub separator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Style>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_style: Option<Style>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<ContactItem>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_path: Option<String>,
}

/// `group` / `flex-row`: structural grouping, same data scope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Style>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elements: Option<Vec<TemplateNode>>,
}

// ────────────────────────────────────────────────────────────────────────────
// Style bag
// ────────────────────────────────────────────────────────────────────────────

/// Semi-structured style object. Colour properties are the only fields the renderer
/// inspects (palette-key resolution); everything else is opaque and passed through.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl Style {
    pub fn is_empty(&self) -> bool {
        self.color.is_none()
            && self.background_color.is_none()
            && self.border_color.is_none()
            && self.rest.is_empty()
    }
}
