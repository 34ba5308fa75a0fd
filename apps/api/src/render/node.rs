//! Rendered presentation tree. Built fresh per render call, discarded after display or
//! serialization. Styles are fully resolved; text is fully substituted.

use serde::Serialize;

use crate::models::template::Style;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum RenderNode {
    Container {
        style: Style,
        children: Vec<RenderNode>,
    },
    Grid {
        style: Style,
        children: Vec<RenderNode>,
    },
    Sidebar {
        style: Style,
        children: Vec<RenderNode>,
    },
    Main {
        style: Style,
        children: Vec<RenderNode>,
    },
    Section {
        id: Option<String>,
        style: Style,
        title: Option<SectionTitle>,
        children: Vec<RenderNode>,
    },
    RepeatableSection {
        id: Option<String>,
        style: Style,
        title: Option<SectionTitle>,
        items: Vec<RepeatedItem>,
    },
    Text {
        style: Style,
        content: String,
    },
    List {
        style: Style,
        marker: ListMarker,
        item_style: Style,
        items: Vec<String>,
    },
    TagList {
        style: Style,
        tag_style: Style,
        tags: Vec<String>,
    },
    Avatar {
        style: Style,
        initials: String,
    },
    ContactRow {
        style: Style,
        separator: Option<String>,
        entries: Vec<ContactEntry>,
    },
    ContactList {
        style: Style,
        item_style: Style,
        entries: Vec<ContactEntry>,
    },
    Group {
        style: Style,
        children: Vec<RenderNode>,
    },
    FlexRow {
        style: Style,
        children: Vec<RenderNode>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionTitle {
    pub text: String,
    pub icon: Option<String>,
    pub style: Style,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepeatedItem {
    pub style: Style,
    pub children: Vec<RenderNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactEntry {
    pub icon: Option<String>,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ListMarker {
    /// Standard list markers: `disc`, `circle`, `decimal`, ...
    Bulleted { style_type: String },
    /// No markers.
    Plain,
    /// Explicit glyph before each item.
    Custom { glyph: String, style: Style },
}

impl RenderNode {
    /// Every user-visible string in document order (titles, text, items, tags, contacts).
    pub fn visible_text(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            RenderNode::Container { children, .. }
            | RenderNode::Grid { children, .. }
            | RenderNode::Sidebar { children, .. }
            | RenderNode::Main { children, .. }
            | RenderNode::Group { children, .. }
            | RenderNode::FlexRow { children, .. } => {
                children.iter().for_each(|c| c.collect_text(out));
            }
            RenderNode::Section {
                title, children, ..
            } => {
                if let Some(t) = title {
                    out.push(&t.text);
                }
                children.iter().for_each(|c| c.collect_text(out));
            }
            RenderNode::RepeatableSection { title, items, .. } => {
                if let Some(t) = title {
                    out.push(&t.text);
                }
                for item in items {
                    item.children.iter().for_each(|c| c.collect_text(out));
                }
            }
            RenderNode::Text { content, .. } => out.push(content),
            RenderNode::List { items, .. } => out.extend(items.iter().map(String::as_str)),
            RenderNode::TagList { tags, .. } => out.extend(tags.iter().map(String::as_str)),
            RenderNode::Avatar { initials, .. } => out.push(initials),
            RenderNode::ContactRow { entries, .. } | RenderNode::ContactList { entries, .. } => {
                out.extend(entries.iter().map(|e| e.value.as_str()));
            }
        }
    }

    /// Finds a rendered `section` / `repeatable-section` by its template id.
    pub fn find_section(&self, section_id: &str) -> Option<&RenderNode> {
        match self {
            RenderNode::Section { id, .. } | RenderNode::RepeatableSection { id, .. }
                if id.as_deref() == Some(section_id) =>
            {
                Some(self)
            }
            RenderNode::Container { children, .. }
            | RenderNode::Grid { children, .. }
            | RenderNode::Sidebar { children, .. }
            | RenderNode::Main { children, .. } => {
                children.iter().find_map(|c| c.find_section(section_id))
            }
            _ => None,
        }
    }
}
