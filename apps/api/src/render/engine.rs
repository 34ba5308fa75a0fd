//! Template interpreter.
//!
//! Two mutually recursive entry points mirror the template grammar:
//! - `render_section` handles layout nodes (`sidebar`, `main`, `section`,
//!   `repeatable-section`); only `repeatable-section` changes the data scope.
//! - `render_element` handles leaf and grouping nodes, which only read.
//!
//! Every function returns `Option<RenderNode>`: `None` means "suppressed". Missing data,
//! empty collections, malformed nodes and unknown node types all suppress; nothing here
//! can fail. Rendering is pure: same (template, data) in, equal tree out.

use std::borrow::Cow;

use serde_json::Value;
use tracing::debug;

use crate::models::resume::ResumeData;
use crate::models::template::{
    AvatarNode, ContactNode, GroupNode, LayoutNode, ListNode, NodeKind, RootKind, SectionNode,
    Style, TagListNode, Template, TemplateNode, TextNode,
};
use crate::render::node::{ContactEntry, ListMarker, RenderNode, RepeatedItem, SectionTitle};
use crate::render::path::{resolve_path, PathAliases};
use crate::render::style::Palette;
use crate::render::substitute::{
    display_value, join_values, parse_text_template, substitute_fields, TextTemplate,
};

const DEFAULT_BACKGROUND: &str = "#ffffff";
const DEFAULT_LIST_STYLE: &str = "disc";
const DEFAULT_CUSTOM_MARKER: &str = "•";
const MAX_INITIALS: usize = 3;

/// Renders `template` against `data` into a fresh presentation tree.
pub fn render(template: &Template, data: &ResumeData) -> RenderNode {
    Renderer::new(template).render(data.as_value())
}

/// The data object a node reads from. `root` is true only for the top-level resume
/// object; repeatable-section items are never root.
#[derive(Debug, Clone, Copy)]
struct Scope<'d> {
    value: &'d Value,
    root: bool,
}

pub struct Renderer<'t> {
    template: &'t Template,
    palette: Palette<'t>,
    aliases: PathAliases<'t>,
}

impl<'t> Renderer<'t> {
    pub fn new(template: &'t Template) -> Self {
        Self {
            template,
            palette: Palette::new(&template.theme.colors),
            aliases: PathAliases::new(&template.data_aliases),
        }
    }

    pub fn render(&self, data: &Value) -> RenderNode {
        let root = &self.template.structure;

        let mut style = self.style(root.style.as_ref());
        if style
            .background_color
            .as_deref()
            .map_or(true, |bg| bg == "background")
        {
            style.background_color = Some(DEFAULT_BACKGROUND.to_string());
        }

        let scope = Scope {
            value: data,
            root: true,
        };
        let children = self.render_sections(root.sections.as_deref(), scope);

        match root.kind {
            RootKind::Container => RenderNode::Container { style, children },
            RootKind::Grid => RenderNode::Grid { style, children },
        }
    }

    // ────────────────────────────────────────────────────────────────────────
    // Layout / section nodes
    // ────────────────────────────────────────────────────────────────────────

    fn render_sections(&self, nodes: Option<&[TemplateNode]>, scope: Scope<'_>) -> Vec<RenderNode> {
        nodes
            .unwrap_or_default()
            .iter()
            .filter_map(|node| self.render_section(node, scope))
            .collect()
    }

    fn render_section(&self, node: &TemplateNode, scope: Scope<'_>) -> Option<RenderNode> {
        let Some(kind) = node.kind() else {
            debug!(node_type = node.type_name(), "skipping unknown section node");
            return None;
        };

        match kind {
            NodeKind::Sidebar(layout) => self
                .render_layout(layout, scope)
                .map(|(style, children)| RenderNode::Sidebar { style, children }),
            NodeKind::Main(layout) => self
                .render_layout(layout, scope)
                .map(|(style, children)| RenderNode::Main { style, children }),
            NodeKind::Section(section) => self.render_plain_section(section, scope),
            NodeKind::RepeatableSection(section) => self.render_repeatable_section(section, scope),
            NodeKind::Text(_)
            | NodeKind::List(_)
            | NodeKind::TagList(_)
            | NodeKind::Avatar(_)
            | NodeKind::ContactRow(_)
            | NodeKind::ContactList(_)
            | NodeKind::Group(_)
            | NodeKind::FlexRow(_) => {
                debug!(
                    node_type = kind.type_name(),
                    "element node in section position; skipping"
                );
                None
            }
        }
    }

    fn render_layout(&self, layout: &LayoutNode, scope: Scope<'_>) -> Option<(Style, Vec<RenderNode>)> {
        let children = non_empty(self.render_sections(layout.sections.as_deref(), scope))?;
        Some((self.style(layout.style.as_ref()), children))
    }

    fn render_plain_section(&self, section: &SectionNode, scope: Scope<'_>) -> Option<RenderNode> {
        let children = non_empty(self.render_elements(section.elements.as_deref(), scope))?;
        Some(RenderNode::Section {
            id: section.id.clone(),
            style: self.style(section.style.as_ref()),
            title: self.section_title(section),
            children,
        })
    }

    fn render_repeatable_section(
        &self,
        section: &SectionNode,
        scope: Scope<'_>,
    ) -> Option<RenderNode> {
        let Some(path) = section.data_path.as_deref() else {
            debug!(section_id = ?section.id, "repeatable-section without dataPath; suppressing");
            return None;
        };
        let records = self.resolve(Some(path), scope)?.as_array()?;

        let item_style = self.style(section.item_style.as_ref());
        let items: Vec<RepeatedItem> = records
            .iter()
            .filter_map(|record| {
                let item_scope = Scope {
                    value: record,
                    root: false,
                };
                let children =
                    non_empty(self.render_elements(section.elements.as_deref(), item_scope))?;
                Some(RepeatedItem {
                    style: item_style.clone(),
                    children,
                })
            })
            .collect();

        Some(RenderNode::RepeatableSection {
            id: section.id.clone(),
            style: self.style(section.style.as_ref()),
            title: self.section_title(section),
            items: non_empty(items)?,
        })
    }

    fn section_title(&self, section: &SectionNode) -> Option<SectionTitle> {
        if !section.show_title {
            return None;
        }
        let text = section.title.as_deref().filter(|t| !t.trim().is_empty())?;
        Some(SectionTitle {
            text: text.to_string(),
            icon: section.title_icon.clone(),
            style: self.style(section.title_style.as_ref()),
        })
    }

    // ────────────────────────────────────────────────────────────────────────
    // Leaf / element nodes
    // ────────────────────────────────────────────────────────────────────────

    fn render_elements(&self, nodes: Option<&[TemplateNode]>, scope: Scope<'_>) -> Vec<RenderNode> {
        nodes
            .unwrap_or_default()
            .iter()
            .filter_map(|node| self.render_element(node, scope))
            .collect()
    }

    fn render_element(&self, node: &TemplateNode, scope: Scope<'_>) -> Option<RenderNode> {
        let Some(kind) = node.kind() else {
            debug!(node_type = node.type_name(), "skipping unknown element node");
            return None;
        };

        match kind {
            NodeKind::Text(text) => self.render_text(text, scope),
            NodeKind::List(list) => self.render_list(list, scope),
            NodeKind::TagList(tags) => self.render_tag_list(tags, scope),
            NodeKind::Avatar(avatar) => self.render_avatar(avatar, scope),
            NodeKind::ContactRow(contact) => {
                let entries = self.contact_entries(contact, scope)?;
                Some(RenderNode::ContactRow {
                    style: self.style(contact.style.as_ref()),
                    separator: contact.separator.clone().filter(|s| !s.is_empty()),
                    entries,
                })
            }
            NodeKind::ContactList(contact) => {
                let entries = self.contact_entries(contact, scope)?;
                Some(RenderNode::ContactList {
                    style: self.style(contact.style.as_ref()),
                    item_style: self.style(contact.item_style.as_ref()),
                    entries,
                })
            }
            NodeKind::Group(group) => self
                .render_group(group, scope)
                .map(|(style, children)| RenderNode::Group { style, children }),
            NodeKind::FlexRow(group) => self
                .render_group(group, scope)
                .map(|(style, children)| RenderNode::FlexRow { style, children }),
            NodeKind::Sidebar(_)
            | NodeKind::Main(_)
            | NodeKind::Section(_)
            | NodeKind::RepeatableSection(_) => {
                debug!(
                    node_type = kind.type_name(),
                    "section node in element position; skipping"
                );
                None
            }
        }
    }

    fn render_text(&self, text: &TextNode, scope: Scope<'_>) -> Option<RenderNode> {
        let value = self.resolve(text.data_path.as_deref(), scope);

        let content = match text.template.as_deref().map(parse_text_template) {
            Some(TextTemplate::Join(separator)) => value.map(|v| join_values(v, separator)),
            Some(TextTemplate::Fields(template)) => substitute_fields(template, scope.value),
            None => value.map(display_value),
        }?;

        if content.trim().is_empty() {
            return None;
        }
        Some(RenderNode::Text {
            style: self.style(text.style.as_ref()),
            content,
        })
    }

    fn render_list(&self, list: &ListNode, scope: Scope<'_>) -> Option<RenderNode> {
        let items = string_items(self.resolve(list.data_path.as_deref(), scope))?;

        let marker = match list.list_style.as_deref() {
            Some("none") => ListMarker::Plain,
            Some("custom") => ListMarker::Custom {
                glyph: list
                    .list_marker
                    .clone()
                    .unwrap_or_else(|| DEFAULT_CUSTOM_MARKER.to_string()),
                style: self.style(list.marker_style.as_ref()),
            },
            Some(other) if !other.is_empty() => ListMarker::Bulleted {
                style_type: other.to_string(),
            },
            _ => ListMarker::Bulleted {
                style_type: DEFAULT_LIST_STYLE.to_string(),
            },
        };

        Some(RenderNode::List {
            style: self.style(list.style.as_ref()),
            marker,
            item_style: self.style(list.item_style.as_ref()),
            items,
        })
    }

    fn render_tag_list(&self, tags: &TagListNode, scope: Scope<'_>) -> Option<RenderNode> {
        let values = string_items(self.resolve(tags.data_path.as_deref(), scope))?;
        Some(RenderNode::TagList {
            style: self.style(tags.style.as_ref()),
            tag_style: self.style(tags.tag_style.as_ref()),
            tags: values,
        })
    }

    fn render_avatar(&self, avatar: &AvatarNode, scope: Scope<'_>) -> Option<RenderNode> {
        let name = display_value(self.resolve(avatar.data_path.as_deref(), scope)?);
        let initials = initials(&name);
        if initials.is_empty() {
            return None;
        }
        Some(RenderNode::Avatar {
            style: self.style(avatar.style.as_ref()),
            initials,
        })
    }

    fn render_group(&self, group: &GroupNode, scope: Scope<'_>) -> Option<(Style, Vec<RenderNode>)> {
        let children = non_empty(self.render_elements(group.elements.as_deref(), scope))?;
        Some((self.style(group.style.as_ref()), children))
    }

    /// Each contact entry resolves independently; empty ones are dropped.
    fn contact_entries(&self, contact: &ContactNode, scope: Scope<'_>) -> Option<Vec<ContactEntry>> {
        let entries = contact
            .items
            .as_deref()
            .unwrap_or_default()
            .iter()
            .filter_map(|item| {
                let path = item.data_path.as_deref()?;
                let value = display_value(self.resolve(Some(path), scope)?);
                (!value.trim().is_empty()).then(|| ContactEntry {
                    icon: item.icon.clone(),
                    value,
                })
            })
            .collect();
        non_empty(entries)
    }

    // ────────────────────────────────────────────────────────────────────────
    // Helpers
    // ────────────────────────────────────────────────────────────────────────

    /// A node without `dataPath` reads the scope itself. Aliases apply at root scope only.
    fn resolve<'d>(&self, path: Option<&str>, scope: Scope<'d>) -> Option<&'d Value> {
        match path {
            None => (!scope.value.is_null()).then_some(scope.value),
            Some(path) if scope.root => {
                let rewritten = self.aliases.rewrite(path);
                if let Cow::Owned(target) = &rewritten {
                    debug!(from = path, to = %target, "path alias applied");
                }
                resolve_path(scope.value, &rewritten)
            }
            Some(path) => resolve_path(scope.value, path),
        }
    }

    fn style(&self, style: Option<&Style>) -> Style {
        self.palette.resolve(style)
    }
}

/// First letter of up to three whitespace-separated words, uppercased.
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .take(MAX_INITIALS)
        .collect()
}

fn string_items(value: Option<&Value>) -> Option<Vec<String>> {
    let items = value?
        .as_array()?
        .iter()
        .map(display_value)
        .filter(|s| !s.trim().is_empty())
        .collect();
    non_empty(items)
}

fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    (!items.is_empty()).then_some(items)
}
