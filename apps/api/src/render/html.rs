//! Static HTML serialization of a rendered tree.
//!
//! Produces self-contained markup with inline styles so the output can be
//! previewed, wrapped for print, or handed to the PDF capture service as-is.

use std::fmt::Write;

use serde_json::Value;

use crate::models::template::Style;
use crate::render::node::{ContactEntry, ListMarker, RenderNode, SectionTitle};

/// CSS properties that take bare numbers; every other numeric value gets `px`.
const UNITLESS_PROPERTIES: &[&str] = &[
    "fontWeight",
    "lineHeight",
    "opacity",
    "zIndex",
    "flex",
    "flexGrow",
    "flexShrink",
    "order",
];

pub fn to_html(node: &RenderNode) -> String {
    let mut out = String::new();
    write_node(&mut out, node);
    out
}

fn write_node(out: &mut String, node: &RenderNode) {
    match node {
        RenderNode::Container { style, children } | RenderNode::Grid { style, children } => {
            open(out, "div", Some("page"), style, None);
            children.iter().for_each(|c| write_node(out, c));
            out.push_str("</div>");
        }
        RenderNode::Sidebar { style, children } => {
            open(out, "div", Some("resume-sidebar"), style, None);
            children.iter().for_each(|c| write_node(out, c));
            out.push_str("</div>");
        }
        RenderNode::Main { style, children } => {
            open(out, "div", Some("resume-main"), style, None);
            children.iter().for_each(|c| write_node(out, c));
            out.push_str("</div>");
        }
        RenderNode::Section {
            id,
            style,
            title,
            children,
        } => {
            open_section(out, id.as_deref(), style, title.as_ref());
            children.iter().for_each(|c| write_node(out, c));
            out.push_str("</div></div>");
        }
        RenderNode::RepeatableSection {
            id,
            style,
            title,
            items,
        } => {
            open_section(out, id.as_deref(), style, title.as_ref());
            for item in items {
                open(out, "div", Some("repeatable-item"), &item.style, None);
                item.children.iter().for_each(|c| write_node(out, c));
                out.push_str("</div>");
            }
            out.push_str("</div></div>");
        }
        RenderNode::Text { style, content } => {
            open(out, "div", None, style, None);
            push_escaped(out, content);
            out.push_str("</div>");
        }
        RenderNode::List {
            style,
            marker,
            item_style,
            items,
        } => write_list(out, style, marker, item_style, items),
        RenderNode::TagList {
            style,
            tag_style,
            tags,
        } => {
            open(out, "div", Some("tag-list"), style, None);
            for tag in tags {
                open(out, "span", Some("tag"), tag_style, None);
                push_escaped(out, tag);
                out.push_str("</span>");
            }
            out.push_str("</div>");
        }
        RenderNode::Avatar { style, initials } => {
            open(out, "div", Some("avatar"), style, None);
            push_escaped(out, initials);
            out.push_str("</div>");
        }
        RenderNode::ContactRow {
            style,
            separator,
            entries,
        } => {
            open(out, "div", Some("contact-row"), style, None);
            for (i, entry) in entries.iter().enumerate() {
                if let (Some(sep), true) = (separator, i > 0) {
                    out.push_str(r#"<span class="contact-separator" style="margin:0 8px">"#);
                    push_escaped(out, sep);
                    out.push_str("</span>");
                }
                out.push_str(
                    r#"<span class="contact-item" style="display:flex;align-items:center;gap:4px">"#,
                );
                write_contact(out, entry);
                out.push_str("</span>");
            }
            out.push_str("</div>");
        }
        RenderNode::ContactList {
            style,
            item_style,
            entries,
        } => {
            open(out, "div", Some("contact-list"), style, None);
            for entry in entries {
                open(out, "div", Some("contact-item"), item_style, None);
                write_contact(out, entry);
                out.push_str("</div>");
            }
            out.push_str("</div>");
        }
        RenderNode::Group { style, children } => {
            open(out, "div", Some("group"), style, None);
            children.iter().for_each(|c| write_node(out, c));
            out.push_str("</div>");
        }
        RenderNode::FlexRow { style, children } => {
            open(out, "div", Some("flex-row"), style, None);
            children.iter().for_each(|c| write_node(out, c));
            out.push_str("</div>");
        }
    }
}

/// Sections sit in an inline-block wrapper so print pagination keeps them whole.
fn open_section(out: &mut String, id: Option<&str>, style: &Style, title: Option<&SectionTitle>) {
    out.push_str(r#"<div class="section-wrapper" style="display:inline-block;width:100%">"#);
    open(out, "div", Some("resume-section"), style, id);
    if let Some(title) = title {
        open(out, "div", Some("section-title"), &title.style, None);
        if let Some(icon) = &title.icon {
            write_icon(out, icon);
        }
        push_escaped(out, &title.text);
        out.push_str("</div>");
    }
}

fn write_list(
    out: &mut String,
    style: &Style,
    marker: &ListMarker,
    item_style: &Style,
    items: &[String],
) {
    let (tag, list_style_type) = match marker {
        ListMarker::Bulleted { style_type } => ("ul", style_type.as_str()),
        ListMarker::Plain => ("div", "none"),
        ListMarker::Custom { .. } => ("ul", "none"),
    };

    let _ = write!(out, "<{tag} style=\"");
    push_escaped(out, &css(style));
    out.push_str("list-style-type:");
    push_escaped(out, list_style_type);
    out.push_str("\">");

    for item in items {
        match marker {
            ListMarker::Custom { glyph, style: marker_style } => {
                open(out, "div", None, item_style, None);
                open(out, "span", Some("list-marker"), marker_style, None);
                push_escaped(out, glyph);
                out.push_str("</span><span>");
                push_escaped(out, item);
                out.push_str("</span></div>");
            }
            ListMarker::Bulleted { .. } | ListMarker::Plain => {
                open(out, "li", None, item_style, None);
                push_escaped(out, item);
                out.push_str("</li>");
            }
        }
    }
    let _ = write!(out, "</{tag}>");
}

fn write_contact(out: &mut String, entry: &ContactEntry) {
    if let Some(icon) = &entry.icon {
        write_icon(out, icon);
    }
    out.push_str("<span>");
    push_escaped(out, &entry.value);
    out.push_str("</span>");
}

fn write_icon(out: &mut String, name: &str) {
    out.push_str(r#"<span class="icon icon-"#);
    push_escaped(out, name);
    out.push_str(r#"" aria-hidden="true"></span>"#);
}

fn open(out: &mut String, tag: &str, class: Option<&str>, style: &Style, section_id: Option<&str>) {
    let _ = write!(out, "<{tag}");
    if let Some(class) = class {
        let _ = write!(out, " class=\"{class}\"");
    }
    if let Some(id) = section_id {
        out.push_str(" data-section=\"");
        push_escaped(out, id);
        out.push('"');
    }
    if !style.is_empty() {
        out.push_str(" style=\"");
        push_escaped(out, &css(style));
        out.push('"');
    }
    out.push('>');
}

/// Inline declaration list, each declaration terminated by `;`.
pub fn css(style: &Style) -> String {
    let mut out = String::new();
    let colours = [
        ("color", &style.color),
        ("background-color", &style.background_color),
        ("border-color", &style.border_color),
    ];
    for (property, value) in colours {
        if let Some(value) = value {
            let _ = write!(out, "{property}:{value};");
        }
    }
    for (key, value) in &style.rest {
        let value = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) if UNITLESS_PROPERTIES.contains(&key.as_str()) => n.to_string(),
            Value::Number(n) => format!("{n}px"),
            _ => continue,
        };
        let _ = write!(out, "{}:{value};", kebab_case(key));
    }
    out
}

/// `backgroundColor` -> `background-color`, `WebkitPrintColorAdjust` -> `-webkit-print-color-adjust`.
fn kebab_case(property: &str) -> String {
    let mut out = String::with_capacity(property.len() + 4);
    for c in property.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn push_escaped(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::models::resume::ResumeData;
    use crate::models::template::Template;
    use crate::render::engine::render;

    fn style(value: Value) -> Style {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_css_converts_property_names() {
        let s = style(json!({
            "color": "#111",
            "fontSize": "14px",
            "marginBottom": 8,
            "fontWeight": 600,
            "WebkitPrintColorAdjust": "exact"
        }));
        let css = css(&s);
        assert!(css.starts_with("color:#111;"));
        assert!(css.contains("font-size:14px;"));
        assert!(css.contains("margin-bottom:8px;"));
        assert!(css.contains("font-weight:600;"));
        assert!(css.contains("-webkit-print-color-adjust:exact;"));
    }

    #[test]
    fn test_text_is_escaped() {
        let node = RenderNode::Text {
            style: Style::default(),
            content: "R&D <script>\"x\"</script>".to_string(),
        };
        assert_eq!(
            to_html(&node),
            "<div>R&amp;D &lt;script&gt;&quot;x&quot;&lt;/script&gt;</div>"
        );
    }

    #[test]
    fn test_contact_row_separators_only_between_entries() {
        let node = RenderNode::ContactRow {
            style: Style::default(),
            separator: Some("|".to_string()),
            entries: vec![
                ContactEntry {
                    icon: Some("mail".to_string()),
                    value: "a@b.c".to_string(),
                },
                ContactEntry {
                    icon: None,
                    value: "NY".to_string(),
                },
            ],
        };
        let html = to_html(&node);
        assert_eq!(html.matches("contact-separator").count(), 1);
        assert!(html.contains(r#"<span class="icon icon-mail" aria-hidden="true"></span>"#));
        assert!(html.find("a@b.c") < html.find("contact-separator"));
    }

    #[test]
    fn test_custom_list_markers() {
        let node = RenderNode::List {
            style: Style::default(),
            marker: ListMarker::Custom {
                glyph: "▸".to_string(),
                style: style(json!({ "color": "#7c3aed" })),
            },
            item_style: Style::default(),
            items: vec!["Built X".to_string()],
        };
        let html = to_html(&node);
        assert!(html.starts_with(r#"<ul style="list-style-type:none">"#));
        assert!(html.contains(
            r#"<span class="list-marker" style="color:#7c3aed;">▸</span><span>Built X</span>"#
        ));
    }

    #[test]
    fn test_list_style_cannot_leave_the_attribute() {
        let node = RenderNode::List {
            style: Style::default(),
            marker: ListMarker::Bulleted {
                style_type: "disc\"><script>alert(1)</script><ul x=\"".to_string(),
            },
            item_style: Style::default(),
            items: vec!["Rust".to_string()],
        };
        let html = to_html(&node);
        assert!(!html.contains("<script>"));
        assert!(html.starts_with(
            r#"<ul style="list-style-type:disc&quot;&gt;&lt;script&gt;alert(1)&lt;/script&gt;&lt;ul x=&quot;">"#
        ));
    }

    #[test]
    fn test_rendered_template_markup() {
        let template: Template = serde_json::from_value(json!({
            "id": "t",
            "name": "T",
            "theme": { "colors": { "primary": "#2563eb" } },
            "structure": {
                "type": "container",
                "sections": [{
                    "type": "repeatable-section",
                    "id": "experience",
                    "showTitle": true,
                    "title": "Experience",
                    "titleStyle": { "color": "primary" },
                    "dataPath": "experience",
                    "elements": [{ "type": "text", "dataPath": "title" }]
                }]
            }
        }))
        .unwrap();
        let data = ResumeData(json!({ "experience": [{ "title": "Dev" }, { "title": "Lead" }] }));

        let html = to_html(&render(&template, &data));
        assert!(html.starts_with(r#"<div class="page" style="background-color:#ffffff;">"#));
        assert!(html.contains(r#"data-section="experience""#));
        assert!(html.contains(r#"<div class="section-title" style="color:#2563eb;">Experience</div>"#));
        assert_eq!(html.matches(r#"class="repeatable-item""#).count(), 2);
        assert!(html.ends_with("</div></div></div>"));
    }
}
