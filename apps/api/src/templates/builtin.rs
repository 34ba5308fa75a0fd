//! Templates compiled into the binary. Always available, even without a database.

use anyhow::{Context, Result};

use crate::models::template::Template;

const BUILTIN_SOURCES: &[(&str, &str)] = &[
    (
        "modern-professional",
        include_str!("../../templates/modern-professional.json"),
    ),
    (
        "classic-elegant",
        include_str!("../../templates/classic-elegant.json"),
    ),
    (
        "creative-bold",
        include_str!("../../templates/creative-bold.json"),
    ),
    ("minimal-clean", include_str!("../../templates/minimal-clean.json")),
    ("dark-vision", include_str!("../../templates/dark-vision.json")),
    ("neo-elegant", include_str!("../../templates/neo-elegant.json")),
];

/// Parses every built-in template, in catalog order.
pub fn builtin_templates() -> Result<Vec<Template>> {
    BUILTIN_SOURCES
        .iter()
        .map(|(name, source)| {
            serde_json::from_str(source)
                .with_context(|| format!("built-in template '{name}' is not valid"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::template::{NodeKind, TemplateNode};

    /// Collects the `type` of every node the grammar does not recognise.
    fn unknown_types<'a>(nodes: &'a [TemplateNode], out: &mut Vec<&'a str>) {
        for node in nodes {
            match node {
                TemplateNode::Unknown(value) => {
                    out.push(value.get("type").and_then(|t| t.as_str()).unwrap_or("?"))
                }
                TemplateNode::Known(NodeKind::Sidebar(l) | NodeKind::Main(l)) => {
                    unknown_types(l.sections.as_deref().unwrap_or_default(), out)
                }
                TemplateNode::Known(NodeKind::Section(s) | NodeKind::RepeatableSection(s)) => {
                    unknown_types(s.elements.as_deref().unwrap_or_default(), out)
                }
                TemplateNode::Known(NodeKind::Group(g) | NodeKind::FlexRow(g)) => {
                    unknown_types(g.elements.as_deref().unwrap_or_default(), out)
                }
                TemplateNode::Known(_) => {}
            }
        }
    }

    #[test]
    fn test_builtin_templates_parse_fully() {
        let templates = builtin_templates().unwrap();
        assert_eq!(templates.len(), BUILTIN_SOURCES.len());

        for (template, (name, _)) in templates.iter().zip(BUILTIN_SOURCES) {
            assert_eq!(&template.id, name);
            assert!(template.theme.colors.contains_key("primary"));
            let mut unknown = Vec::new();
            unknown_types(
                template.structure.sections.as_deref().unwrap_or_default(),
                &mut unknown,
            );
            // dark-vision's timeline dot has no renderer and is kept as an opaque node.
            let expected: &[&str] = match template.id.as_str() {
                "dark-vision" => &["circle-marker"],
                _ => &[],
            };
            assert_eq!(unknown, expected, "{}", template.id);
        }
    }

    #[test]
    fn test_creative_bold_declares_aliases() {
        let creative = builtin_templates()
            .unwrap()
            .into_iter()
            .find(|t| t.id == "creative-bold")
            .unwrap();
        assert_eq!(
            creative.data_aliases.get("basics").map(String::as_str),
            Some("personalInfo")
        );
        assert_eq!(
            creative.data_aliases.get("work").map(String::as_str),
            Some("experience")
        );
    }

    #[test]
    fn test_dark_vision_renders_without_its_marker() {
        use serde_json::json;

        use crate::models::resume::ResumeData;
        use crate::render::{engine::render, html::to_html};

        let dark = builtin_templates()
            .unwrap()
            .into_iter()
            .find(|t| t.id == "dark-vision")
            .unwrap();
        let data = ResumeData(json!({
            "personalInfo": { "name": "Jane Doe" },
            "experience": [{ "title": "Engineer", "company": "Acme" }]
        }));

        let tree = render(&dark, &data);
        assert!(tree.visible_text().contains(&"Engineer"));
        assert!(!to_html(&tree).contains("circle-marker"));
    }
}
