//! Generic section layouts used when a template has no native section for a
//! populated content block.

use serde_json::{json, Value};

use crate::models::template::TemplateNode;

fn title_style() -> Value {
    json!({ "fontSize": "20px", "fontWeight": "bold", "color": "primary", "marginBottom": "12px" })
}

fn tag_style() -> Value {
    json!({
        "backgroundColor": "#e5e7eb",
        "color": "#374151",
        "padding": "2px 8px",
        "margin": "2px",
        "borderRadius": "4px",
        "fontSize": "12px"
    })
}

/// Repeatable section over `data_path` with the shared heading look.
fn repeatable(id: &str, title: &str, item_gap: &str, elements: Value) -> Value {
    json!({
        "id": id,
        "type": "repeatable-section",
        "showTitle": true,
        "title": title,
        "dataPath": id,
        "style": { "marginBottom": "24px" },
        "titleStyle": title_style(),
        "itemStyle": { "marginBottom": item_gap },
        "elements": elements
    })
}

/// Default definition for a canonical section id, or `None` if there is none.
pub fn default_section(id: &str) -> Option<TemplateNode> {
    let node = match id {
        "summary" => json!({
            "id": "summary",
            "type": "section",
            "showTitle": true,
            "title": "Summary",
            "style": { "marginBottom": "24px" },
            "titleStyle": title_style(),
            "elements": [
                { "type": "text", "dataPath": "personalInfo.summary", "style": { "lineHeight": "1.6" } }
            ]
        }),
        "experience" => repeatable(
            "experience",
            "Experience",
            "20px",
            json!([
                { "type": "text", "dataPath": "title", "style": { "fontSize": "18px", "fontWeight": "bold" } },
                { "type": "text", "template": "{company} | {location}", "style": { "color": "secondary" } },
                { "type": "text", "template": "{startDate} - {endDate}", "style": { "fontSize": "14px", "color": "secondary", "marginBottom": "8px" } },
                { "type": "list", "dataPath": "description", "itemStyle": { "marginBottom": "4px" } }
            ]),
        ),
        "education" => repeatable(
            "education",
            "Education",
            "16px",
            json!([
                { "type": "text", "dataPath": "degree", "style": { "fontWeight": "bold" } },
                { "type": "text", "dataPath": "institution" },
                { "type": "text", "template": "{year} | GPA: {gpa}", "style": { "fontSize": "14px", "color": "secondary" } }
            ]),
        ),
        "skills" => json!({
            "id": "skills",
            "type": "section",
            "showTitle": true,
            "title": "Skills",
            "style": { "marginBottom": "24px" },
            "titleStyle": title_style(),
            "elements": [
                { "type": "tag-list", "dataPath": "skills", "tagStyle": tag_style() }
            ]
        }),
        "projects" => repeatable(
            "projects",
            "Projects",
            "20px",
            json!([
                { "type": "text", "dataPath": "name", "style": { "fontSize": "18px", "fontWeight": "bold" } },
                { "type": "text", "dataPath": "description", "style": { "marginTop": "4px", "marginBottom": "8px" } },
                { "type": "tag-list", "dataPath": "technologies", "tagStyle": tag_style() }
            ]),
        ),
        "awards" => repeatable(
            "awards",
            "Awards & Certifications",
            "12px",
            json!([
                { "type": "text", "dataPath": "title", "style": { "fontWeight": "bold" } },
                { "type": "text", "template": "{awarder} | {date}", "style": { "color": "secondary", "fontSize": "14px" } }
            ]),
        ),
        "volunteer" => repeatable(
            "volunteer",
            "Volunteer Experience",
            "20px",
            json!([
                { "type": "text", "dataPath": "position", "style": { "fontSize": "18px", "fontWeight": "bold" } },
                { "type": "text", "dataPath": "organization", "style": { "fontStyle": "italic", "color": "secondary" } },
                { "type": "text", "template": "{startDate} - {endDate}", "style": { "fontSize": "14px", "color": "secondary", "marginBottom": "8px" } },
                { "type": "text", "dataPath": "summary" }
            ]),
        ),
        "publications" => repeatable(
            "publications",
            "Publications",
            "12px",
            json!([
                { "type": "text", "dataPath": "name", "style": { "fontWeight": "bold" } },
                { "type": "text", "template": "{publisher} | {releaseDate}", "style": { "color": "secondary", "fontSize": "14px" } }
            ]),
        ),
        "languages" => repeatable(
            "languages",
            "Languages",
            "8px",
            json!([{ "type": "text", "template": "{language}: {fluency}" }]),
        ),
        "interests" => repeatable(
            "interests",
            "Interests",
            "12px",
            json!([
                { "type": "text", "dataPath": "name", "style": { "fontWeight": "bold" } },
                { "type": "tag-list", "dataPath": "keywords", "tagStyle": tag_style() }
            ]),
        ),
        _ => return None,
    };
    serde_json::from_value(node).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::CONTENT_SECTIONS;

    #[test]
    fn test_every_content_section_has_a_known_default() {
        for (id, _) in CONTENT_SECTIONS {
            let node = default_section(id).unwrap_or_else(|| panic!("no default for {id}"));
            assert!(node.kind().is_some(), "{id} default did not parse");
            assert_eq!(node.section_id(), Some(*id));
        }
    }

    #[test]
    fn test_no_default_for_unknown_id() {
        assert!(default_section("header").is_none());
        assert!(default_section("").is_none());
    }
}
