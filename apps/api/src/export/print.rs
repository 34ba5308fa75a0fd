//! Print document assembly for PDF export.

use serde::Serialize;

use crate::models::template::{RootKind, Template};
use crate::render::style::Palette;

const PAGE_FORMAT: &str = "A4";
const DEFAULT_MARGIN: &str = "15mm";
const DEFAULT_PAGE_BACKGROUND: &str = "#ffffff";

/// Page setup forwarded to the capture service.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintOptions {
    pub format: String,
    pub print_background: bool,
    pub margin: PageMargin,
    /// Paint behind the page so full-bleed layouts have no white edge.
    #[serde(skip)]
    pub page_background: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageMargin {
    pub top: String,
    pub right: String,
    pub bottom: String,
    pub left: String,
}

impl PageMargin {
    fn uniform(value: &str) -> Self {
        Self {
            top: value.to_string(),
            right: value.to_string(),
            bottom: value.to_string(),
            left: value.to_string(),
        }
    }
}

impl PrintOptions {
    /// Grid (multi-column) templates print edge to edge; everything else gets 15mm margins.
    pub fn for_template(template: &Template) -> Self {
        let full_bleed = template.structure.kind == RootKind::Grid;
        let margin = if full_bleed { "0" } else { DEFAULT_MARGIN };

        let page_background = if full_bleed {
            Palette::new(&template.theme.colors)
                .resolve(template.structure.style.as_ref())
                .background_color
                .unwrap_or_else(|| DEFAULT_PAGE_BACKGROUND.to_string())
        } else {
            DEFAULT_PAGE_BACKGROUND.to_string()
        };

        Self {
            format: PAGE_FORMAT.to_string(),
            print_background: true,
            margin: PageMargin::uniform(margin),
            page_background,
        }
    }
}

/// Wraps rendered resume markup in a standalone document with print rules:
/// exact colour reproduction and no page breaks inside sections or items.
pub fn wrap_for_print(body_html: &str, options: &PrintOptions) -> String {
    let margin = &options.margin;
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8" />
<style>
@page {{ size: {format}; margin: {top} {right} {bottom} {left}; }}
html, body {{ margin: 0; padding: 0; background: {background}; }}
* {{ -webkit-print-color-adjust: exact !important; print-color-adjust: exact !important; box-sizing: border-box; }}
.page {{ min-height: 100%; }}
.section-wrapper, .resume-section, .repeatable-item, .group {{ break-inside: avoid; page-break-inside: avoid; }}
</style>
</head>
<body>
{body_html}
</body>
</html>
"#,
        format = options.format,
        top = margin.top,
        right = margin.right,
        bottom = margin.bottom,
        left = margin.left,
        background = options.page_background,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::templates::builtin::builtin_templates;

    fn builtin(id: &str) -> Template {
        builtin_templates()
            .unwrap()
            .into_iter()
            .find(|t| t.id == id)
            .unwrap()
    }

    #[test]
    fn test_single_column_templates_get_margins() {
        let options = PrintOptions::for_template(&builtin("modern-professional"));
        assert_eq!(options.margin, PageMargin::uniform("15mm"));
        assert_eq!(options.page_background, "#ffffff");
        assert!(options.print_background);
    }

    #[test]
    fn test_grid_templates_print_full_bleed() {
        let options = PrintOptions::for_template(&builtin("creative-bold"));
        assert_eq!(options.margin, PageMargin::uniform("0"));
        assert_eq!(options.page_background, "#faf5ff");
    }

    #[test]
    fn test_options_wire_format() {
        let options = PrintOptions::for_template(&builtin("minimal-clean"));
        assert_eq!(
            serde_json::to_value(&options).unwrap(),
            json!({
                "format": "A4",
                "printBackground": true,
                "margin": { "top": "15mm", "right": "15mm", "bottom": "15mm", "left": "15mm" }
            })
        );
    }

    #[test]
    fn test_wrap_for_print() {
        let options = PrintOptions::for_template(&builtin("modern-professional"));
        let doc = wrap_for_print(r#"<div class="page">Jane</div>"#, &options);

        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains("@page { size: A4; margin: 15mm 15mm 15mm 15mm; }"));
        assert!(doc.contains("print-color-adjust: exact"));
        assert!(doc.contains("break-inside: avoid"));
        assert!(doc.contains(r#"<body>
<div class="page">Jane</div>
</body>"#));
    }
}
