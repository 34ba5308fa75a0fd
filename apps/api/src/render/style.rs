use std::collections::BTreeMap;

use crate::models::template::Style;

/// A template's named colour palette (`theme.colors`).
#[derive(Debug, Clone, Copy)]
pub struct Palette<'a> {
    colors: &'a BTreeMap<String, String>,
}

impl<'a> Palette<'a> {
    pub fn new(colors: &'a BTreeMap<String, String>) -> Self {
        Self { colors }
    }

    /// Palette keys resolve to their literal colour; anything else is already literal.
    pub fn resolve_color(&self, value: &str) -> String {
        self.colors
            .get(value)
            .cloned()
            .unwrap_or_else(|| value.to_string())
    }

    /// Resolves colour properties; every other property passes through untouched.
    pub fn resolve(&self, style: Option<&Style>) -> Style {
        let Some(style) = style else {
            return Style::default();
        };
        let color = |c: &Option<String>| {
            c.as_deref()
                .filter(|v| !v.is_empty())
                .map(|v| self.resolve_color(v))
        };
        Style {
            color: color(&style.color),
            background_color: color(&style.background_color),
            border_color: color(&style.border_color),
            rest: style.rest.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn colors() -> BTreeMap<String, String> {
        [("primary", "#2563eb"), ("background", "#ffffff")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_palette_key_resolves() {
        let colors = colors();
        assert_eq!(Palette::new(&colors).resolve_color("primary"), "#2563eb");
    }

    #[test]
    fn test_literal_passes_through() {
        let colors = colors();
        let palette = Palette::new(&colors);
        assert_eq!(palette.resolve_color("#000000"), "#000000");
        assert_eq!(palette.resolve_color("accent"), "accent");
    }

    #[test]
    fn test_resolve_style_only_touches_colours() {
        let colors = colors();
        let style: Style = serde_json::from_value(json!({
            "color": "primary",
            "backgroundColor": "background",
            "borderColor": "#111111",
            "fontSize": "14px",
            "padding": "primary"
        }))
        .unwrap();

        let resolved = Palette::new(&colors).resolve(Some(&style));
        assert_eq!(resolved.color.as_deref(), Some("#2563eb"));
        assert_eq!(resolved.background_color.as_deref(), Some("#ffffff"));
        assert_eq!(resolved.border_color.as_deref(), Some("#111111"));
        assert_eq!(resolved.rest.get("fontSize"), Some(&json!("14px")));
        assert_eq!(resolved.rest.get("padding"), Some(&json!("primary")));
    }

    #[test]
    fn test_missing_style_is_empty() {
        let colors = colors();
        assert!(Palette::new(&colors).resolve(None).is_empty());
    }
}
