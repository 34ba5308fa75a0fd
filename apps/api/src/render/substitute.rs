//! Template-string substitution for `text` nodes.
//!
//! Two forms:
//! - `"{company} | {location}"`: each `{field}` is looked up one level deep on the
//!   current record (not dotted) and replaced by its display string, or `""`.
//! - `"{join:', '}"`: joins the node's resolved array value with the quoted separator.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::Value;

static FIELD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{(\w+)\}").unwrap());
static JOIN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\{join:'(.*)'\}$").unwrap());

const DEFAULT_SEPARATOR: &str = ", ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextTemplate<'t> {
    Join(&'t str),
    Fields(&'t str),
}

pub fn parse_text_template(template: &str) -> TextTemplate<'_> {
    if template.starts_with("{join:") {
        let separator = JOIN_RE
            .captures(template)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
            .unwrap_or(DEFAULT_SEPARATOR);
        TextTemplate::Join(separator)
    } else {
        TextTemplate::Fields(template)
    }
}

/// Display string for a data value. Absent-like values (`null`, `false`, objects)
/// become `""`; arrays are joined with `", "`.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null | Value::Bool(false) | Value::Object(_) => String::new(),
        Value::Bool(true) => "true".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(_) => join_values(value, DEFAULT_SEPARATOR),
    }
}

/// Joins an array's display strings with `separator`; scalars display as themselves.
pub fn join_values(value: &Value, separator: &str) -> String {
    match value {
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(separator),
        other => display_value(other),
    }
}

/// Replaces every `{field}` with the record's field. Returns `None` when the template has
/// placeholders and every one of them resolved empty, so `" | "` never reaches output.
pub fn substitute_fields(template: &str, record: &Value) -> Option<String> {
    let mut placeholders = 0usize;
    let mut filled = 0usize;

    let out = FIELD_RE.replace_all(template, |caps: &Captures| {
        placeholders += 1;
        let text = record.get(&caps[1]).map(display_value).unwrap_or_default();
        if !text.is_empty() {
            filled += 1;
        }
        text
    });

    if placeholders > 0 && filled == 0 {
        return None;
    }
    Some(out.into_owned())
}
