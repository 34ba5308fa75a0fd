//! Dot-path resolution against a data scope, plus legacy path aliases.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde_json::Value;

/// Resolves a dot-separated path (`"personalInfo.summary"`, `"experience.0.title"`)
/// by sequential lookup. Any missing segment, non-container intermediate, or a final
/// `null` yields `None`. Never panics.
pub fn resolve_path<'a>(scope: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }

    let mut current = scope;
    for segment in path.split('.') {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }

    if current.is_null() {
        None
    } else {
        Some(current)
    }
}

/// Whether a resolved value carries anything worth rendering.
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Bool(true) | Value::Number(_) => true,
    }
}

/// Rewrites root-scope paths written against a legacy data shape onto the canonical one.
///
/// Keys match whole leading segments; the longest matching key wins, so
/// `"basics.label" -> "personalInfo.title"` takes precedence over `"basics" -> "personalInfo"`.
#[derive(Debug, Clone, Copy)]
pub struct PathAliases<'a> {
    aliases: &'a BTreeMap<String, String>,
}

impl<'a> PathAliases<'a> {
    pub fn new(aliases: &'a BTreeMap<String, String>) -> Self {
        Self { aliases }
    }

    pub fn rewrite<'p>(&self, path: &'p str) -> Cow<'p, str> {
        let best = self
            .aliases
            .iter()
            .filter(|(from, _)| {
                path == from.as_str()
                    || (path.starts_with(from.as_str())
                        && path.as_bytes().get(from.len()) == Some(&b'.'))
            })
            .max_by_key(|(from, _)| from.len());

        match best {
            Some((from, to)) => Cow::Owned(format!("{}{}", to, &path[from.len()..])),
            None => Cow::Borrowed(path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolves_nested_value() {
        let data = json!({ "a": { "b": { "c": 5 } } });
        assert_eq!(resolve_path(&data, "a.b.c"), Some(&json!(5)));
    }

    #[test]
    fn test_missing_intermediate_is_absent() {
        assert_eq!(resolve_path(&json!({ "a": { "b": null } }), "a.b.c"), None);
        assert_eq!(resolve_path(&json!({}), "a.b.c"), None);
        assert_eq!(resolve_path(&json!({ "a": "text" }), "a.b"), None);
    }

    #[test]
    fn test_null_leaf_is_absent() {
        assert_eq!(resolve_path(&json!({ "a": null }), "a"), None);
    }

    #[test]
    fn test_array_index_segment() {
        let data = json!({ "experience": [{ "title": "Dev" }] });
        assert_eq!(
            resolve_path(&data, "experience.0.title"),
            Some(&json!("Dev"))
        );
        assert_eq!(resolve_path(&data, "experience.3.title"), None);
        assert_eq!(resolve_path(&data, "experience.first"), None);
    }

    #[test]
    fn test_empty_path_and_empty_segment() {
        let data = json!({ "a": { "b": 1 } });
        assert_eq!(resolve_path(&data, ""), None);
        assert_eq!(resolve_path(&data, "a..b"), None);
    }

    #[test]
    fn test_is_present() {
        assert!(!is_present(&json!("")));
        assert!(!is_present(&json!("  ")));
        assert!(!is_present(&json!([])));
        assert!(!is_present(&json!(false)));
        assert!(is_present(&json!(0)));
        assert!(is_present(&json!(["x"])));
    }

    #[test]
    fn test_alias_longest_prefix_wins() {
        let map: BTreeMap<String, String> = [
            ("basics", "personalInfo"),
            ("basics.label", "personalInfo.title"),
            ("work", "experience"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        let aliases = PathAliases::new(&map);

        assert_eq!(aliases.rewrite("basics.name"), "personalInfo.name");
        assert_eq!(aliases.rewrite("basics.label"), "personalInfo.title");
        assert_eq!(aliases.rewrite("work"), "experience");
        assert_eq!(aliases.rewrite("workshops"), "workshops");
        assert_eq!(aliases.rewrite("personalInfo.name"), "personalInfo.name");
    }
}
