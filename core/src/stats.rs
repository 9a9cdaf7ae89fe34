use serde_json::Value;

use crate::{spaced_json, COLOR_TOKENS_SECTION, FONT_SECTION, VARIABLES_SECTION};

/// Counters printed after a clean. Each is `None` when its section is absent.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TokenStats {
    pub colors: Option<usize>,
    pub fonts: Option<usize>,
    /// Rough estimate, not an exact count. See [`semantic_estimate`].
    pub semantic: Option<usize>,
}
impl TokenStats {
    pub fn collect(doc: &Value) -> TokenStats {
        TokenStats {
            colors: doc.get(VARIABLES_SECTION).map(color_count),
            fonts: doc.get(FONT_SECTION).and_then(entry_count),
            semantic: doc.get(COLOR_TOKENS_SECTION).map(semantic_estimate),
        }
    }
}

/// Sum of entries of every object-valued group under `colors`.
fn color_count(variables: &Value) -> usize {
    match variables.get("colors") {
        Some(Value::Object(groups)) => groups
            .values()
            .filter_map(Value::as_object)
            .map(|group| group.len())
            .sum(),
        _ => 0,
    }
}

fn entry_count(section: &Value) -> Option<usize> {
    match section {
        Value::Object(map) => Some(map.len()),
        Value::Array(items) => Some(items.len()),
        Value::String(text) => Some(text.chars().count()),
        _ => None,
    }
}

/// Length of the section's single-line text once every `type` is cut out,
/// divided by ten. Only a ballpark figure of how many semantic tokens exist.
pub fn semantic_estimate(section: &Value) -> usize {
    let text = spaced_json(section);
    let kept: usize = text.split("type").map(|piece| piece.chars().count()).sum();
    kept / 10
}

#[test]
fn test_collect() {
    let doc = serde_json::json!({
        "font": {"body": {}, "heading": {}, "caption": {}},
        "variables": {
            "colors": {
                "neutral": {"white": {}, "black": {}},
                "brand": {"primary": {}},
                "loose": "#fff"
            }
        }
    });
    assert_eq!(
        TokenStats::collect(&doc),
        TokenStats {
            colors: Some(3),
            fonts: Some(3),
            semantic: None,
        }
    );
}

#[test]
fn test_missing_colors() {
    let doc = serde_json::json!({"variables": {"spacing": {}}, "font": 12});
    assert_eq!(
        TokenStats::collect(&doc),
        TokenStats {
            colors: Some(0),
            fonts: None,
            semantic: None,
        }
    );
}

#[test]
fn test_odd_shapes_are_not_errors() {
    let doc = serde_json::json!({"variables": 5, "font": true, "color tokens": "type"});
    assert_eq!(
        TokenStats::collect(&doc),
        TokenStats {
            colors: Some(0),
            fonts: None,
            semantic: Some(0),
        }
    );
}

#[test]
fn test_semantic_estimate() {
    // {"a": {"type": "color", "value": "#fff"}} is 41 chars, one "type".
    let section = serde_json::json!({"a": {"type": "color", "value": "#fff"}});
    assert_eq!(spaced_json(&section).len(), 41);
    assert_eq!(semantic_estimate(&section), 3);
    assert_eq!(semantic_estimate(&serde_json::json!({})), 0);
}
