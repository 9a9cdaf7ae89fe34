use std::io;

use indexmap::IndexMap;
use itertools::Itertools;
use serde::Serialize;
use serde_json::{ser::Formatter, Serializer, Value};

pub use expression::{resolve_in_place, resolve_references, Reference, ResolveReport};
pub use extensions::{remove_extensions, sanitize, EXTENSIONS_KEY};
pub use stats::TokenStats;
mod expression;
pub mod extensions;
pub mod stats;

pub const FONT_SECTION: &str = "font";
pub const VARIABLES_SECTION: &str = "variables";
pub const COLOR_TOKENS_SECTION: &str = "color tokens";

/// Top-level sections a token export is expected to carry, in report order.
pub const EXPECTED_SECTIONS: [&str; 3] = [FONT_SECTION, VARIABLES_SECTION, COLOR_TOKENS_SECTION];

pub const CSS_HEADER: &str = "/* Generated from design tokens */";
pub const DEFAULT_CSS_PREFIX: &str = "--";

/// Expected sections present as direct keys of `doc`. Purely informational.
pub fn validate_structure(doc: &Value) -> Vec<&'static str> {
    EXPECTED_SECTIONS
        .into_iter()
        .filter(|section| doc.get(section).is_some())
        .collect()
}

/// CSS custom properties in the order they were first found.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CssVariables {
    vars: IndexMap<String, Value>,
}
impl CssVariables {
    pub fn extract(doc: &Value, prefix: &str) -> CssVariables {
        let mut vars = CssVariables::default();
        vars.collect(doc, prefix, "");
        vars
    }
    fn collect(&mut self, node: &Value, prefix: &str, path: &str) {
        let Value::Object(map) = node else {
            return;
        };
        match (map.get("type"), map.get("value")) {
            (Some(_), Some(value)) => {
                let name = format!("{prefix}{}", path.replace('.', "-"));
                self.vars.insert(name, value.clone());
            }
            _ => {
                for (key, child) in map {
                    let path = if path.is_empty() {
                        key.clone()
                    } else {
                        format!("{path}.{key}")
                    };
                    self.collect(child, prefix, &path);
                }
            }
        }
    }
    pub fn len(&self) -> usize {
        self.vars.len()
    }
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }
    pub fn sorted(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.vars.iter().sorted_by(|a, b| a.0.cmp(b.0))
    }
    pub fn to_css(&self) -> String {
        let body = self
            .sorted()
            .map(|(name, value)| format!("  {name}: {};\n", css_value(value)))
            .join("");
        format!("{CSS_HEADER}\n:root {{\n{body}}}\n")
    }
}

/// Strings are written verbatim, everything else as spaced JSON.
fn css_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => spaced_json(other),
    }
}

/// Single-line JSON with `", "` and `": "` separators.
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }
    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }
    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

pub(crate) fn spaced_json(value: &Value) -> String {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, SpacedFormatter);
    match value.serialize(&mut ser) {
        Ok(()) => String::from_utf8(buf).unwrap_or_else(|_| value.to_string()),
        Err(_) => value.to_string(),
    }
}

#[test]
fn test_validate_structure() {
    let doc = serde_json::json!({"font": {}, "other": {}});
    assert_eq!(validate_structure(&doc), vec!["font"]);

    let doc = serde_json::json!({"color tokens": {}, "variables": {}, "font": {}});
    assert_eq!(
        validate_structure(&doc),
        vec!["font", "variables", "color tokens"]
    );
    assert!(validate_structure(&serde_json::json!(["font"])).is_empty());
}

#[test]
fn test_extract() {
    let doc = serde_json::json!({"colors": {"red": {"type": "color", "value": "#ff0000"}}});
    let vars = CssVariables::extract(&doc, DEFAULT_CSS_PREFIX);
    assert_eq!(vars.len(), 1);
    assert_eq!(vars.get("--colors-red"), Some(&serde_json::json!("#ff0000")));
}

#[test]
fn test_token_is_leaf() {
    let doc = serde_json::json!({
        "button": {
            "type": "color",
            "value": "#111",
            "hover": {"type": "color", "value": "#222"}
        },
        "list": [{"type": "color", "value": "#333"}],
        "size": 4
    });
    let vars = CssVariables::extract(&doc, "--");
    assert_eq!(vars.len(), 1);
    assert_eq!(vars.get("--button"), Some(&serde_json::json!("#111")));
}

#[test]
fn test_dotted_keys_and_prefix() {
    let doc = serde_json::json!({
        "font": {"body 1.5": {"size": {"type": "dimension", "value": 16}}}
    });
    let vars = CssVariables::extract(&doc, "--ds-");
    assert_eq!(vars.get("--ds-font-body 1-5-size"), Some(&serde_json::json!(16)));
}

#[test]
fn test_to_css_sorted() {
    let doc = serde_json::json!({
        "z": {"type": "color", "value": "#000"},
        "a": {
            "b": {"type": "dimension", "value": 2},
            "a": {"type": "string", "value": "Inter, sans-serif"}
        },
        "m": {"type": "shadow", "value": {"x": 1}}
    });
    assert_eq!(
        CssVariables::extract(&doc, "--").to_css(),
        "/* Generated from design tokens */\n\
         :root {\n  \
         --a-a: Inter, sans-serif;\n  \
         --a-b: 2;\n  \
         --m: {\"x\": 1};\n  \
         --z: #000;\n\
         }\n"
    );
}

#[test]
fn test_spaced_json() {
    let value = serde_json::json!({"a": [1, true, null], "b": {"c": "d"}, "e": []});
    assert_eq!(
        spaced_json(&value),
        r#"{"a": [1, true, null], "b": {"c": "d"}, "e": []}"#
    );
    assert_eq!(spaced_json(&serde_json::json!(1.5)), "1.5");
}

#[test]
fn test_to_css_empty() {
    assert_eq!(
        CssVariables::default().to_css(),
        "/* Generated from design tokens */\n:root {\n}\n"
    );
}
