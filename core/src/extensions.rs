use serde_json::Value;

/// Key holding tool-specific metadata on any node of a token document.
pub const EXTENSIONS_KEY: &str = "extensions";

/// Drops every `extensions` entry, at any depth, including objects nested in arrays.
pub fn remove_extensions(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|key, _| key != EXTENSIONS_KEY);
            for child in map.values_mut() {
                remove_extensions(child);
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                remove_extensions(item);
            }
        }
        Value::String(_) | Value::Number(_) | Value::Bool(_) | Value::Null => {}
    }
}

pub fn sanitize(mut value: Value) -> Value {
    remove_extensions(&mut value);
    value
}

#[cfg(test)]
fn contains_extensions(value: &Value) -> bool {
    match value {
        Value::Object(map) => {
            map.contains_key(EXTENSIONS_KEY) || map.values().any(contains_extensions)
        }
        Value::Array(items) => items.iter().any(contains_extensions),
        _ => false,
    }
}

#[test]
fn test_nested() {
    let doc = serde_json::json!({
        "extensions": {"studio.tokens": {"modify": {}}},
        "variables": {
            "colors": {
                "neutral": {
                    "white": {"type": "color", "value": "#ffffff", "extensions": {"id": "1"}}
                }
            }
        },
        "list": [{"extensions": 1, "keep": true}, [{"extensions": null}], "extensions"],
        "nothing": null
    });
    let cleaned = sanitize(doc);
    assert_eq!(
        cleaned,
        serde_json::json!({
            "variables": {
                "colors": {"neutral": {"white": {"type": "color", "value": "#ffffff"}}}
            },
            "list": [{"keep": true}, [{}], "extensions"],
            "nothing": null
        })
    );
}

#[test]
fn test_keeps_key_order() {
    let mut doc: Value = serde_json::from_str(
        r#"{"z": 1, "extensions": {}, "a": 2, "m": {"y": 0, "extensions": 0, "b": 1}}"#,
    )
    .unwrap();
    remove_extensions(&mut doc);
    assert_eq!(
        serde_json::to_string(&doc).unwrap(),
        r#"{"z":1,"a":2,"m":{"y":0,"b":1}}"#
    );
}

#[test]
fn test_scalars() {
    assert_eq!(sanitize(Value::Null), Value::Null);
    assert_eq!(sanitize(serde_json::json!("extensions")), serde_json::json!("extensions"));
    assert_eq!(sanitize(serde_json::json!(4.5)), serde_json::json!(4.5));
}

#[test]
fn test_numbers_kept_verbatim() {
    let doc: Value = serde_json::from_str(
        r#"{"big": 12345678901234567890123, "extensions": {}, "ratio": 1.50, "tiny": 1e-7}"#,
    )
    .unwrap();
    assert_eq!(
        serde_json::to_string(&sanitize(doc)).unwrap(),
        r#"{"big":12345678901234567890123,"ratio":1.50,"tiny":1e-7}"#
    );
}
