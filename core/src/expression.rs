use std::collections::HashSet;

use serde_json::Value;

/// A `{dotted.path}` placeholder pointing somewhere into the root document.
#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    pub path: Vec<String>,
}
impl Reference {
    /// Returns `None` unless the whole string is wrapped in braces.
    pub fn parse(text: &str) -> Option<Reference> {
        reference_parser::reference(text).ok().map(|path| Reference {
            path: path.into_iter().map(|x| x.to_string()).collect(),
        })
    }
    /// JSON pointer of the node the path lands on. Landing on a token
    /// points at its `value`. Only one level of indirection.
    pub fn locate(&self, root: &Value) -> Option<String> {
        let mut current = root;
        let mut pointer = String::new();
        for segment in &self.path {
            current = current.as_object()?.get(segment)?;
            pointer.push('/');
            pointer.push_str(&escape_pointer(segment));
        }
        if current.get("value").is_some() {
            pointer.push_str("/value");
        }
        Some(pointer)
    }
    pub fn lookup<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        root.pointer(&self.locate(root)?)
    }
}

peg::parser! {
  grammar reference_parser() for str {
    rule closing() = "}" ![_]

    rule segment() -> &'input str = $((!"." !closing() [_])*)

    pub(crate) rule reference() -> Vec<&'input str>
        = "{" v:(segment() ** ".") closing() { v }
  }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ResolveReport {
    pub resolved: usize,
    pub unresolved: Vec<String>,
}

/// Resolves `node` against a fixed `root`, leaving both untouched.
pub fn resolve_references(node: &Value, root: &Value) -> Value {
    match node {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, value)| (key.clone(), resolve_references(value, root)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| resolve_references(item, root))
                .collect(),
        ),
        Value::String(text) => match Reference::parse(text).and_then(|r| r.lookup(root)) {
            Some(value) => value.clone(),
            None => node.clone(),
        },
        _ => node.clone(),
    }
}

/// Resolves every reference of `doc` against `doc` itself, rewriting
/// strings one at a time in document order. A reference therefore sees the
/// already rewritten values of everything before it. A reference landing on
/// an object or array gets a copy of that subtree with its own references
/// resolved first, so it matches what the target ends up as.
pub fn resolve_in_place(doc: &mut Value) -> ResolveReport {
    let mut state = InPlace::default();
    state.resolve_at(doc, String::new());
    state.report
}

#[derive(Default)]
struct InPlace {
    /// Pointers whose whole subtree has been resolved.
    done: HashSet<String>,
    report: ResolveReport,
}
impl InPlace {
    fn is_done(&self, pointer: &str) -> bool {
        let mut current = pointer;
        loop {
            if self.done.contains(current) {
                return true;
            }
            match current.rfind('/') {
                Some(end) => current = &current[..end],
                None => return false,
            }
        }
    }
    fn resolve_at(&mut self, root: &mut Value, pointer: String) {
        if self.is_done(&pointer) {
            return;
        }
        let children: Vec<String> = match root.pointer(&pointer) {
            Some(Value::Object(map)) => map
                .keys()
                .map(|key| format!("{pointer}/{}", escape_pointer(key)))
                .collect(),
            Some(Value::Array(items)) => {
                (0..items.len()).map(|i| format!("{pointer}/{i}")).collect()
            }
            Some(Value::String(text)) => {
                let text = text.clone();
                self.done.insert(pointer.clone());
                self.resolve_string(root, &pointer, &text);
                return;
            }
            _ => return,
        };
        for child in children {
            self.resolve_at(root, child);
        }
        self.done.insert(pointer);
    }
    fn resolve_string(&mut self, root: &mut Value, pointer: &str, text: &str) {
        let Some(reference) = Reference::parse(text) else {
            return;
        };
        let Some(target) = reference.locate(root) else {
            self.report.unresolved.push(text.to_string());
            return;
        };
        // A reference inside its own target gets the target as it is now.
        let inside_target = pointer.starts_with(&format!("{target}/"));
        let composite = matches!(
            root.pointer(&target),
            Some(Value::Object(_) | Value::Array(_))
        );
        if composite && !inside_target {
            self.resolve_at(root, target.clone());
        }
        let Some(resolved) = root.pointer(&target).cloned() else {
            return;
        };
        if let Some(slot) = root.pointer_mut(pointer) {
            *slot = resolved;
            self.report.resolved += 1;
        }
    }
}

fn escape_pointer(key: &str) -> String {
    key.replace('~', "~0").replace('/', "~1")
}

#[test]
fn test_parse() {
    assert_eq!(
        Reference::parse("{variables.colors.neutral.white}").unwrap().path,
        vec!["variables", "colors", "neutral", "white"]
    );
    assert_eq!(Reference::parse("{}").unwrap().path, vec![""]);
    assert_eq!(Reference::parse("{a.}").unwrap().path, vec!["a", ""]);
    assert_eq!(Reference::parse("{a}b}").unwrap().path, vec!["a}b"]);
    assert_eq!(Reference::parse("{brand color}").unwrap().path, vec!["brand color"]);
    assert_eq!(Reference::parse("{"), None);
    assert_eq!(Reference::parse("#ff0000"), None);
    assert_eq!(Reference::parse("{a} "), None);
    assert_eq!(Reference::parse(" {a}"), None);
}

#[test]
fn test_resolve_token_value() {
    let root = serde_json::json!({"a": {"value": 5}, "b": "{a}"});
    assert_eq!(
        resolve_references(&root, &root),
        serde_json::json!({"a": {"value": 5}, "b": 5})
    );
}

#[test]
fn test_resolve_plain_value() {
    let root = serde_json::json!({
        "group": {"inner": {"type": "color"}},
        "size": 12,
        "x": "{group}",
        "y": "{size}",
        "z": "{group.inner.type}"
    });
    let resolved = resolve_references(&root, &root);
    assert_eq!(resolved["x"], serde_json::json!({"inner": {"type": "color"}}));
    assert_eq!(resolved["y"], serde_json::json!(12));
    assert_eq!(resolved["z"], serde_json::json!("color"));
}

#[test]
fn test_unresolved_left_alone() {
    let root = serde_json::json!({
        "b": "{missing.path}",
        "c": "{}",
        "d": "{list.0}",
        "list": [1, 2],
        "e": "{b.x}",
        "f": "plain"
    });
    assert_eq!(resolve_references(&root, &root), root);
    let mut doc = root.clone();
    let report = resolve_in_place(&mut doc);
    assert_eq!(doc, root);
    assert_eq!(report.resolved, 0);
    assert_eq!(
        report.unresolved,
        vec!["{missing.path}", "{}", "{list.0}", "{b.x}"]
    );
}

#[test]
fn test_arrays() {
    let root = serde_json::json!({
        "base": {"value": "#000"},
        "shadows": [{"color": "{base}"}, "{base}", "{nope}"]
    });
    let mut doc = root.clone();
    resolve_in_place(&mut doc);
    assert_eq!(doc["shadows"], serde_json::json!([{"color": "#000"}, "#000", "{nope}"]));
    assert_eq!(resolve_references(&root, &root), doc);
}

#[test]
fn test_single_indirection() {
    let root = serde_json::json!({
        "c": "{b}",
        "b": {"value": "{a}"},
        "a": {"value": 1}
    });
    assert_eq!(resolve_references(&root, &root)["c"], serde_json::json!("{a}"));
}

#[test]
fn test_in_place_order() {
    // Earlier keys are rewritten first, later lookups observe them.
    let mut doc = serde_json::json!({
        "b": {"value": "{a}"},
        "c": "{b}",
        "a": {"value": 1}
    });
    let report = resolve_in_place(&mut doc);
    assert_eq!(doc["b"]["value"], serde_json::json!(1));
    assert_eq!(doc["c"], serde_json::json!(1));
    assert_eq!(report.resolved, 2);

    let snapshot = serde_json::json!({
        "b": {"value": "{a}"},
        "c": "{b}",
        "a": {"value": 1}
    });
    assert_eq!(resolve_references(&snapshot, &snapshot)["c"], serde_json::json!("{a}"));
}

#[test]
fn test_escaped_keys() {
    let mut doc = serde_json::json!({
        "a/b": {"x~y": "{t}"},
        "t": {"value": "ok"}
    });
    resolve_in_place(&mut doc);
    assert_eq!(doc["a/b"]["x~y"], serde_json::json!("ok"));
}

#[test]
fn test_reference_to_later_group() {
    let mut doc = serde_json::json!({
        "x": "{group}",
        "group": {"t": {"type": "color", "value": "{base}"}},
        "base": {"type": "color", "value": "#000"}
    });
    let report = resolve_in_place(&mut doc);
    assert_eq!(doc["x"]["t"]["value"], serde_json::json!("#000"));
    assert_eq!(doc["group"]["t"]["value"], serde_json::json!("#000"));
    assert_eq!(report.resolved, 2);
    assert!(report.unresolved.is_empty());
}

#[test]
fn test_reference_to_later_composite_value() {
    let mut doc = serde_json::json!({
        "heading": "{font.display}",
        "font": {
            "display": {
                "type": "typography",
                "value": {"fontFamily": "{family.sans}", "fontSize": 32}
            }
        },
        "family": {"sans": {"type": "string", "value": "Inter"}}
    });
    resolve_in_place(&mut doc);
    assert_eq!(
        doc["heading"],
        serde_json::json!({"fontFamily": "Inter", "fontSize": 32})
    );
}

#[test]
fn test_self_reference_terminates() {
    let mut doc = serde_json::json!({"a": {"b": "{a}"}});
    let report = resolve_in_place(&mut doc);
    assert_eq!(doc, serde_json::json!({"a": {"b": {"b": "{a}"}}}));
    assert_eq!(report.resolved, 1);
}
