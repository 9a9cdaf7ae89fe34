//! End-to-end tests for the design-tokens-clean binary.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

fn clean_cmd() -> Command {
    Command::cargo_bin("design-tokens-clean").unwrap()
}

fn create_tokens(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("tokens.json");
    fs::write(
        &path,
        r##"{
  "font": {
    "Body/Regular": {"type": "typography", "value": "Inter", "extensions": {"org.figma": {}}}
  },
  "variables": {
    "colors": {
      "neutral": {
        "white": {"type": "color", "value": "#ffffff", "extensions": {"mode": "Modo 1"}},
        "gris": {"type": "color", "value": "#f2f2f2", "description": "Gris clair — fond"}
      }
    }
  },
  "color tokens": {
    "zebra": {"type": "color", "value": "{variables.colors.neutral.white}"},
    "alpha": {"type": "color", "value": "{nowhere}"}
  }
}"##,
    )
    .unwrap();
    path
}

// ==================== CLEAN ====================

#[test]
fn test_clean_strips_extensions() {
    let dir = TempDir::new().unwrap();
    let input = create_tokens(&dir);
    let output = dir.path().join("out.json");

    clean_cmd()
        .arg(&input)
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "📊 Found sections: font, variables, color tokens",
        ))
        .stdout(predicate::str::contains("✓ Successfully cleaned tokens!"))
        .stdout(predicate::str::contains("  Colors: 2 tokens"))
        .stdout(predicate::str::contains("  Fonts:  1 styles"))
        .stdout(predicate::str::contains("Resolving").not());

    let written = fs::read_to_string(&output).unwrap();
    assert!(!written.contains("extensions"));
    assert!(written.contains("Gris clair — fond"));
    assert!(written.contains("\"{variables.colors.neutral.white}\""));
    assert!(!written.ends_with('\n'));
}

#[test]
fn test_clean_resolve_refs() {
    let dir = TempDir::new().unwrap();
    let input = create_tokens(&dir);
    let output = dir.path().join("out.json");

    clean_cmd()
        .arg("--resolve-refs")
        .arg(&input)
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("🔗 Resolving token references..."))
        .stderr(predicate::str::is_empty());

    let written: Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(written["color tokens"]["zebra"]["value"], "#ffffff");
    assert_eq!(written["color tokens"]["alpha"]["value"], "{nowhere}");
}

#[test]
fn test_clean_missing_file() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.json");

    clean_cmd()
        .arg(dir.path().join("nope.json"))
        .arg(&output)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("✗ Error: File '"))
        .stderr(predicate::str::contains("nope.json' not found!"));
    assert!(!output.exists());
}

#[test]
fn test_clean_invalid_json() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("broken.json");
    fs::write(&input, "not json at all").unwrap();

    clean_cmd()
        .arg(&input)
        .arg(dir.path().join("out.json"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("is not a valid JSON file!"));
}

#[test]
fn test_clean_input_not_utf8() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("latin1.json");
    fs::write(&input, b"{\"font\": \"Gris fonc\xe9\"}").unwrap();
    let output = dir.path().join("out.json");

    clean_cmd()
        .arg(&input)
        .arg(&output)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("✗ Error: "))
        .stderr(predicate::str::contains("not found").not())
        .stderr(predicate::str::contains("valid JSON").not());
    assert!(!output.exists());
}

#[test]
fn test_clean_output_unwritable() {
    let dir = TempDir::new().unwrap();
    let input = create_tokens(&dir);

    clean_cmd()
        .arg(&input)
        .arg(dir.path().join("missing-dir").join("out.json"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("📊 Found sections:"))
        .stdout(predicate::str::contains("✓ Successfully cleaned tokens!").not())
        .stderr(predicate::str::contains("✗ Error: "))
        .stderr(predicate::str::contains("not found").not())
        .stderr(predicate::str::contains("valid JSON").not());
}

#[test]
fn test_default_input_name() {
    let dir = TempDir::new().unwrap();

    clean_cmd()
        .current_dir(dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "File 'design-tokens.tokens (5).json' not found!",
        ));
}

// ==================== CSS ====================

#[test]
fn test_css_sorted() {
    let dir = TempDir::new().unwrap();
    let input = create_tokens(&dir);
    let output = dir.path().join("out.json");
    let css = dir.path().join("tokens.css");

    clean_cmd()
        .arg(&input)
        .arg("--css")
        .arg(&css)
        .arg(&output)
        .arg("--resolve-refs")
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ Successfully generated CSS!"))
        .stdout(predicate::str::contains("  Variables: 5"));

    let written = fs::read_to_string(&css).unwrap();
    assert_eq!(
        written,
        "/* Generated from design tokens */\n\
         :root {\n  \
         --color tokens-alpha: {nowhere};\n  \
         --color tokens-zebra: #ffffff;\n  \
         --font-Body/Regular: Inter;\n  \
         --variables-colors-neutral-gris: #f2f2f2;\n  \
         --variables-colors-neutral-white: #ffffff;\n\
         }\n"
    );

    let names: Vec<&str> = written
        .lines()
        .filter_map(|line| line.trim().split(':').next())
        .filter(|name| name.starts_with("--"))
        .collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
}

#[test]
fn test_css_without_value() {
    let dir = TempDir::new().unwrap();
    let input = create_tokens(&dir);

    clean_cmd()
        .arg(&input)
        .arg("--css")
        .assert()
        .code(1);
}

#[test]
fn test_css_not_written_when_clean_fails() {
    let dir = TempDir::new().unwrap();
    let css = dir.path().join("tokens.css");

    clean_cmd()
        .arg(dir.path().join("nope.json"))
        .arg(dir.path().join("out.json"))
        .arg("--css")
        .arg(&css)
        .assert()
        .code(1);
    assert!(!css.exists());
}

#[test]
fn test_css_output_unwritable() {
    let dir = TempDir::new().unwrap();
    let input = create_tokens(&dir);

    clean_cmd()
        .arg(&input)
        .arg(dir.path().join("out.json"))
        .arg("--css")
        .arg(dir.path().join("missing-dir").join("tokens.css"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("✓ Successfully cleaned tokens!"))
        .stderr(predicate::str::contains("✗ Error generating CSS:"));
}
