use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::Path,
};

use design_tokens_clean_core::{
    remove_extensions, resolve_in_place, validate_structure, CssVariables, ResolveReport,
    TokenStats, DEFAULT_CSS_PREFIX,
};
use itertools::Itertools;
use serde::Serialize;
use serde_json::{ser::PrettyFormatter, Serializer, Value};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Unresolved references listed in the log, the rest are only counted.
const UNRESOLVED_SHOWN: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct CleanReport {
    pub found_sections: Vec<&'static str>,
    pub references: Option<ResolveReport>,
    pub stats: TokenStats,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CssReport {
    pub variables: usize,
}

/// Reads `input`, drops `extensions`, optionally resolves references and
/// writes the result to `output`. Progress goes to `out`.
pub fn clean(
    input: &Path,
    output: &Path,
    resolve_refs: bool,
    out: &mut impl Write,
) -> Result<CleanReport> {
    let mut doc = read_document(input)?;

    let found_sections = validate_structure(&doc);
    debug!(sections = ?found_sections, "validated token structure");
    writeln!(out, "📊 Found sections: {}", found_sections.join(", "))?;

    remove_extensions(&mut doc);

    // Resolution runs on the sanitized tree, which is also its root.
    let references = if resolve_refs {
        writeln!(out, "🔗 Resolving token references...")?;
        let report = resolve_in_place(&mut doc);
        info!(
            resolved = report.resolved,
            unresolved = report.unresolved.len(),
            "resolved token references"
        );
        if !report.unresolved.is_empty() {
            info!(
                count = report.unresolved.len(),
                "unresolved references left in place: {}",
                report.unresolved.iter().take(UNRESOLVED_SHOWN).join(", ")
            );
        }
        Some(report)
    } else {
        None
    };

    write_document(output, &doc)?;

    writeln!(out, "✓ Successfully cleaned tokens!")?;
    writeln!(out, "  Input:  {}", input.display())?;
    writeln!(out, "  Output: {}", output.display())?;

    let stats = TokenStats::collect(&doc);
    if let Some(colors) = stats.colors {
        writeln!(out, "  Colors: {colors} tokens")?;
    }
    if let Some(fonts) = stats.fonts {
        writeln!(out, "  Fonts:  {fonts} styles")?;
    }
    if let Some(semantic) = stats.semantic {
        writeln!(out, "  Semantic tokens: ~{semantic}")?;
    }

    Ok(CleanReport {
        found_sections,
        references,
        stats,
    })
}

/// Writes a `:root` block with one custom property per token in `input`.
pub fn generate_css(input: &Path, output: &Path, out: &mut impl Write) -> Result<CssReport> {
    let doc = read_document(input)?;
    let vars = CssVariables::extract(&doc, DEFAULT_CSS_PREFIX);
    debug!(variables = vars.len(), "extracted css variables");
    if vars.is_empty() {
        info!(path = %input.display(), "no tokens with both `type` and `value` found");
    }
    fs::write(output, vars.to_css())?;

    writeln!(out, "✓ Successfully generated CSS!")?;
    writeln!(out, "  Output: {}", output.display())?;
    writeln!(out, "  Variables: {}", vars.len())?;

    Ok(CssReport {
        variables: vars.len(),
    })
}

fn read_document(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => Error::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => Error::Io(err),
    })?;
    debug!(path = %path.display(), bytes = text.len(), "read token document");
    serde_json::from_str(&text).map_err(|source| Error::InvalidJson {
        path: path.to_path_buf(),
        source,
    })
}

/// Two-space indented JSON, key order kept, non-ASCII written as is.
fn write_document(path: &Path, doc: &Value) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    let mut ser = Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(b"  "));
    doc.serialize(&mut ser)?;
    writer.flush()?;
    debug!(path = %path.display(), "wrote cleaned document");
    Ok(())
}
