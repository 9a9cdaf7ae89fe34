use std::path::PathBuf;

use clap::Parser;

use crate::config::{DEFAULT_INPUT, DEFAULT_OUTPUT};

/// Strip `extensions` metadata from a design token export, optionally
/// resolving `{token.references}` and emitting CSS custom properties.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "design-tokens-clean", version)]
pub struct Cli {
    /// Token JSON exported by the design tool
    #[arg(value_name = "INPUT", default_value = DEFAULT_INPUT)]
    pub input: PathBuf,

    /// Where the cleaned JSON is written
    #[arg(value_name = "OUTPUT", default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Replace `{a.b.c}` references with the value they point to
    #[arg(long)]
    pub resolve_refs: bool,

    /// Also write CSS custom properties generated from the cleaned file
    #[arg(long, value_name = "PATH")]
    pub css: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("design-tokens-clean").chain(args.iter().copied()))
    }

    #[test]
    fn defaults() {
        let cli = parse(&[]).unwrap();
        assert_eq!(cli.input, PathBuf::from("design-tokens.tokens (5).json"));
        assert_eq!(cli.output, PathBuf::from("design-tokens-cleaned.json"));
        assert!(!cli.resolve_refs);
        assert_eq!(cli.css, None);
    }

    #[test]
    fn flags_anywhere() {
        let cli = parse(&["--css", "out.css", "in.json", "--resolve-refs", "out.json"]).unwrap();
        assert_eq!(cli.input, PathBuf::from("in.json"));
        assert_eq!(cli.output, PathBuf::from("out.json"));
        assert!(cli.resolve_refs);
        assert_eq!(cli.css, Some(PathBuf::from("out.css")));

        let cli = parse(&["in.json", "--css", "tokens.css"]).unwrap();
        assert_eq!(cli.input, PathBuf::from("in.json"));
        assert_eq!(cli.output, PathBuf::from("design-tokens-cleaned.json"));
        assert_eq!(cli.css, Some(PathBuf::from("tokens.css")));
    }

    #[test]
    fn css_needs_a_path() {
        let err = parse(&["in.json", "--css"]).unwrap_err();
        assert!(err.to_string().contains("--css"));
    }
}
