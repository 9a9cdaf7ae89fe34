use std::path::PathBuf;

use crate::cli::Cli;

pub const DEFAULT_INPUT: &str = "design-tokens.tokens (5).json";
pub const DEFAULT_OUTPUT: &str = "design-tokens-cleaned.json";

/// Everything one invocation needs, independent of how it was collected.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub input: PathBuf,
    pub output: PathBuf,
    pub resolve_refs: bool,
    /// CSS is generated from `output` once the clean succeeded.
    pub css_output: Option<PathBuf>,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Config {
            input: cli.input,
            output: cli.output,
            resolve_refs: cli.resolve_refs,
            css_output: cli.css,
        }
    }
}

#[test]
fn test_from_cli() {
    use clap::Parser;

    let cli = Cli::try_parse_from(["design-tokens-clean", "in.json", "--css", "out.css"]).unwrap();
    assert_eq!(
        Config::from(cli),
        Config {
            input: PathBuf::from("in.json"),
            output: PathBuf::from(DEFAULT_OUTPUT),
            resolve_refs: false,
            css_output: Some(PathBuf::from("out.css")),
        }
    );
}
