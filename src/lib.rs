use std::io;

pub mod cli;
pub mod config;
pub mod error;
pub mod exit_codes;
mod pipeline;

pub use config::Config;
pub use error::{Error, Result};
pub use pipeline::{clean, generate_css, CleanReport, CssReport};

/// Cleans `config.input` and, when asked, turns the cleaned file into CSS.
/// Returns the process exit code; failures are reported on stderr.
pub fn run(config: &Config) -> i32 {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Err(err) = clean(&config.input, &config.output, config.resolve_refs, &mut out) {
        tracing::debug!(error = ?err, "clean failed");
        eprintln!("✗ Error: {err}");
        return exit_codes::FAILURE;
    }
    if let Some(css_output) = &config.css_output {
        if let Err(err) = generate_css(&config.output, css_output, &mut out) {
            tracing::debug!(error = ?err, "css generation failed");
            eprintln!("✗ Error generating CSS: {err}");
            return exit_codes::FAILURE;
        }
    }
    exit_codes::SUCCESS
}
