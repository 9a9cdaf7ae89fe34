use clap::Parser;
use design_tokens_clean::{cli::Cli, exit_codes, run, Config};
use tracing_subscriber::EnvFilter;

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = if err.use_stderr() {
                exit_codes::FAILURE
            } else {
                exit_codes::SUCCESS
            };
            // Nothing sensible left to do if even this write fails.
            let _ = err.print();
            std::process::exit(code);
        }
    };
    std::process::exit(run(&Config::from(cli)));
}
