//! isoworld binary entry point.
//!
//! This is a thin wrapper around the isoworld-cli library that:
//! 1. Parses command-line arguments
//! 2. Initializes logging
//! 3. Runs the selected subcommand

use anyhow::Result;
use isoworld_cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::from_args();

    // RUST_LOG takes precedence over -v
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(cli.log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();

    let stdout = std::io::stdout();
    isoworld_cli::run(&cli, &mut stdout.lock())
}
