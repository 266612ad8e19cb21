//! CLI entry point - the composition root.
//!
//! stdout carries JSON lines only; tracing output goes to stderr.

use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use spotbridge_cli::{Cli, CliConfig, CliError, Commands, build_bridge, handlers};

fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    // Priority: RUST_LOG > --verbose > default (warn)
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))
}

async fn run(cli: Cli) -> Result<(), CliError> {
    if let Commands::Validate { url } = &cli.command {
        return handlers::handle_validate(url);
    }

    let config = CliConfig::from_env(cli.strategy)?;
    let bridge = build_bridge(&config)?;

    match &cli.command {
        Commands::Validate { .. } => Ok(()),
        Commands::Download(args) => handlers::handle_download(&bridge, args).await,
        Commands::Version => handlers::handle_version(&bridge).await,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    match run(cli).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            error!(error = %e, "command failed");
            let code = u8::try_from(e.exit_code()).unwrap_or(1);
            Ok(ExitCode::from(code))
        }
    }
}
