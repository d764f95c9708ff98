//! openrouter-cli - Main CLI Entry Point

use std::io;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use openrouter_cli::{
    cli::{ApiCredentials, Args, Commands, Config, Verbosity},
    commands::{self, Outcome},
    streaming::OpenRouterClient,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbosity());

    let outcome = match args.command {
        None => Outcome::MissingCommand,
        // Ctrl-C is polled first so its handler is installed before any work starts
        Some(command) => tokio::select! {
            biased;
            Ok(()) = tokio::signal::ctrl_c() => Outcome::Interrupted,
            result = run(command, args.config.as_deref()) => Outcome::Finished(result),
        },
    };

    let _ = outcome.report(&mut io::stdout(), &mut io::stderr());

    if let Outcome::Interrupted = outcome {
        // A pending stdin read would hold up runtime shutdown
        std::process::exit(i32::from(outcome.exit_code()));
    }
    ExitCode::from(outcome.exit_code())
}

/// Build configuration and client once, then run the subcommand
async fn run(command: Commands, config_path: Option<&Path>) -> Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::load(config_path).context("Failed to load configuration")?;
    let credentials = ApiCredentials::from_env(&config);
    let client = OpenRouterClient::new(&config, &credentials)?;

    let mut stdout = io::stdout();
    commands::dispatch(command, &config, &client, tokio::io::stdin(), &mut stdout).await?;

    Ok(())
}

/// Diagnostics go to stderr; `RUST_LOG` wins over the verbosity flags
fn init_tracing(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.filter_directive()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
