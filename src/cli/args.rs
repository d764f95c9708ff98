//! Command-line argument parsing for openrouter-cli
//!
//! Provides clap-based CLI with subcommands and verbosity control.

use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

/// OpenRouter CLI - chat with hosted models from the terminal
#[derive(Parser, Debug)]
#[command(name = "openrouter-cli")]
#[command(version)]
#[command(about = "OpenRouter CLI", long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbosity level: -q (quiet), default (normal), -v (verbose), -vv (very verbose)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress diagnostics)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send a message to the model
    Chat(ChatArgs),

    /// List available models
    ListModels,

    /// List available models in JSON format
    ListModelsJson,

    /// List only the IDs of available models
    ListModelsIds,
}

/// Options for the `chat` subcommand
#[derive(ClapArgs, Debug, Clone, PartialEq, Eq)]
pub struct ChatArgs {
    /// User message (read from stdin when omitted)
    #[arg(value_name = "PROMPT")]
    pub prompt: Option<String>,

    /// Model to use (default from config: qwen/qwen3-14b:free)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Use stream (default)
    #[arg(long, overrides_with = "no_stream")]
    pub stream: bool,

    /// Disable stream
    #[arg(long = "no-stream", overrides_with = "stream")]
    pub no_stream: bool,

    /// Do not show reasoning part
    #[arg(long)]
    pub no_reasoning: bool,

    /// Save/append local history
    #[arg(long)]
    pub save: bool,
}

impl ChatArgs {
    /// Streaming is on unless `--no-stream` was the last of the pair given
    pub fn streaming(&self) -> bool {
        !self.no_stream
    }
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    VeryVerbose,
}

impl Args {
    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::VeryVerbose,
            }
        }
    }
}

impl Verbosity {
    /// Default `tracing` filter directive for this level
    pub fn filter_directive(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "off",
            Verbosity::Normal => "warn",
            Verbosity::Verbose => "openrouter_cli=info,warn",
            Verbosity::VeryVerbose => "openrouter_cli=debug,info",
        }
    }
}
