//! CLI module for openrouter-cli
//!
//! Handles command-line argument parsing and configuration management.

pub mod args;
pub mod config;

pub use args::{Args, ChatArgs, Commands, Verbosity};
pub use config::{ApiCredentials, Config};
