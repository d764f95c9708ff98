//! The four CLI operations
//!
//! Each operation writes its user-facing output to the supplied writer
//! and returns an error for the binary to turn into exit code 1.

use std::io::{self, Write};

use clap::CommandFactory;
use colored::Colorize;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::cli::{Args, ChatArgs, Commands, Config};
use crate::errors::{CliError, Result};
use crate::history::HistoryLog;
use crate::streaming::{render_message, render_stream, OpenRouterClient, Renderer};
use crate::types::{ChatMessage, ExchangeResult, HistoryRecord};

/// Resolved options for one chat exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatOptions {
    pub model: String,
    pub stream: bool,
    pub hide_reasoning: bool,
    pub save: bool,
}

impl ChatOptions {
    /// Merge command-line flags over configured defaults
    pub fn resolve(args: &ChatArgs, config: &Config) -> Self {
        Self {
            model: args
                .model
                .clone()
                .unwrap_or_else(|| config.chat.default_model.clone()),
            stream: args.streaming(),
            hide_reasoning: args.no_reasoning,
            save: args.save,
        }
    }
}

/// Use the positional prompt, or read all of `input` when absent.
///
/// The read is async so an interrupt can still be delivered while it waits.
pub async fn read_prompt<R: AsyncRead + Unpin>(
    prompt: Option<String>,
    mut input: R,
) -> Result<String> {
    let prompt = match prompt {
        Some(prompt) => prompt,
        None => {
            tracing::debug!("reading prompt from stdin");
            let mut buffer = String::new();
            input.read_to_string(&mut buffer).await?;
            buffer.trim().to_string()
        }
    };

    if prompt.trim().is_empty() {
        return Err(CliError::EmptyPrompt);
    }
    Ok(prompt)
}

/// Send one prompt, render the answer, optionally append it to history
pub async fn run_chat<W: Write>(
    client: &OpenRouterClient,
    history: &HistoryLog,
    options: &ChatOptions,
    prompt: &str,
    out: &mut W,
) -> Result<ExchangeResult> {
    let messages = vec![ChatMessage::user(prompt)];

    let result = if options.stream {
        let stream = client.chat_stream(&options.model, &messages).await?;
        render_stream(
            Box::pin(stream),
            Renderer::new(&mut *out, options.hide_reasoning),
        )
        .await?
    } else {
        let message = client.chat_complete(&options.model, &messages).await?;
        render_message(
            out,
            &message.content,
            &message.reasoning,
            options.hide_reasoning,
        )?
    };

    if options.save {
        let _ = writeln!(out, "Appending history to file {}", history.path().display());
        history.append(&HistoryRecord::exchange(prompt, &result));
    }

    Ok(result)
}

/// Table of model ids (50 columns) and descriptions
pub async fn list_models<W: Write>(client: &OpenRouterClient, out: &mut W) -> Result<()> {
    let listing = client.list_models().await?;
    for model in listing.models()? {
        writeln!(out, "{}", model.table_row())?;
    }
    Ok(())
}

/// The raw listing as one JSON array
pub async fn list_models_json<W: Write>(client: &OpenRouterClient, out: &mut W) -> Result<()> {
    let listing = client.list_models().await?;
    serde_json::to_writer(&mut *out, listing.raw())?;
    writeln!(out)?;
    Ok(())
}

/// One model id per line
pub async fn list_models_ids<W: Write>(client: &OpenRouterClient, out: &mut W) -> Result<()> {
    let listing = client.list_models().await?;
    for model in listing.models()? {
        writeln!(out, "{}", model.id)?;
    }
    Ok(())
}

/// Run a parsed subcommand against the given client and streams
pub async fn dispatch<R: AsyncRead + Unpin, W: Write>(
    command: Commands,
    config: &Config,
    client: &OpenRouterClient,
    input: R,
    out: &mut W,
) -> Result<()> {
    match command {
        Commands::Chat(args) => {
            let options = ChatOptions::resolve(&args, config);
            let prompt = read_prompt(args.prompt, input).await?;
            let history = HistoryLog::new(&config.chat.history_file);
            run_chat(client, &history, &options, &prompt, out).await?;
        }
        Commands::ListModels => list_models(client, out).await?,
        Commands::ListModelsJson => list_models_json(client, out).await?,
        Commands::ListModelsIds => list_models_ids(client, out).await?,
    }
    out.flush()?;
    Ok(())
}

/// How a process run ended, and what the user is told about it
#[derive(Debug)]
pub enum Outcome {
    /// The subcommand ran to completion, successfully or not
    Finished(anyhow::Result<()>),
    /// Ctrl-C arrived first
    Interrupted,
    /// No subcommand was given
    MissingCommand,
}

impl Outcome {
    /// 0 only for a finished, successful command
    pub fn exit_code(&self) -> u8 {
        match self {
            Outcome::Finished(Ok(())) => 0,
            _ => 1,
        }
    }

    /// Print the closing message: help and interrupt notices on `out`, errors on `err`
    pub fn report<O: Write, E: Write>(&self, out: &mut O, err: &mut E) -> io::Result<()> {
        match self {
            Outcome::Finished(Ok(())) => {}
            Outcome::Finished(Err(e)) => {
                writeln!(err, "{}: {:#}", "Error while executing command".red(), e)?;
                err.flush()?;
            }
            Outcome::Interrupted => writeln!(out, "\nInterrupted")?,
            Outcome::MissingCommand => writeln!(out, "{}", Args::command().render_help())?,
        }
        out.flush()
    }
}
