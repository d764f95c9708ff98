//! Terminal renderer for chat responses
//!
//! Writes reasoning inside `<think>` markers and content as plain text,
//! flushing after every chunk so the user sees tokens as they arrive.
//! Both channels are accumulated for the caller regardless of what is shown.

use crate::errors::{CliError, Result};
use crate::streaming::parser::{decode_line, LineBuffer, StreamDelta};
use crate::types::ExchangeResult;
use futures_util::{Stream, StreamExt};
use std::io::Write;

/// Opening think-block marker
pub const THINK_OPEN: &str = "<think>";

/// Closing think-block marker
pub const THINK_CLOSE: &str = "</think>";

/// Streaming renderer state machine
///
/// At most one think block is open at a time. It closes with a blank line
/// when content starts, or bare at end of stream.
#[derive(Debug)]
pub struct Renderer<W: Write> {
    out: W,
    hide_reasoning: bool,
    thinking: bool,
    content: String,
    reasoning: String,
}

impl<W: Write> Renderer<W> {
    pub fn new(out: W, hide_reasoning: bool) -> Self {
        Self {
            out,
            hide_reasoning,
            thinking: false,
            content: String::new(),
            reasoning: String::new(),
        }
    }

    /// Render one delta. `EndOfStream` is left to [`Renderer::finish`].
    pub fn apply(&mut self, delta: StreamDelta) -> Result<()> {
        match delta {
            StreamDelta::Reasoning(text) => {
                if !self.hide_reasoning {
                    if !self.thinking {
                        self.out.write_all(THINK_OPEN.as_bytes())?;
                        self.thinking = true;
                    }
                    self.out.write_all(text.as_bytes())?;
                    self.out.flush()?;
                }
                // Kept for history even when hidden
                self.reasoning.push_str(&text);
            }
            StreamDelta::Content(text) => {
                if self.thinking {
                    write!(self.out, "{}\n\n", THINK_CLOSE)?;
                    self.thinking = false;
                }
                self.out.write_all(text.as_bytes())?;
                self.out.flush()?;
                self.content.push_str(&text);
            }
            StreamDelta::EndOfStream => {}
        }
        Ok(())
    }

    /// Close any open think block, end the line, and return both channels trimmed
    pub fn finish(mut self) -> Result<ExchangeResult> {
        if self.thinking {
            self.out.write_all(THINK_CLOSE.as_bytes())?;
            self.thinking = false;
        }
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(ExchangeResult::new(&self.content, &self.reasoning))
    }
}

/// Consume a response body stream, rendering as it goes.
///
/// Stops at `[DONE]` or when the source is exhausted, whichever comes
/// first. Only errors from the underlying stream or the output propagate.
pub async fn render_stream<S, B, E, W>(
    mut stream: S,
    mut renderer: Renderer<W>,
) -> Result<ExchangeResult>
where
    S: Stream<Item = std::result::Result<B, E>> + Unpin,
    B: AsRef<[u8]>,
    E: Into<CliError>,
    W: Write,
{
    let mut lines = LineBuffer::new();
    let mut line_count = 0usize;

    'outer: while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(Into::<CliError>::into)?;
        for line in lines.push(chunk.as_ref()) {
            line_count += 1;
            if !apply_line(&mut renderer, &line)? {
                break 'outer;
            }
        }
    }

    if let Some(line) = lines.finish() {
        line_count += 1;
        apply_line(&mut renderer, &line)?;
    }

    tracing::debug!(lines = line_count, "stream finished");
    renderer.finish()
}

/// Feed one line's deltas to the renderer; false once end-of-stream is seen
fn apply_line<W: Write>(renderer: &mut Renderer<W>, line: &str) -> Result<bool> {
    for delta in decode_line(line) {
        if delta == StreamDelta::EndOfStream {
            return Ok(false);
        }
        renderer.apply(delta)?;
    }
    Ok(true)
}

/// Render a complete, non-streamed answer with the same framing
pub fn render_message<W: Write>(
    out: &mut W,
    content: &str,
    reasoning: &str,
    hide_reasoning: bool,
) -> Result<ExchangeResult> {
    let result = ExchangeResult::new(content, reasoning);

    if !hide_reasoning && !result.reasoning.is_empty() {
        write!(out, "{}\n{}\n{}\n\n", THINK_OPEN, result.reasoning, THINK_CLOSE)?;
    }
    writeln!(out, "{}", result.content)?;
    out.flush()?;

    Ok(result)
}
