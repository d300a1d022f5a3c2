//! Result reporting.
//!
//! A [`Reporter`] renders each open port as soon as the engine emits it,
//! either as the classic one-line text format or as JSON lines.

mod json_format;
mod plain;

pub use plain::print_error;

use crate::scanner::PortResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, Write};

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `OPEN: <port>, likely to be <name>` lines
    #[default]
    Plain,
    /// One JSON object per open port
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Writes one line per reported port.
pub struct Reporter<W: Write> {
    out: W,
    format: OutputFormat,
    color: bool,
    reported: usize,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self {
            out,
            format,
            color: false,
            reported: 0,
        }
    }

    /// Style the plain-text label. Has no effect on JSON output.
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Render a single result. Ports that are not open are ignored.
    pub fn report(&mut self, result: &PortResult) -> io::Result<()> {
        if !result.is_open() {
            return Ok(());
        }

        match self.format {
            OutputFormat::Plain => plain::write_line(&mut self.out, result, self.color)?,
            OutputFormat::Json => json_format::write_line(&mut self.out, result)?,
        }
        // Lines must appear as ports are found, not when the buffer fills
        self.out.flush()?;
        self.reported += 1;
        Ok(())
    }

    /// Number of lines written so far.
    pub fn reported(&self) -> usize {
        self.reported
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
