//! JSON lines output formatting.

use crate::scanner::PortResult;
use std::io::{self, Write};

/// Write a result as a single-line JSON object.
pub(super) fn write_line<W: Write>(out: &mut W, result: &PortResult) -> io::Result<()> {
    serde_json::to_writer(&mut *out, result).map_err(io::Error::other)?;
    writeln!(out)
}
