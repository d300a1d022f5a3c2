//! Plain text output formatting.

use crate::scanner::PortResult;
use console::style;
use std::fmt::Display;
use std::io::{self, Write};

/// Write `OPEN: <port>, likely to be <name>` or `OPEN: <port>, use unknown`.
pub(super) fn write_line<W: Write>(out: &mut W, result: &PortResult, color: bool) -> io::Result<()> {
    let label = style("OPEN:").green().bold().force_styling(color);
    match result.service.as_deref() {
        Some(name) => writeln!(out, "{} {}, likely to be {}", label, result.port, name),
        None => writeln!(out, "{} {}, use unknown", label, result.port),
    }
}

/// Print a fatal error as `ERROR: <message>` on standard error.
pub fn print_error(msg: impl Display) {
    eprintln!("{} {}", style("ERROR:").red().bold().for_stderr(), msg);
}
