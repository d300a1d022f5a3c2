//! Core value types.
//!
//! Port numbers are plain `u16`, which already bounds them to the TCP domain.

mod port;

pub use port::{expand, PortError, PortRange};
