//! Configuration management for tcpsweep.
//!
//! Provides the optional XDG-located settings file that supplies scan
//! defaults beneath command-line flags and environment variables.

mod settings;

pub use settings::{Paths, Settings};
