//! Error types for tcpsweep.
//!
//! Uses `thiserror` for ergonomic error definitions. Failed connection
//! attempts are not errors; they only classify a port as not open.

use std::num::ParseIntError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building a service table.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("services line {line}: invalid port '{value}'")]
    InvalidPort {
        line: usize,
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("failed to read services file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while loading settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine a configuration directory")]
    DirectoryNotFound,

    #[error("failed to read {}: {reason}", path.display())]
    ReadFailed { path: PathBuf, reason: String },

    #[error("invalid settings format: {0}")]
    InvalidFormat(String),
}

/// Errors raised by the scan engine itself.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("scan dispatcher failed")]
    Dispatcher(#[from] tokio::task::JoinError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type alias for scan operations.
pub type ScanResult<T> = Result<T, ScanError>;
