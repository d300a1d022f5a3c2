//! # tcpsweep - a small TCP connect port scanner
//!
//! tcpsweep attempts a full TCP handshake against every port in a range,
//! with a fixed number of attempts in flight, and reports the ports that
//! accept connections along with their conventional service names.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tcpsweep::scanner::{ScanConfig, ScanEngine};
//! use tcpsweep::services::ServiceTable;
//! use tcpsweep::types::expand;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let services = Arc::new(ServiceTable::bundled()?);
//!     let config = ScanConfig::new("127.0.0.1")
//!         .with_timeout(Duration::from_millis(500))
//!         .with_concurrency(64);
//!
//!     let engine = ScanEngine::tcp_connect(&config, services);
//!     let mut stream = engine.scan(expand("1:1024")?);
//!     while let Some(result) = stream.next_result().await {
//!         println!("{} open ({:?})", result.port, result.service);
//!     }
//!     stream.finish().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - port ranges and range expression expansion
//! - [`services`] - the port to service name table
//! - [`scanner`] - the bounded concurrent scan engine and TCP prober
//! - [`output`] - result rendering
//! - [`config`] - settings file
//! - [`cli`] - command-line front end
//! - [`error`] - error types
//!
//! A connection attempt that is refused, times out, or fails in any other
//! way produces no result; closed and filtered ports are indistinguishable
//! in the output.

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod scanner;
pub mod services;
pub mod types;

// Re-export commonly used types
pub use error::{ConfigError, ScanError, ServiceError};
pub use scanner::{PortResult, PortStatus, Prober, ScanConfig, ScanEngine, ScanSummary};
pub use services::ServiceTable;
pub use types::{expand, PortError, PortRange};
