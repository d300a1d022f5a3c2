//! Probe abstraction and per-port result types.
//!
//! The engine only knows the [`Prober`] trait, which keeps the dispatch
//! logic independent of the socket layer and lets tests substitute
//! instrumented probes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Outcome of probing a single port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortStatus {
    /// The handshake completed.
    Open,
    /// The target actively refused the connection.
    Closed,
    /// No answer within the timeout, unreachable, or any other dial error.
    Filtered,
}

impl fmt::Display for PortStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
            Self::Filtered => write!(f, "filtered"),
        }
    }
}

/// A reported port, emitted once per open port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortResult {
    pub port: u16,
    pub status: PortStatus,
    /// Conventional service name, if the service table knows the port.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
}

impl PortResult {
    pub fn open(port: u16, service: Option<String>) -> Self {
        Self {
            port,
            status: PortStatus::Open,
            service,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == PortStatus::Open
    }
}

/// Something that can test a single port on a fixed target.
///
/// Implementations must not retry and must bound their own duration; the
/// engine holds a concurrency token for as long as `probe` runs.
#[async_trait]
pub trait Prober: Send + Sync {
    /// Host every probe is aimed at.
    fn target(&self) -> &str;

    /// Upper bound on a single probe.
    fn timeout(&self) -> Duration;

    /// Probe `port` and classify the outcome.
    async fn probe(&self, port: u16) -> PortStatus;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_status_display() {
        assert_eq!(PortStatus::Open.to_string(), "open");
        assert_eq!(PortStatus::Closed.to_string(), "closed");
        assert_eq!(PortStatus::Filtered.to_string(), "filtered");
    }

    #[test]
    fn test_port_result_serialization() {
        let known = PortResult::open(80, Some("http".to_string()));
        assert!(known.is_open());
        assert_eq!(
            serde_json::to_string(&known).unwrap(),
            r#"{"port":80,"status":"open","service":"http"}"#
        );

        let unknown = PortResult::open(31337, None);
        assert_eq!(
            serde_json::to_string(&unknown).unwrap(),
            r#"{"port":31337,"status":"open"}"#
        );
    }
}
