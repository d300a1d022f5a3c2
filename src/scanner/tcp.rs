//! TCP connect probe.
//!
//! Completes a full handshake with the operating system's socket API and
//! closes the connection straight away. No special privileges are needed.

use crate::scanner::traits::{PortStatus, Prober};
use async_trait::async_trait;
use std::io;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;

/// Connect prober for a single host.
///
/// The host may be an IP literal or a name; names are resolved by the
/// connect call itself, inside the timeout.
#[derive(Debug, Clone)]
pub struct TcpConnectProber {
    target: String,
    timeout: Duration,
}

impl TcpConnectProber {
    pub fn new(target: impl Into<String>, timeout: Duration) -> Self {
        Self {
            target: target.into(),
            timeout,
        }
    }
}

#[async_trait]
impl Prober for TcpConnectProber {
    fn target(&self) -> &str {
        &self.target
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn probe(&self, port: u16) -> PortStatus {
        match timeout(self.timeout, TcpStream::connect((self.target.as_str(), port))).await {
            Ok(Ok(stream)) => {
                drop(stream);
                PortStatus::Open
            }
            Ok(Err(e)) => classify_error(&e),
            Err(_) => PortStatus::Filtered,
        }
    }
}

fn classify_error(e: &io::Error) -> PortStatus {
    match e.kind() {
        io::ErrorKind::ConnectionRefused | io::ErrorKind::ConnectionReset => PortStatus::Closed,
        _ => PortStatus::Filtered,
    }
}
