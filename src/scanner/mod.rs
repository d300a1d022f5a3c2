//! Scan engine - bounded concurrent dispatch of port probes.
//!
//! One task is spawned per candidate port. A semaphore holding
//! `concurrency` permits caps how many probes are in flight; each task owns
//! its permit and returns it when dropped, on every exit path including
//! panics. Open ports are streamed to the caller as they are found, and
//! [`ScanStream::finish`] waits for every task before returning.

pub mod tcp;
pub mod traits;

use crate::error::ScanResult;
use crate::services::ServiceTable;
use futures::Stream;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, Semaphore};
use tokio::task::{JoinError, JoinHandle, JoinSet};
use tracing::{debug, warn};

pub use tcp::TcpConnectProber;
pub use traits::{PortResult, PortStatus, Prober};

/// Default number of simultaneous connection attempts.
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Default per-connection timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// Configuration for a TCP connect scan.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Host to scan, as an IP literal or a name.
    pub target: String,
    /// Connect timeout per port.
    pub timeout: Duration,
    /// Maximum probes in flight at once.
    pub concurrency: usize,
}

impl ScanConfig {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            timeout: DEFAULT_TIMEOUT,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }
}

/// Counts gathered at the join barrier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Probes launched.
    pub scanned: usize,
    pub open: usize,
    pub closed: usize,
    pub filtered: usize,
    /// Probe tasks that panicked or were cancelled.
    pub failed: usize,
    pub elapsed: Duration,
}

impl ScanSummary {
    fn record(&mut self, outcome: Result<PortStatus, JoinError>) {
        match outcome {
            Ok(PortStatus::Open) => self.open += 1,
            Ok(PortStatus::Closed) => self.closed += 1,
            Ok(PortStatus::Filtered) => self.filtered += 1,
            Err(e) => {
                self.failed += 1;
                warn!(error = %e, "probe task failed");
            }
        }
    }
}

/// Dispatches probes for a port list under a fixed concurrency ceiling.
#[derive(Clone)]
pub struct ScanEngine {
    prober: Arc<dyn Prober>,
    services: Arc<ServiceTable>,
    concurrency: usize,
}

impl ScanEngine {
    /// Create an engine around any prober.
    ///
    /// The concurrency is clamped to `1..=Semaphore::MAX_PERMITS`.
    pub fn new(prober: Arc<dyn Prober>, services: Arc<ServiceTable>, concurrency: usize) -> Self {
        Self {
            prober,
            services,
            concurrency: concurrency.clamp(1, Semaphore::MAX_PERMITS),
        }
    }

    /// Create an engine performing TCP connect probes.
    pub fn tcp_connect(config: &ScanConfig, services: Arc<ServiceTable>) -> Self {
        let prober = TcpConnectProber::new(config.target.clone(), config.timeout);
        Self::new(Arc::new(prober), services, config.concurrency)
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Start scanning `ports` in the background.
    ///
    /// Must be called from within a tokio runtime. Results arrive on the
    /// returned stream in completion order.
    pub fn scan(&self, ports: Vec<u16>) -> ScanStream {
        let (tx, rx) = mpsc::unbounded_channel();
        let dispatcher = tokio::spawn(dispatch(
            Arc::clone(&self.prober),
            Arc::clone(&self.services),
            self.concurrency,
            ports,
            tx,
        ));

        ScanStream {
            results: rx,
            dispatcher,
        }
    }

    /// Scan `ports` and collect every open port.
    pub async fn scan_all(&self, ports: Vec<u16>) -> ScanResult<(Vec<PortResult>, ScanSummary)> {
        let mut stream = self.scan(ports);
        let mut results = Vec::new();
        while let Some(result) = stream.next_result().await {
            results.push(result);
        }
        let summary = stream.finish().await?;
        Ok((results, summary))
    }
}

/// Open ports of a running scan, plus the handle needed to join it.
pub struct ScanStream {
    results: mpsc::UnboundedReceiver<PortResult>,
    dispatcher: JoinHandle<ScanSummary>,
}

impl ScanStream {
    /// Next open port, or `None` once every probe has finished.
    pub async fn next_result(&mut self) -> Option<PortResult> {
        self.results.recv().await
    }

    /// Wait for all probes to complete and return the summary.
    ///
    /// Results not yet taken from the stream are discarded.
    pub async fn finish(self) -> ScanResult<ScanSummary> {
        drop(self.results);
        Ok(self.dispatcher.await?)
    }
}

impl Stream for ScanStream {
    type Item = PortResult;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.results.poll_recv(cx)
    }
}

async fn dispatch(
    prober: Arc<dyn Prober>,
    services: Arc<ServiceTable>,
    concurrency: usize,
    ports: Vec<u16>,
    tx: mpsc::UnboundedSender<PortResult>,
) -> ScanSummary {
    let start = Instant::now();
    debug!(
        host = prober.target(),
        ports = ports.len(),
        concurrency,
        timeout_ms = prober.timeout().as_millis() as u64,
        "starting scan"
    );

    let semaphore = Arc::new(Semaphore::new(concurrency));
    let mut units = JoinSet::new();
    let mut summary = ScanSummary::default();

    for port in ports {
        // The semaphore is never closed
        let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
            break;
        };

        let prober = Arc::clone(&prober);
        let services = Arc::clone(&services);
        let tx = tx.clone();

        units.spawn(async move {
            let _permit = permit;
            let status = prober.probe(port).await;
            if status == PortStatus::Open {
                let service = services.get(port).map(str::to_owned);
                // A dropped receiver only means nobody is listening any more
                let _ = tx.send(PortResult::open(port, service));
            }
            status
        });
        summary.scanned += 1;

        while let Some(outcome) = units.try_join_next() {
            summary.record(outcome);
        }
    }
    drop(tx);

    while let Some(outcome) = units.join_next().await {
        summary.record(outcome);
    }

    summary.elapsed = start.elapsed();
    debug!(
        scanned = summary.scanned,
        open = summary.open,
        closed = summary.closed,
        filtered = summary.filtered,
        failed = summary.failed,
        elapsed_ms = summary.elapsed.as_millis() as u64,
        "scan complete"
    );
    summary
}
