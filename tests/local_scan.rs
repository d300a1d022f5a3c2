use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tcpsweep::scanner::{ScanConfig, ScanEngine};
use tcpsweep::services::ServiceTable;
use tokio::net::TcpListener;

async fn listener() -> (TcpListener, u16) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let port = listener.local_addr().expect("local addr").port();
    (listener, port)
}

/// A loopback port with nothing listening on it.
async fn refused_port() -> u16 {
    let (listener, port) = listener().await;
    drop(listener);
    port
}

fn engine(concurrency: usize, services: ServiceTable) -> ScanEngine {
    let config = ScanConfig::new("127.0.0.1")
        .with_timeout(Duration::from_secs(2))
        .with_concurrency(concurrency);
    ScanEngine::tcp_connect(&config, Arc::new(services))
}

#[tokio::test]
async fn reports_listener_and_not_refused_neighbour() {
    let (_open, open_port) = listener().await;
    let closed_port = refused_port().await;

    for concurrency in 1..=4 {
        let (results, summary) = engine(concurrency, ServiceTable::default())
            .scan_all(vec![open_port, closed_port])
            .await
            .expect("scan");

        assert_eq!(results.len(), 1, "concurrency {concurrency}");
        assert_eq!(results[0].port, open_port);
        assert_eq!(results[0].service, None);
        assert_eq!(summary.scanned, 2);
        assert_eq!(summary.open, 1);
    }
}

#[tokio::test]
async fn annotates_with_service_name() {
    let (_open, port) = listener().await;
    let services = ServiceTable::parse(&format!("local-test {port}/tcp\n")).expect("table");

    let (results, _) = engine(2, services)
        .scan_all(vec![port])
        .await
        .expect("scan");

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].service.as_deref(), Some("local-test"));
}

#[tokio::test]
async fn repeated_scans_find_the_same_ports() {
    let (_a, port_a) = listener().await;
    let (_b, port_b) = listener().await;
    let (_c, port_c) = listener().await;
    let closed = refused_port().await;
    let ports = vec![port_a, closed, port_b, port_c];

    let engine = engine(3, ServiceTable::default());
    let mut sets = Vec::new();
    for _ in 0..2 {
        let (results, _) = engine.scan_all(ports.clone()).await.expect("scan");
        sets.push(results.into_iter().map(|r| r.port).collect::<BTreeSet<u16>>());
    }

    assert_eq!(sets[0], sets[1]);
    assert_eq!(sets[0], BTreeSet::from([port_a, port_b, port_c]));
}

#[tokio::test]
async fn empty_port_list_returns_immediately() {
    let (results, summary) = engine(10, ServiceTable::default())
        .scan_all(Vec::new())
        .await
        .expect("scan");

    assert!(results.is_empty());
    assert_eq!(summary.scanned, 0);
}
