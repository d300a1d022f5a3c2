//! Command-line interface definitions for tcpsweep.
//!
//! Uses `clap` derive macros for declarative argument parsing. Flags take
//! precedence over environment variables, which take precedence over the
//! settings file.

use crate::config::Settings;
use crate::output::{OutputFormat, Reporter};
use crate::scanner::{ScanConfig, ScanEngine};
use crate::services::ServiceTable;
use crate::types::expand;
use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser};
use std::io;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Attempt a TCP connection to every port in a range and report the open ones.
#[derive(Parser, Debug)]
#[command(name = "tcpsweep")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A small TCP connect port scanner", long_about = None)]
pub struct Args {
    /// Host to scan (IP address or hostname)
    #[arg(value_name = "ADDRESS")]
    pub address: String,

    /// Ports to scan: empty for all, "80", or an inclusive range like "80:100"
    #[arg(
        short,
        long = "port",
        value_name = "RANGE",
        env = "TCPSWEEP_PORT",
        allow_hyphen_values = true
    )]
    pub port: Option<String>,

    /// Timeout for each TCP connection (e.g. "2s", "500ms") [default: 2s]
    #[arg(
        short,
        long,
        value_name = "DURATION",
        value_parser = parse_timeout,
        env = "TCPSWEEP_TIMEOUT"
    )]
    pub timeout: Option<Duration>,

    /// Number of parallel connections [default: 10]
    #[arg(long, value_name = "N", env = "TCPSWEEP_PARALLEL")]
    pub parallel: Option<NonZeroUsize>,

    /// Services file to use instead of the bundled table
    #[arg(long, value_name = "PATH", env = "TCPSWEEP_SERVICES")]
    pub services: Option<PathBuf>,

    /// Output format for results
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Path to a settings file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Everything needed to run one scan, with all defaults applied.
#[derive(Debug)]
pub struct ScanPlan {
    pub target: String,
    pub ports: Vec<u16>,
    pub timeout: Duration,
    pub concurrency: usize,
    pub services: ServiceTable,
    pub output: OutputFormat,
}

impl ScanPlan {
    pub fn scan_config(&self) -> ScanConfig {
        ScanConfig::new(self.target.clone())
            .with_timeout(self.timeout)
            .with_concurrency(self.concurrency)
    }
}

impl Args {
    /// Merge flags with `settings` and load the inputs the engine needs.
    pub fn plan(&self, settings: &Settings) -> Result<ScanPlan> {
        let range = self.port.as_deref().unwrap_or(&settings.ports);
        let ports = expand(range)?;

        let timeout = self.timeout.unwrap_or_else(|| settings.timeout());
        if timeout.is_zero() {
            bail!("timeout must be greater than zero");
        }

        let concurrency = match self.parallel {
            Some(n) => n.get(),
            None if settings.parallel == 0 => bail!("parallel must be a positive integer"),
            None => settings.parallel,
        };

        let services = match self.services.as_ref().or(settings.services_file.as_ref()) {
            Some(path) => ServiceTable::from_file(path),
            None => ServiceTable::bundled(),
        }
        .context("failed to load service table")?;

        Ok(ScanPlan {
            target: self.address.clone(),
            ports,
            timeout,
            concurrency,
            services,
            output: self.output.unwrap_or(settings.output),
        })
    }

    /// Run the scan and stream open ports to standard output.
    pub async fn execute(&self) -> Result<()> {
        let settings = Settings::load(self.config.as_deref()).context("failed to load settings")?;
        let plan = self.plan(&settings)?;
        debug!(
            host = %plan.target,
            ports = plan.ports.len(),
            timeout_ms = plan.timeout.as_millis() as u64,
            concurrency = plan.concurrency,
            services = plan.services.len(),
            "scan plan ready"
        );

        let config = plan.scan_config();
        let engine = ScanEngine::tcp_connect(&config, Arc::new(plan.services));
        let mut reporter =
            Reporter::new(io::stdout(), plan.output).with_color(console::colors_enabled());

        let mut stream = engine.scan(plan.ports);
        while let Some(result) = stream.next_result().await {
            reporter
                .report(&result)
                .context("failed to write result")?;
        }
        stream.finish().await?;

        Ok(())
    }
}

/// Parse a duration literal such as `2s`, `750ms` or `1m30s`.
pub fn parse_timeout(s: &str) -> Result<Duration, String> {
    let duration = humantime::parse_duration(s).map_err(|e| e.to_string())?;
    if duration.is_zero() {
        return Err("timeout must be greater than zero".to_string());
    }
    Ok(duration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn args(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("tcpsweep").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let plan = args(&["127.0.0.1"]).plan(&Settings::default()).unwrap();
        assert_eq!(plan.target, "127.0.0.1");
        assert_eq!(plan.ports.len(), 65536);
        assert_eq!(plan.timeout, Duration::from_secs(2));
        assert_eq!(plan.concurrency, 10);
        assert_eq!(plan.output, OutputFormat::Plain);
        assert_eq!(plan.services.get(22), Some("ssh"));
    }

    #[test]
    fn test_flags() {
        let plan = args(&[
            "-p", "100:90", "-t", "750ms", "--parallel", "32", "-o", "json", "example.com",
        ])
        .plan(&Settings::default())
        .unwrap();
        assert_eq!(plan.ports, (90..=100).collect::<Vec<u16>>());
        assert_eq!(plan.timeout, Duration::from_millis(750));
        assert_eq!(plan.concurrency, 32);
        assert_eq!(plan.output, OutputFormat::Json);

        let config = plan.scan_config();
        assert_eq!(config.target, "example.com");
        assert_eq!(config.concurrency, 32);
    }

    #[test]
    fn test_empty_port_flag_means_all_ports() {
        let settings = Settings {
            ports: "22".to_string(),
            ..Settings::default()
        };
        let plan = args(&["--port", "", "localhost"]).plan(&settings).unwrap();
        assert_eq!(plan.ports.len(), 65536);
    }

    #[test]
    fn test_settings_fill_in_missing_flags() {
        let settings = Settings {
            ports: "8000:8010".to_string(),
            timeout_ms: 300,
            parallel: 3,
            output: OutputFormat::Json,
            ..Settings::default()
        };
        let plan = args(&["-t", "1s", "localhost"]).plan(&settings).unwrap();
        assert_eq!(plan.ports.len(), 11);
        assert_eq!(plan.timeout, Duration::from_secs(1));
        assert_eq!(plan.concurrency, 3);
        assert_eq!(plan.output, OutputFormat::Json);
    }

    #[test]
    fn test_bad_range_message() {
        let err = args(&["-p", "1:2:3", "localhost"])
            .plan(&Settings::default())
            .unwrap_err();
        assert_eq!(format!("{err:#}"), "cannot interpret given port range");
    }

    #[test]
    fn test_non_numeric_port() {
        let err = args(&["-p", "ssh", "localhost"])
            .plan(&Settings::default())
            .unwrap_err();
        assert!(format!("{err:#}").starts_with("invalid port number 'ssh'"));
    }

    #[test]
    fn test_out_of_domain_port_scans_nothing() {
        let plan = args(&["-p", "70000", "localhost"])
            .plan(&Settings::default())
            .unwrap();
        assert!(plan.ports.is_empty());

        let plan = args(&["-p", "-5:5", "localhost"])
            .plan(&Settings::default())
            .unwrap();
        assert_eq!(plan.ports, (0..=5).collect::<Vec<u16>>());
    }

    #[test]
    fn test_zero_parallel_rejected() {
        let parsed = Args::try_parse_from(["tcpsweep", "--parallel", "0", "localhost"]);
        assert!(parsed.is_err());

        let settings = Settings {
            parallel: 0,
            ..Settings::default()
        };
        assert!(args(&["localhost"]).plan(&settings).is_err());
    }

    #[test]
    fn test_custom_services_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "mything 7777/tcp").unwrap();
        let path = file.path().to_str().unwrap();

        let plan = args(&["--services", path, "-p", "7777", "localhost"])
            .plan(&Settings::default())
            .unwrap();
        assert_eq!(plan.services.get(7777), Some("mything"));
        assert_eq!(plan.services.get(22), None);
    }

    #[test]
    fn test_broken_services_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "broken x/tcp").unwrap();
        let path = file.path().to_str().unwrap();

        let err = args(&["--services", path, "localhost"])
            .plan(&Settings::default())
            .unwrap_err();
        assert!(format!("{err:#}").starts_with("failed to load service table"));
    }

    #[test]
    fn test_parse_timeout() {
        assert_eq!(parse_timeout("2s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_timeout("500ms").unwrap(), Duration::from_millis(500));
        assert_eq!(parse_timeout("1m30s").unwrap(), Duration::from_secs(90));
        assert!(parse_timeout("0s").is_err());
        assert!(parse_timeout("soon").is_err());
    }

    #[test]
    fn test_address_required() {
        assert!(Args::try_parse_from(["tcpsweep"]).is_err());
    }
}
