use clap::Parser;
use std::process::ExitCode;
use tcpsweep::cli::Args;
use tcpsweep::output::print_error;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match args.execute().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let log_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
