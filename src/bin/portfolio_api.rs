//! portfolio-api: portfolio request handler over stdin/stdout.
//!
//! Reads one JSON request per line, e.g.
//! `{"method":"POST","path":"/api/portfolios","body":{"widgets":["holdings"]}}`,
//! and writes one JSON response line (`{"status":201,"body":{...}}`) per
//! request. Portfolios live in memory and are gone when the process exits.

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use portfolio_tracker::api;
use portfolio_tracker::reporter;
use portfolio_tracker::store::PortfolioStore;

#[derive(Parser)]
#[command(
    name = "portfolio-api",
    about = "Answer portfolio API requests read as JSON lines from stdin"
)]
struct Args {}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    Args::parse();

    let store = PortfolioStore::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut served: u64 = 0;

    info!("Reading requests from stdin. Press Ctrl+C to stop.");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
            line = lines.next_line() => {
                match line.context("failed to read request line")? {
                    Some(line) => {
                        if line.trim().is_empty() {
                            continue;
                        }
                        let response = api::handle_line(&store, &line);
                        reporter::report_response(&response);
                        served += 1;
                    }
                    None => {
                        info!("Input closed");
                        break;
                    }
                }
            }
        }
    }

    info!(
        "Served {served} request(s); {} portfolio(s) discarded on exit",
        store.len()
    );
    Ok(())
}
