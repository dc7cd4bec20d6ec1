//! Command-line arguments for the Quote Client.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use std::time::Duration;

use clap::Parser;
use quote_core::Exchange;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Ticker symbols to look up, case-insensitive (e.g. `btc eth`).
    #[clap(required = true)]
    pub tickers: Vec<String>,

    /// Only query this exchange. Repeat to select several; all exchanges by default.
    #[clap(long = "exchange", value_enum)]
    pub exchanges: Vec<Exchange>,

    /// Upper bound, in seconds, for each exchange request.
    #[clap(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: u64,
}

impl Args {
    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
