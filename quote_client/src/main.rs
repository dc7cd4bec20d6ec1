//! Quote Client — looks up bid, ask and last prices for a list of tickers on every
//! configured exchange, one concurrent task per ticker, and prints one line per
//! `(ticker, exchange)` followed by the errors encountered for that ticker.
//!
//! Usage example (CLI):
//! ```bash
//! quote_client btc eth
//! quote_client --exchange bitkub --timeout-secs 5 btc
//! ```
//!
//! Reports go to stdout, logs to stderr (`RUST_LOG` overrides the `info` default).
//! The process exits non-zero when no ticker is given or when any quote could not
//! be fetched; failed fields alone are reported but do not fail the run.
#![warn(missing_docs)]
mod args;

use crate::args::Args;
use clap::Parser;
use log::info;
use quote_core::{Dispatcher, QuoteError, Result};
use std::io;
use std::time::Duration;

/// Extra time a fetch may take beyond the HTTP timeout before it is abandoned.
const FETCH_GRACE: Duration = Duration::from_secs(1);

fn main() -> Result<(), QuoteError> {
    init_logger();
    let args = Args::parse();
    let timeout = args.timeout();

    let mut registry = quote_exchanges::registry(timeout)?;
    if !args.exchanges.is_empty() {
        registry.retain(|exchange| args.exchanges.contains(&exchange));
    }
    info!(
        "Exchanges: {:?}",
        registry.exchanges().collect::<Vec<_>>()
    );

    let dispatcher = Dispatcher::new(registry).with_fetch_timeout(timeout + FETCH_GRACE);
    let mut stdout = io::stdout().lock();
    let summary = dispatcher.run(&args.tickers, &mut stdout)?;
    summary.into_result()?;
    Ok(())
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
