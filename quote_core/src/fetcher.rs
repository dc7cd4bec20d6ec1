//! Per-exchange quote fetching.
//!
//! `QuoteFetcher::fetch` resolves the exchange in the registry and runs its fetch
//! function on a short-lived worker thread. The caller waits on a
//! `crossbeam_channel` with `recv_timeout`, so a hung exchange turns into a
//! `FetchTimeout` instead of blocking the ticker task forever. The worker is not
//! cancelled; its late result is dropped with the channel.
//!
//! Every failure (unknown exchange, fetch error, timeout, worker panic) is
//! returned to the caller and stays confined to its `(ticker, exchange)` pair.
use std::collections::BTreeMap;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{RecvTimeoutError, bounded};
use log::{debug, warn};

use crate::error::QuoteError;
use crate::exchange::Exchange;
use crate::registry::ExchangeRegistry;
use crate::result::Result;
use crate::source::QuoteSource;

/// Default upper bound for a single exchange fetch.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Outcome of fetching one `(ticker, exchange)` pair.
pub type FetchOutcome = Result<Box<dyn QuoteSource>>;

/// Ticker symbol to per-exchange fetch outcomes.
///
/// Every configured exchange has a sub-entry; failed fetches keep theirs as `Err`.
pub type Answer = BTreeMap<String, BTreeMap<Exchange, FetchOutcome>>;

/// Fetches quote handles through an [`ExchangeRegistry`].
#[derive(Clone)]
pub struct QuoteFetcher {
    registry: Arc<ExchangeRegistry>,
    timeout: Duration,
}

impl QuoteFetcher {
    /// Creates a fetcher bounded by `timeout` per exchange call.
    pub fn new(registry: Arc<ExchangeRegistry>, timeout: Duration) -> Self {
        Self { registry, timeout }
    }

    /// Fetches the quote handle for `ticker` from `exchange`.
    pub fn fetch(&self, ticker: &str, exchange: Exchange) -> FetchOutcome {
        let wrap = |source: QuoteError| QuoteError::Fetch {
            exchange,
            ticker: ticker.to_string(),
            source: Box::new(source),
        };

        let fetch = self.registry.fetcher(exchange).map_err(wrap)?;
        let worker_name = format!("fetch-{}", exchange);
        let symbol = ticker.to_string();
        let (tx, rx) = bounded(1);

        debug!("Fetching {} from {}", ticker, exchange);
        thread::Builder::new()
            .name(worker_name.clone())
            .spawn(move || {
                // The receiver is gone once the caller timed out.
                let _ = tx.send(fetch(symbol.as_str()));
            })
            .map_err(|e| wrap(e.into()))?;

        match rx.recv_timeout(self.timeout) {
            Ok(Ok(quote)) => {
                debug!("Fetched {} from {}", ticker, exchange);
                Ok(quote)
            }
            Ok(Err(e)) => Err(wrap(e)),
            Err(RecvTimeoutError::Timeout) => Err(QuoteError::FetchTimeout {
                exchange,
                ticker: ticker.to_string(),
                timeout: self.timeout,
            }),
            Err(RecvTimeoutError::Disconnected) => {
                Err(wrap(QuoteError::TaskPanicked(format!("{} {}", worker_name, ticker))))
            }
        }
    }

    /// Fetches `ticker` from every configured exchange, one after another.
    pub fn get_quotes(&self, ticker: &str) -> Answer {
        let quotes = self
            .registry
            .exchanges()
            .map(|exchange| {
                let outcome = self.fetch(ticker, exchange);
                if let Err(e) = &outcome {
                    warn!("{}", e);
                }
                (exchange, outcome)
            })
            .collect();

        let mut answer = Answer::new();
        answer.insert(ticker.to_string(), quotes);
        answer
    }
}
