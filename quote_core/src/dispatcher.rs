//! Ticker dispatcher: one task per ticker, one writer for the report.
//!
//! `Dispatcher::run` normalizes the input, then spawns a named thread per ticker.
//! Each thread fetches its quotes from every configured exchange, turns them into a
//! [`Report`] and sends it over a `crossbeam_channel`. The calling thread is the
//! only consumer: it writes each report block to the sink as soon as it arrives, so
//! blocks from different tickers never interleave. Once the channel drains, every
//! thread is joined.
//!
//! Blocks appear in completion order, not input order.
use std::io::Write;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::unbounded;
use log::{debug, error, info};

use crate::error::QuoteError;
use crate::fetcher::{DEFAULT_FETCH_TIMEOUT, QuoteFetcher};
use crate::registry::ExchangeRegistry;
use crate::report::Report;
use crate::result::Result;
use crate::tickers;

/// Counters for a finished run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Distinct normalized tickers that were dispatched.
    pub tickers: usize,
    /// Report lines written.
    pub lines: usize,
    /// `(ticker, exchange)` pairs whose quote could not be fetched.
    pub fetch_failures: usize,
    /// Individual field reads that failed.
    pub field_failures: usize,
    /// Tickers whose task panicked before reporting.
    pub failed_tasks: Vec<String>,
}

impl RunSummary {
    fn record(&mut self, report: &Report) {
        self.lines += report.lines.len();
        self.fetch_failures += report.fetch_failures();
        self.field_failures += report.field_failures();
    }

    /// Turns a run with panicked tasks or fetch failures into an error.
    ///
    /// Field failures alone do not fail the run.
    pub fn into_result(self) -> Result<Self> {
        if let Some(ticker) = self.failed_tasks.first() {
            return Err(QuoteError::TaskPanicked(ticker.clone()));
        }
        if self.fetch_failures > 0 {
            return Err(QuoteError::FetchFailures(self.fetch_failures));
        }
        Ok(self)
    }
}

/// Fans tickers out to concurrent tasks and writes their reports.
pub struct Dispatcher {
    registry: Arc<ExchangeRegistry>,
    fetch_timeout: Duration,
}

impl Dispatcher {
    /// Creates a dispatcher over `registry` with the default fetch timeout.
    pub fn new(registry: ExchangeRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    /// Sets the upper bound for each exchange fetch.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Queries every ticker on every configured exchange and writes the report to `out`.
    ///
    /// Fails before spawning anything if no ticker or no exchange is configured.
    /// Fetch and field failures are reported in the output and counted in the
    /// returned [`RunSummary`]; only sink I/O and thread spawning fail the run, and
    /// even then every task already spawned is joined before returning.
    pub fn run<I, S, W>(&self, raw_tickers: I, out: &mut W) -> Result<RunSummary>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        W: Write + ?Sized,
    {
        let tickers = tickers::normalize(raw_tickers)?;
        if self.registry.is_empty() {
            return Err(QuoteError::NoExchanges);
        }
        info!(
            "Querying {} ticker(s) on {} exchange(s)",
            tickers.len(),
            self.registry.len()
        );

        let fetcher = QuoteFetcher::new(Arc::clone(&self.registry), self.fetch_timeout);
        let (report_tx, report_rx) = unbounded::<(String, Report)>();
        let mut handles = Vec::with_capacity(tickers.len());
        let mut failure: Option<QuoteError> = None;

        for (index, ticker) in tickers.iter().enumerate() {
            let fetcher = fetcher.clone();
            let report_tx = report_tx.clone();
            let symbol = ticker.clone();

            let spawned = thread::Builder::new()
                .name(format!("ticker-{}", index))
                .spawn(move || {
                    let report = Report::from_answer(fetcher.get_quotes(&symbol));
                    if let Err(e) = report_tx.send((symbol, report)) {
                        error!("{}", QuoteError::ChannelSend(e.to_string()));
                    }
                });
            match spawned {
                Ok(handle) => handles.push((ticker.clone(), handle)),
                Err(e) => {
                    error!("Failed to spawn task for {}: {}", ticker, e);
                    failure = Some(e.into());
                    break;
                }
            }
        }
        drop(report_tx);

        let mut summary = RunSummary {
            tickers: tickers.len(),
            ..RunSummary::default()
        };
        for (ticker, report) in report_rx.iter() {
            if failure.is_some() {
                continue;
            }
            match report.write_to(out) {
                Ok(()) => {
                    summary.record(&report);
                    debug!("Reported {}", ticker);
                }
                Err(e) => {
                    error!("Failed to write report for {}: {}", ticker, e);
                    failure = Some(e.into());
                }
            }
        }

        // Every spawned task is joined, even when the run is about to fail.
        for (ticker, handle) in handles {
            if handle.join().is_err() {
                error!("Task for {} panicked before reporting", ticker);
                summary.failed_tasks.push(ticker);
            }
        }

        if let Some(e) = failure {
            return Err(e);
        }

        info!(
            "Done: {} line(s), {} fetch failure(s), {} field failure(s)",
            summary.lines, summary.fetch_failures, summary.field_failures
        );
        Ok(summary)
    }
}
