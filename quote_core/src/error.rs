//! Error type shared by every crate in the workspace.
//!
//! `QuoteError` covers the whole pipeline: startup validation, exchange lookups,
//! per-exchange fetches, per-field quote access, and writing the report. The
//! `Fetch`/`FetchTimeout` and `Field` variants carry the `(exchange, ticker)`
//! context so that their `Display` output is the message shown in the
//! `errors encountered: [...]` summary.
use std::io;
use std::time::Duration;

use thiserror::Error;

use crate::exchange::{Exchange, Field};

/// Unified error type for the quote pipeline.
#[derive(Error, Debug)]
pub enum QuoteError {
    /// I/O error while writing the report or spawning a thread.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// No ticker symbols were supplied.
    #[error("missing ticker(s)")]
    MissingTickers,

    /// The registry has no exchange to query.
    #[error("no exchanges configured")]
    NoExchanges,

    /// No fetch function is registered for the exchange.
    #[error("no fetcher registered for {0}")]
    UnknownExchange(Exchange),

    /// The exchange does not list the requested symbol.
    #[error("ticker {ticker} not found on {exchange}")]
    TickerNotFound {
        /// Exchange that was asked.
        exchange: Exchange,
        /// Normalized ticker symbol.
        ticker: String,
    },

    /// A value is absent from the exchange response.
    #[error("field `{0}` missing from response")]
    MissingField(&'static str),

    /// A value in the exchange response is not a number.
    #[error("invalid number for `{field}`: {value:?}")]
    InvalidNumber {
        /// Response field name.
        field: &'static str,
        /// Raw value as received.
        value: String,
    },

    /// Transport failure or non-success HTTP status.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Failure while decoding a JSON response body.
    #[error("JSON deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// The quote handle for a `(ticker, exchange)` pair could not be obtained.
    #[error("error fetching quote for {ticker} ({exchange}): {source}")]
    Fetch {
        /// Exchange that was queried.
        exchange: Exchange,
        /// Normalized ticker symbol.
        ticker: String,
        /// Underlying cause.
        source: Box<QuoteError>,
    },

    /// The fetch did not finish within the configured bound.
    #[error("error fetching quote for {ticker} ({exchange}): timed out after {timeout:?}")]
    FetchTimeout {
        /// Exchange that was queried.
        exchange: Exchange,
        /// Normalized ticker symbol.
        ticker: String,
        /// Bound that expired.
        timeout: Duration,
    },

    /// One accessor of an otherwise valid quote failed.
    #[error("error getting {field} for {ticker} ({exchange}): {source}")]
    Field {
        /// Accessor that failed.
        field: Field,
        /// Normalized ticker symbol.
        ticker: String,
        /// Exchange the quote came from.
        exchange: Exchange,
        /// Underlying cause.
        source: Box<QuoteError>,
    },

    /// Channel send failed (receiver dropped); contains a short context string.
    #[error("Channel send failed: {0}")]
    ChannelSend(String),

    /// A ticker task panicked before reporting.
    #[error("task for {0} panicked")]
    TaskPanicked(String),

    /// The run completed but at least one quote could not be fetched.
    #[error("{0} quote fetch(es) failed")]
    FetchFailures(usize),
}

impl QuoteError {
    /// Whether this error belongs to the fetch-failure class.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, QuoteError::Fetch { .. } | QuoteError::FetchTimeout { .. })
    }
}
