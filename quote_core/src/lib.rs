//!
//! Concurrent quote lookup across exchanges.
//!
//! This crate aggregates:
//! - `error` — unified error type `QuoteError` used across the workspace.
//! - `result` — handy `Result<T, QuoteError>` alias.
//! - `tickers` — normalization of raw ticker symbols.
//! - `exchange` — exchange identifiers and quote field names.
//! - `source` — the `QuoteSource` capability every exchange implements.
//! - `registry` — exchange to fetch-function mapping.
//! - `fetcher` — bounded per-exchange fetches and per-ticker aggregation.
//! - `report` — error collection and report formatting.
//! - `dispatcher` — one task per ticker, one writer for the report.
#![warn(missing_docs)]
pub mod error;
pub mod result;
pub mod tickers;
pub mod exchange;
pub mod source;
pub mod registry;
pub mod fetcher;
pub mod report;
pub mod dispatcher;

pub use error::QuoteError;
pub use result::Result;
pub use exchange::{Exchange, Field};
pub use source::{FetchFn, QuoteSource};
pub use registry::ExchangeRegistry;
pub use fetcher::{Answer, QuoteFetcher};
pub use report::{Report, ReportLine};
pub use dispatcher::{Dispatcher, RunSummary};
