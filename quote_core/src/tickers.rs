//! Ticker symbol normalization.
//!
//! Symbols are free-form strings (no check against a real-world listing). Each raw
//! value is trimmed and uppercased; blank values are skipped and repeats collapse
//! onto their first occurrence.

use std::collections::HashSet;

use log::debug;

use crate::error::QuoteError;
use crate::result::Result;

/// Normalizes a single raw ticker: trimmed and uppercased.
pub fn normalize_one(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Normalizes the raw command-line tickers, preserving input order.
///
/// Returns `QuoteError::MissingTickers` when nothing usable remains.
pub fn normalize<I, S>(raw: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut tickers = Vec::new();

    for value in raw {
        let ticker = normalize_one(value.as_ref());
        if ticker.is_empty() {
            continue;
        }
        if seen.insert(ticker.clone()) {
            tickers.push(ticker);
        } else {
            debug!("Skipping repeated ticker {}", ticker);
        }
    }

    if tickers.is_empty() {
        return Err(QuoteError::MissingTickers);
    }
    Ok(tickers)
}
