//! Satang 24h ticker source.
//!
//! `GET /api/v3/ticker/24hr?symbol=<ticker>_thb` answers with one ticker object.
//! Prices arrive as decimal strings and are parsed when read, so a bad value only
//! fails its own accessor.
use quote_core::{Exchange, QuoteError, QuoteSource, Result};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::http;

const TICKER_URL: &str = "https://satangcorp.com/api/v3/ticker/24hr";

/// 24h ticker for one Satang market.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SatangQuote {
    last_price: Option<String>,
    bid_price: Option<String>,
    ask_price: Option<String>,
}

fn parse_price(field: &'static str, value: Option<&str>) -> Result<f64> {
    let raw = value.ok_or(QuoteError::MissingField(field))?;
    raw.trim().parse().map_err(|_| QuoteError::InvalidNumber {
        field,
        value: raw.to_string(),
    })
}

impl QuoteSource for SatangQuote {
    fn last(&self) -> Result<f64> {
        parse_price("lastPrice", self.last_price.as_deref())
    }

    fn bid(&self) -> Result<f64> {
        parse_price("bidPrice", self.bid_price.as_deref())
    }

    fn ask(&self) -> Result<f64> {
        parse_price("askPrice", self.ask_price.as_deref())
    }
}

/// Satang market symbol for a normalized ticker, e.g. `btc_thb`.
pub fn market_symbol(ticker: &str) -> String {
    format!("{}_thb", ticker.to_lowercase())
}

/// Decodes a ticker response body.
pub fn parse_ticker(body: &str) -> Result<SatangQuote> {
    Ok(serde_json::from_str(body)?)
}

/// Maps a response status to an error.
///
/// Satang answers an unknown market with 400 or 404; any other failure status
/// (rate limiting, auth, server errors) is an HTTP error.
pub fn check_status(status: StatusCode, ticker: &str) -> Result<()> {
    match status {
        s if s.is_success() => Ok(()),
        StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND => Err(QuoteError::TickerNotFound {
            exchange: Exchange::Satang,
            ticker: ticker.to_string(),
        }),
        s => Err(QuoteError::Http(format!("HTTP {} from Satang", s))),
    }
}

/// Fetches the current quote for `ticker`.
pub fn fetch(client: &Client, ticker: &str) -> Result<SatangQuote> {
    let symbol = market_symbol(ticker);
    let resp = http::get(client, TICKER_URL, &[("symbol", symbol.as_str())])?;
    check_status(resp.status, ticker)?;
    parse_ticker(&resp.body)
}
