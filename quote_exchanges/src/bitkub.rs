//! Bitkub market ticker source.
//!
//! `GET /api/market/ticker?sym=THB_<TICKER>` answers with an object keyed by the
//! market symbol. Prices are JSON numbers; `highestBid` and `lowestAsk` are the
//! top of the book.
use std::collections::HashMap;

use quote_core::{Exchange, QuoteError, QuoteSource, Result};
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::http;

const TICKER_URL: &str = "https://api.bitkub.com/api/market/ticker";

/// Ticker entry for one Bitkub market.
#[derive(Debug, Clone, Deserialize)]
pub struct BitkubQuote {
    last: Option<f64>,
    #[serde(rename = "highestBid")]
    highest_bid: Option<f64>,
    #[serde(rename = "lowestAsk")]
    lowest_ask: Option<f64>,
}

impl QuoteSource for BitkubQuote {
    fn last(&self) -> Result<f64> {
        self.last.ok_or(QuoteError::MissingField("last"))
    }

    fn bid(&self) -> Result<f64> {
        self.highest_bid.ok_or(QuoteError::MissingField("highestBid"))
    }

    fn ask(&self) -> Result<f64> {
        self.lowest_ask.ok_or(QuoteError::MissingField("lowestAsk"))
    }
}

/// Bitkub market symbol for a normalized ticker, e.g. `THB_BTC`.
pub fn market_symbol(ticker: &str) -> String {
    format!("THB_{}", ticker)
}

/// Picks `ticker`'s entry out of a ticker response body.
pub fn parse_ticker(ticker: &str, body: &str) -> Result<BitkubQuote> {
    let mut markets: HashMap<String, BitkubQuote> = serde_json::from_str(body)?;
    markets
        .remove(&market_symbol(ticker))
        .ok_or_else(|| QuoteError::TickerNotFound {
            exchange: Exchange::Bitkub,
            ticker: ticker.to_string(),
        })
}

/// Fetches the current quote for `ticker`.
pub fn fetch(client: &Client, ticker: &str) -> Result<BitkubQuote> {
    let symbol = market_symbol(ticker);
    let resp = http::get(client, TICKER_URL, &[("sym", symbol.as_str())])?;
    if !resp.status.is_success() {
        return Err(QuoteError::Http(format!("HTTP {} from Bitkub", resp.status)));
    }
    parse_ticker(ticker, &resp.body)
}
