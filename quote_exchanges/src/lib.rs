//! Exchange-backed quote sources.
//!
//! Each exchange module exposes a `fetch(client, ticker)` that performs one blocking
//! HTTP request and returns a handle implementing `quote_core::QuoteSource`:
//! - `bitkub` — Bitkub market ticker (numeric prices).
//! - `satang` — Satang 24h ticker (string prices).
//! - `http` — shared client construction and GET helper.
//!
//! [`registry`] wires both exchanges into a `quote_core::ExchangeRegistry` that
//! shares one HTTP client.
#![warn(missing_docs)]
pub mod bitkub;
pub mod http;
pub mod satang;

use std::time::Duration;

use log::info;
use quote_core::{Exchange, ExchangeRegistry, QuoteSource, Result};
use strum::IntoEnumIterator;

/// Builds a registry with every supported exchange.
///
/// `timeout` bounds each HTTP request.
pub fn registry(timeout: Duration) -> Result<ExchangeRegistry> {
    let client = http::client(timeout)?;
    let mut registry = ExchangeRegistry::new();

    for exchange in Exchange::iter() {
        let client = client.clone();
        match exchange {
            Exchange::Bitkub => registry.register(exchange, move |ticker: &str| {
                Ok(Box::new(bitkub::fetch(&client, ticker)?) as Box<dyn QuoteSource>)
            }),
            Exchange::Satang => registry.register(exchange, move |ticker: &str| {
                Ok(Box::new(satang::fetch(&client, ticker)?) as Box<dyn QuoteSource>)
            }),
        };
    }

    info!("Registered {} exchange(s)", registry.len());
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_covers_every_exchange() {
        let registry = registry(Duration::from_secs(1)).unwrap();
        let exchanges: Vec<Exchange> = registry.exchanges().collect();
        assert_eq!(exchanges, Exchange::iter().collect::<Vec<_>>());
    }
}
