//! Registry mapping each configured exchange to its fetch function.
//!
//! The registry is a plain value built at startup and handed to the
//! [`Dispatcher`](crate::dispatcher::Dispatcher); tests build one out of fake
//! sources.
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::QuoteError;
use crate::exchange::Exchange;
use crate::result::Result;
use crate::source::{FetchFn, QuoteSource};

/// Exchange identifier to fetch function mapping.
#[derive(Clone, Default)]
pub struct ExchangeRegistry {
    fetchers: BTreeMap<Exchange, FetchFn>,
}

impl ExchangeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `fetch` for `exchange`, returning the function it replaced.
    pub fn register<F>(&mut self, exchange: Exchange, fetch: F) -> Option<FetchFn>
    where
        F: Fn(&str) -> Result<Box<dyn QuoteSource>> + Send + Sync + 'static,
    {
        self.fetchers.insert(exchange, Arc::new(fetch))
    }

    /// Builder form of [`register`](Self::register).
    pub fn with<F>(mut self, exchange: Exchange, fetch: F) -> Self
    where
        F: Fn(&str) -> Result<Box<dyn QuoteSource>> + Send + Sync + 'static,
    {
        self.register(exchange, fetch);
        self
    }

    /// Looks up the fetch function for `exchange`.
    pub fn fetcher(&self, exchange: Exchange) -> Result<FetchFn> {
        self.fetchers
            .get(&exchange)
            .cloned()
            .ok_or(QuoteError::UnknownExchange(exchange))
    }

    /// Configured exchanges, in identifier order.
    pub fn exchanges(&self) -> impl Iterator<Item = Exchange> + '_ {
        self.fetchers.keys().copied()
    }

    /// Keeps only the exchanges for which `keep` returns `true`.
    pub fn retain<P>(&mut self, mut keep: P)
    where
        P: FnMut(Exchange) -> bool,
    {
        self.fetchers.retain(|exchange, _| keep(*exchange));
    }

    /// Number of configured exchanges.
    pub fn len(&self) -> usize {
        self.fetchers.len()
    }

    /// Whether no exchange is configured.
    pub fn is_empty(&self) -> bool {
        self.fetchers.is_empty()
    }
}
