//! Quote source capability implemented by every exchange.
//!
//! A `QuoteSource` is the handle returned by an exchange fetch. Its three
//! accessors are independent: any one of them may fail without affecting the
//! others.
use std::sync::Arc;

use crate::exchange::Field;
use crate::result::Result;

/// Per-exchange quote handle with independently failing accessors.
pub trait QuoteSource: Send {
    /// Last traded price.
    fn last(&self) -> Result<f64>;

    /// Highest bid.
    fn bid(&self) -> Result<f64>;

    /// Lowest ask.
    fn ask(&self) -> Result<f64>;

    /// Reads one field by name.
    fn get(&self, field: Field) -> Result<f64> {
        match field {
            Field::Last => self.last(),
            Field::Bid => self.bid(),
            Field::Ask => self.ask(),
        }
    }
}

/// Factory that fetches a quote handle for a normalized ticker symbol.
pub type FetchFn = Arc<dyn Fn(&str) -> Result<Box<dyn QuoteSource>> + Send + Sync>;
