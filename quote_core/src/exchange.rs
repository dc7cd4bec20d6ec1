//! Exchange identifiers and quote field names.

use clap::ValueEnum;
use strum_macros::{Display, EnumIter, EnumString};

/// Set of supported exchanges.
#[allow(missing_docs)]
#[derive(
    Debug,
    Clone,
    Copy,
    ValueEnum,
    Display,
    EnumString,
    EnumIter,
    Hash,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
)]
#[value(rename_all = "lower")]
#[strum(ascii_case_insensitive)]
pub enum Exchange {
    Bitkub,
    Satang,
}

/// Quote accessor names, as they appear in error records.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, Display, Hash, Eq, PartialEq)]
#[strum(serialize_all = "lowercase")]
pub enum Field {
    Last,
    Bid,
    Ask,
}
