//! Error collection and report formatting.
//!
//! A [`Report`] is built from one ticker task's [`Answer`]. Every accessor of
//! every quote is read independently; failed reads become `QuoteError::Field`
//! records and show up as `n/a` in the report line, while the remaining fields
//! are still printed. A failed fetch contributes its error and no line.
//!
//! Output block for one task:
//!
//! ```text
//! Bitkub: BTC - bid 1,234,000.5, ask 1,235,000, last 1,234,500
//! Satang: BTC - bid n/a, ask 1,235,100, last 1,234,600
//! errors encountered: [error getting bid for BTC (Satang): field `bidPrice` missing from response]
//! ```
use std::fmt;
use std::io::{self, Write};

use crate::error::QuoteError;
use crate::exchange::{Exchange, Field};
use crate::fetcher::Answer;
use crate::source::QuoteSource;

/// Placeholder printed for a field whose accessor failed.
pub const UNAVAILABLE: &str = "n/a";

/// One `(ticker, exchange)` row of the report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportLine {
    /// Exchange the quote came from.
    pub exchange: Exchange,
    /// Normalized ticker symbol.
    pub ticker: String,
    /// Highest bid, if it could be read.
    pub bid: Option<f64>,
    /// Lowest ask, if it could be read.
    pub ask: Option<f64>,
    /// Last traded price, if it could be read.
    pub last: Option<f64>,
}

impl fmt::Display for ReportLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} - bid {}, ask {}, last {}",
            self.exchange,
            self.ticker,
            format_price(self.bid),
            format_price(self.ask),
            format_price(self.last)
        )
    }
}

/// Report lines and collected errors of one ticker task.
#[derive(Debug, Default)]
pub struct Report {
    /// One line per successfully fetched `(ticker, exchange)` pair.
    pub lines: Vec<ReportLine>,
    /// Fetch and field errors, in the order they were encountered.
    pub errors: Vec<QuoteError>,
}

impl Report {
    /// Reads every quote in `answer`, collecting lines and errors.
    pub fn from_answer(answer: Answer) -> Self {
        let mut report = Report::default();
        for (ticker, quotes) in answer {
            for (exchange, outcome) in quotes {
                match outcome {
                    Ok(quote) => {
                        let line = report.read_quote(&ticker, exchange, quote.as_ref());
                        report.lines.push(line);
                    }
                    Err(e) => report.errors.push(e),
                }
            }
        }
        report
    }

    fn read_quote(&mut self, ticker: &str, exchange: Exchange, quote: &dyn QuoteSource) -> ReportLine {
        let last = self.read_field(ticker, exchange, quote, Field::Last);
        let bid = self.read_field(ticker, exchange, quote, Field::Bid);
        let ask = self.read_field(ticker, exchange, quote, Field::Ask);
        ReportLine {
            exchange,
            ticker: ticker.to_string(),
            bid,
            ask,
            last,
        }
    }

    fn read_field(
        &mut self,
        ticker: &str,
        exchange: Exchange,
        quote: &dyn QuoteSource,
        field: Field,
    ) -> Option<f64> {
        match quote.get(field) {
            Ok(value) => Some(value),
            Err(source) => {
                self.errors.push(QuoteError::Field {
                    field,
                    ticker: ticker.to_string(),
                    exchange,
                    source: Box::new(source),
                });
                None
            }
        }
    }

    /// Number of fetch-failure records.
    pub fn fetch_failures(&self) -> usize {
        self.errors.iter().filter(|e| e.is_fetch_failure()).count()
    }

    /// Number of field-access records.
    pub fn field_failures(&self) -> usize {
        self.errors
            .iter()
            .filter(|e| matches!(e, QuoteError::Field { .. }))
            .count()
    }

    /// The `errors encountered: [...]` line, printed even when empty.
    pub fn error_summary(&self) -> String {
        let messages: Vec<String> = self.errors.iter().map(|e| e.to_string()).collect();
        format!("errors encountered: [{}]", messages.join(", "))
    }

    /// Writes the report lines followed by the error summary as a single block.
    pub fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        let mut block = String::new();
        for line in &self.lines {
            block.push_str(&line.to_string());
            block.push('\n');
        }
        block.push_str(&self.error_summary());
        block.push('\n');

        out.write_all(block.as_bytes())?;
        out.flush()
    }
}

/// Formats an optional price, using [`UNAVAILABLE`] for a missing value.
pub fn format_price(value: Option<f64>) -> String {
    match value {
        Some(v) => format_number(v),
        None => UNAVAILABLE.to_string(),
    }
}

/// Formats a number with comma thousands separators and its shortest decimal form.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let text = value.to_string();
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (unsigned, None),
    };

    let mut result = String::with_capacity(text.len() + int_part.len() / 3);
    result.push_str(sign);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    if let Some(frac_part) = frac_part {
        result.push('.');
        result.push_str(frac_part);
    }
    result
}
