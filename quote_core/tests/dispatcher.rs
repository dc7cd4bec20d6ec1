//! End-to-end runs of the dispatcher against in-memory exchanges.

use std::collections::HashSet;
use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use quote_core::{Dispatcher, Exchange, ExchangeRegistry, QuoteError, QuoteSource, Result, RunSummary};

struct FakeQuote {
    last: Option<f64>,
    bid: Option<f64>,
    ask: Option<f64>,
}

impl QuoteSource for FakeQuote {
    fn last(&self) -> Result<f64> {
        self.last.ok_or(QuoteError::MissingField("last"))
    }
    fn bid(&self) -> Result<f64> {
        self.bid.ok_or(QuoteError::MissingField("bid"))
    }
    fn ask(&self) -> Result<f64> {
        self.ask.ok_or(QuoteError::MissingField("ask"))
    }
}

/// Quote whose `last` accessor panics, taking its ticker task down with it.
struct ExplodingQuote;

impl QuoteSource for ExplodingQuote {
    fn last(&self) -> Result<f64> {
        panic!("last price decoder crashed")
    }
    fn bid(&self) -> Result<f64> {
        Ok(1.0)
    }
    fn ask(&self) -> Result<f64> {
        Ok(1.0)
    }
}

/// Sink that rejects every write.
struct ClosedSink;

impl Write for ClosedSink {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "stdout closed"))
    }
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn full_quote(last: f64) -> Result<Box<dyn QuoteSource>> {
    Ok(Box::new(FakeQuote {
        last: Some(last),
        bid: Some(last - 1.0),
        ask: Some(last + 1.0),
    }))
}

fn price_of(ticker: &str) -> f64 {
    match ticker {
        "BTC" => 2_000_000.0,
        "ETH" => 120_000.0,
        _ => 10.0,
    }
}

/// Both exchanges answer every ticker; Satang quotes one baht above Bitkub.
fn healthy_registry() -> ExchangeRegistry {
    ExchangeRegistry::new()
        .with(Exchange::Bitkub, |t: &str| full_quote(price_of(t)))
        .with(Exchange::Satang, |t: &str| full_quote(price_of(t) + 1.0))
}

fn run(dispatcher: &Dispatcher, tickers: &[&str]) -> (Result<RunSummary>, Vec<String>) {
    let mut out = Vec::new();
    let result = dispatcher.run(tickers, &mut out);
    let text = String::from_utf8(out).unwrap();
    (result, text.lines().map(str::to_string).collect())
}

fn is_well_formed(line: &str) -> bool {
    if let Some(rest) = line.strip_prefix("errors encountered: [") {
        return rest.ends_with(']');
    }
    let Some((exchange, rest)) = line.split_once(": ") else {
        return false;
    };
    if exchange.parse::<Exchange>().is_err() {
        return false;
    }
    let Some((ticker, fields)) = rest.split_once(" - ") else {
        return false;
    };
    let parts: Vec<&str> = fields.split(", ").collect();
    !ticker.is_empty()
        && parts.len() == 3
        && parts[0].starts_with("bid ")
        && parts[1].starts_with("ask ")
        && parts[2].starts_with("last ")
}

#[test]
fn two_tickers_on_two_exchanges_print_four_lines_and_two_summaries() {
    let dispatcher = Dispatcher::new(healthy_registry());
    let (result, lines) = run(&dispatcher, &["btc", "eth"]);

    let summary = result.unwrap();
    assert_eq!(summary.tickers, 2);
    assert_eq!(summary.lines, 4);
    assert_eq!(summary.fetch_failures, 0);
    assert_eq!(summary.field_failures, 0);

    let report_lines: HashSet<&str> = lines
        .iter()
        .map(String::as_str)
        .filter(|l| !l.starts_with("errors encountered"))
        .collect();
    let expected: HashSet<&str> = [
        "Bitkub: BTC - bid 1,999,999, ask 2,000,001, last 2,000,000",
        "Satang: BTC - bid 2,000,000, ask 2,000,002, last 2,000,001",
        "Bitkub: ETH - bid 119,999, ask 120,001, last 120,000",
        "Satang: ETH - bid 120,000, ask 120,002, last 120,001",
    ]
    .into_iter()
    .collect();
    assert_eq!(report_lines, expected);

    let summaries: Vec<&String> = lines
        .iter()
        .filter(|l| l.starts_with("errors encountered"))
        .collect();
    assert_eq!(summaries, vec!["errors encountered: []", "errors encountered: []"]);
}

#[test]
fn tickers_are_uppercased_before_fetching() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorder = Arc::clone(&seen);
    let registry = ExchangeRegistry::new().with(Exchange::Bitkub, move |t: &str| {
        recorder.lock().unwrap().push(t.to_string());
        full_quote(1.0)
    });

    let (result, lines) = run(&Dispatcher::new(registry), &["eth"]);
    result.unwrap();
    assert_eq!(*seen.lock().unwrap(), vec!["ETH".to_string()]);
    assert_eq!(lines[0], "Bitkub: ETH - bid 0, ask 2, last 1");
}

#[test]
fn one_failing_field_is_reported_once_and_the_line_survives() {
    let registry = healthy_registry().with(Exchange::Satang, |t: &str| {
        Ok(Box::new(FakeQuote {
            last: Some(price_of(t)),
            bid: None,
            ask: Some(price_of(t) + 2.0),
        }) as Box<dyn QuoteSource>)
    });

    let (result, lines) = run(&Dispatcher::new(registry), &["ETH"]);
    let summary = result.unwrap();
    assert_eq!(summary.field_failures, 1);

    assert_eq!(
        lines,
        vec![
            "Bitkub: ETH - bid 119,999, ask 120,001, last 120,000",
            "Satang: ETH - bid n/a, ask 120,002, last 120,000",
            "errors encountered: [error getting bid for ETH (Satang): field `bid` missing from response]",
        ]
    );
    assert!(summary.into_result().is_ok());
}

#[test]
fn fetch_failure_stays_with_its_ticker() {
    let registry = healthy_registry().with(Exchange::Bitkub, |t: &str| {
        if t == "DOGE" {
            Err(QuoteError::TickerNotFound {
                exchange: Exchange::Bitkub,
                ticker: t.to_string(),
            })
        } else {
            full_quote(price_of(t))
        }
    });

    let (result, lines) = run(&Dispatcher::new(registry), &["btc", "doge"]);
    let summary = result.unwrap();
    assert_eq!(summary.lines, 3);
    assert_eq!(summary.fetch_failures, 1);

    assert!(lines.contains(&"Bitkub: BTC - bid 1,999,999, ask 2,000,001, last 2,000,000".to_string()));
    assert!(lines.contains(&"Satang: BTC - bid 2,000,000, ask 2,000,002, last 2,000,001".to_string()));
    assert!(lines.contains(&"Satang: DOGE - bid 10, ask 12, last 11".to_string()));
    assert!(lines.contains(
        &"errors encountered: [error fetching quote for DOGE (Bitkub): ticker DOGE not found on Bitkub]"
            .to_string()
    ));

    assert!(matches!(
        summary.into_result(),
        Err(QuoteError::FetchFailures(1))
    ));
}

#[test]
fn no_tickers_fails_before_any_exchange_call() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let registry = ExchangeRegistry::new().with(Exchange::Bitkub, move |_: &str| {
        counter.fetch_add(1, Ordering::SeqCst);
        full_quote(1.0)
    });

    let (result, lines) = run(&Dispatcher::new(registry), &[]);
    assert!(matches!(result, Err(QuoteError::MissingTickers)));
    assert!(lines.is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn repeated_tickers_are_queried_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let registry = ExchangeRegistry::new().with(Exchange::Bitkub, move |_: &str| {
        counter.fetch_add(1, Ordering::SeqCst);
        full_quote(5.0)
    });

    let (result, lines) = run(&Dispatcher::new(registry), &["btc", "BTC", " btc "]);
    assert_eq!(result.unwrap().tickers, 1);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(lines.len(), 2);
}

#[test]
fn hung_exchange_times_out_without_blocking_the_other() {
    let registry = healthy_registry().with(Exchange::Satang, |_: &str| {
        thread::sleep(Duration::from_millis(500));
        full_quote(1.0)
    });
    let dispatcher = Dispatcher::new(registry).with_fetch_timeout(Duration::from_millis(30));

    let (result, lines) = run(&dispatcher, &["btc"]);
    let summary = result.unwrap();
    assert_eq!(summary.fetch_failures, 1);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "Bitkub: BTC - bid 1,999,999, ask 2,000,001, last 2,000,000");
    assert!(lines[1].starts_with("errors encountered: [error fetching quote for BTC (Satang): timed out"));
}

#[test]
fn concurrent_tasks_never_interleave_output() {
    let registry = ExchangeRegistry::new()
        .with(Exchange::Bitkub, |t: &str| {
            thread::sleep(Duration::from_millis((t.len() % 4) as u64));
            full_quote(1234.5)
        })
        .with(Exchange::Satang, |t: &str| {
            thread::sleep(Duration::from_millis((t.len() % 3) as u64));
            Ok(Box::new(FakeQuote {
                last: Some(1234.5),
                bid: None,
                ask: None,
            }) as Box<dyn QuoteSource>)
        });

    let tickers: Vec<String> = (0..48).map(|i| format!("coin{}", i)).collect();
    let mut out = Vec::new();
    let summary = Dispatcher::new(registry).run(&tickers, &mut out).unwrap();
    assert_eq!(summary.tickers, 48);
    assert_eq!(summary.lines, 96);
    assert_eq!(summary.field_failures, 96);

    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 48 * 3);
    assert!(lines.iter().all(|l| is_well_formed(l)), "malformed output:\n{}", text);

    // Each block is Bitkub line, Satang line, summary, all for the same ticker.
    let mut reported = HashSet::new();
    for block in lines.chunks(3) {
        let ticker = block[0]
            .strip_prefix("Bitkub: ")
            .and_then(|rest| rest.split_once(" - "))
            .map(|(ticker, _)| ticker)
            .unwrap();
        assert!(block[1].starts_with(&format!("Satang: {} - ", ticker)));
        assert!(block[2].starts_with("errors encountered: ["));
        assert!(block[2].contains(&format!("error getting bid for {} (Satang)", ticker)));
        assert!(reported.insert(ticker.to_string()));
    }
    assert_eq!(reported.len(), 48);
}

#[test]
fn ticker_with_nul_byte_is_reported_not_panicked() {
    let dispatcher = Dispatcher::new(healthy_registry());
    let (result, lines) = run(&dispatcher, &["a\0b"]);

    let summary = result.unwrap();
    assert_eq!(summary.lines, 2);
    assert!(summary.failed_tasks.is_empty());
    assert_eq!(lines[0], "Bitkub: A\0B - bid 9, ask 11, last 10");
    assert_eq!(lines[2], "errors encountered: []");
}

#[test]
fn panicking_task_is_recorded_and_others_still_report() {
    let registry = healthy_registry().with(Exchange::Bitkub, |t: &str| {
        if t == "BTC" {
            Ok(Box::new(ExplodingQuote) as Box<dyn QuoteSource>)
        } else {
            full_quote(price_of(t))
        }
    });

    let (result, lines) = run(&Dispatcher::new(registry), &["btc", "eth"]);
    let summary = result.unwrap();
    assert_eq!(summary.failed_tasks, vec!["BTC".to_string()]);
    assert_eq!(summary.lines, 2);

    assert_eq!(
        lines,
        vec![
            "Bitkub: ETH - bid 119,999, ask 120,001, last 120,000",
            "Satang: ETH - bid 120,000, ask 120,002, last 120,001",
            "errors encountered: []",
        ]
    );
    assert!(matches!(
        summary.into_result(),
        Err(QuoteError::TaskPanicked(t)) if t == "BTC"
    ));
}

#[test]
fn sink_failure_still_waits_for_every_task() {
    let finished = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&finished);
    let registry = ExchangeRegistry::new().with(Exchange::Bitkub, move |t: &str| {
        thread::sleep(Duration::from_millis(60 * t.len() as u64));
        counter.fetch_add(1, Ordering::SeqCst);
        full_quote(1.0)
    });

    let result = Dispatcher::new(registry).run(["a", "bb", "ccc"], &mut ClosedSink);
    assert!(matches!(result, Err(QuoteError::Io(_))));
    assert_eq!(finished.load(Ordering::SeqCst), 3);
}
