//! Scheduler properties: one row per symbol per tick, configured order,
//! provider-failure downgrade, and cancellation latency.

use quotelog_core::log::{read_log, SampleLog};
use quotelog_core::quote::{QuoteError, QuoteProvider};
use quotelog_core::sample::Sample;
use quotelog_core::scheduler::{
    CancelToken, Pacing, PollProgress, PollScheduler, SchedulerState,
};
use std::time::{Duration, Instant};
use tempfile::tempdir;

struct FixedProvider(f64);

impl QuoteProvider for FixedProvider {
    fn name(&self) -> &str {
        "fixed"
    }

    fn fetch_last(&self, _symbol: &str) -> Result<f64, QuoteError> {
        Ok(self.0)
    }
}

struct FailingProvider;

impl QuoteProvider for FailingProvider {
    fn name(&self) -> &str {
        "failing"
    }

    fn fetch_last(&self, symbol: &str) -> Result<f64, QuoteError> {
        Err(QuoteError::NetworkUnreachable(format!(
            "no route for {symbol}"
        )))
    }
}

/// Progress observer that raises the token after a fixed number of ticks.
struct CancelAfter {
    ticks: u64,
    cancel: CancelToken,
}

impl PollProgress for CancelAfter {
    fn on_sample(&self, _sample: &Sample) {}

    fn on_fetch_error(&self, _symbol: &str, _error: &QuoteError) {}

    fn on_tick(&self, tick: u64) {
        if tick >= self.ticks {
            self.cancel.cancel();
        }
    }
}

struct NoopProgress;

impl PollProgress for NoopProgress {
    fn on_sample(&self, _sample: &Sample) {}
    fn on_fetch_error(&self, _symbol: &str, _error: &QuoteError) {}
    fn on_tick(&self, _tick: u64) {}
}

fn fast_pacing() -> Pacing {
    Pacing {
        symbol_pause: Duration::ZERO,
        cancel_poll: Duration::from_millis(1),
    }
}

#[test]
fn one_row_per_symbol_per_tick_in_configured_order() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("quotes.csv");
    let log = SampleLog::create(&path).unwrap();

    let symbols = vec!["AAPL".to_string(), "TSLA".to_string(), "MSFT".to_string()];
    let cancel = CancelToken::new();
    let progress = CancelAfter {
        ticks: 2,
        cancel: cancel.clone(),
    };
    let mut scheduler = PollScheduler::new(symbols.clone(), Duration::from_millis(10))
        .with_pacing(fast_pacing());

    let stats = scheduler
        .run(&FixedProvider(101.5), &log, &cancel, &progress)
        .unwrap();

    assert_eq!(stats.ticks, 2);
    assert_eq!(stats.samples, 6);
    assert_eq!(stats.unavailable, 0);
    assert_eq!(scheduler.state(), SchedulerState::Stopped);

    let rows = read_log(&path).unwrap();
    assert_eq!(rows.len(), 6);
    for (i, row) in rows.iter().enumerate() {
        assert_eq!(row.symbol, symbols[i % symbols.len()]);
        assert_eq!(row.price, Some(101.5));
    }

    // Non-decreasing timestamps, one stamp shared within each tick.
    assert!(rows.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    assert_eq!(rows[0].timestamp, rows[2].timestamp);
    assert_eq!(rows[3].timestamp, rows[5].timestamp);
}

#[test]
fn provider_failures_become_unavailable_rows() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("quotes.csv");
    let log = SampleLog::create(&path).unwrap();

    let symbols = vec!["AAPL".to_string(), "TSLA".to_string()];
    let cancel = CancelToken::new();
    let progress = CancelAfter {
        ticks: 1,
        cancel: cancel.clone(),
    };
    let mut scheduler =
        PollScheduler::new(symbols, Duration::from_millis(10)).with_pacing(fast_pacing());

    let stats = scheduler
        .run(&FailingProvider, &log, &cancel, &progress)
        .unwrap();

    assert_eq!(stats.ticks, 1);
    assert_eq!(stats.samples, 2);
    assert_eq!(stats.unavailable, 2);

    let rows = read_log(&path).unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.price.is_none()));
}

#[test]
fn pre_cancelled_token_runs_zero_ticks() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("quotes.csv");
    let log = SampleLog::create(&path).unwrap();

    let cancel = CancelToken::new();
    cancel.cancel();
    let mut scheduler = PollScheduler::new(vec!["AAPL".to_string()], Duration::from_secs(60))
        .with_pacing(fast_pacing());

    let stats = scheduler
        .run(&FixedProvider(1.0), &log, &cancel, &NoopProgress)
        .unwrap();

    assert_eq!(stats.ticks, 0);
    assert_eq!(stats.samples, 0);
    assert_eq!(scheduler.state(), SchedulerState::Stopped);
    assert!(read_log(&path).unwrap().is_empty());
}

#[test]
fn cancellation_during_inter_tick_wait_stops_promptly() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("quotes.csv");
    let log = SampleLog::create(&path).unwrap();

    // A long interval: without prompt cancellation this test would hang for
    // a minute. The token is raised from another thread mid-wait.
    let cancel = CancelToken::new();
    let canceller = cancel.clone();
    std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(50));
        canceller.cancel();
    });

    let mut scheduler = PollScheduler::new(vec!["AAPL".to_string()], Duration::from_secs(60))
        .with_pacing(Pacing {
            symbol_pause: Duration::ZERO,
            cancel_poll: Duration::from_millis(10),
        });

    let start = Instant::now();
    let stats = scheduler
        .run(&FixedProvider(42.0), &log, &cancel, &NoopProgress)
        .unwrap();

    assert!(start.elapsed() < Duration::from_secs(5));
    assert_eq!(stats.ticks, 1);

    // The log rows written so far are intact and readable.
    let rows = read_log(&path).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].symbol, "AAPL");
}
