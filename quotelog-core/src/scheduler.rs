//! Poll scheduler: the tick loop, cancellation token, and progress reporting.
//!
//! One sequential thread drives the whole run. Each tick stamps one
//! wall-clock time, fetches every configured symbol in declared order, and
//! appends one row per symbol (price or the unavailable marker). Between
//! ticks the scheduler sleeps in small slices, polling the cancellation token
//! so a stop is observed within the polling granularity rather than a full
//! interval.

use crate::log::{LogError, SampleLog};
use crate::quote::{QuoteError, QuoteProvider};
use crate::sample::{tick_timestamp, Sample};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Cooperative cancellation flag, shared between the operator's signal
/// handler and the scheduler loop.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Loop phase, advanced by the scheduler as it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Ticking,
    Waiting,
    Stopped,
}

/// Observer for per-sample and per-tick progress.
pub trait PollProgress: Send {
    /// Called after a sample is appended to the log.
    fn on_sample(&self, sample: &Sample);

    /// Called when a fetch fails. The sample is still written, marked
    /// unavailable.
    fn on_fetch_error(&self, symbol: &str, error: &QuoteError);

    /// Called after all symbols in a tick have been appended.
    fn on_tick(&self, tick: u64);
}

/// Progress reporter that prints one line per sample.
pub struct StdoutProgress;

impl PollProgress for StdoutProgress {
    fn on_sample(&self, sample: &Sample) {
        println!(
            "[{}] {} @ {}",
            sample.timestamp_text(),
            sample.symbol,
            sample.price_text()
        );
    }

    fn on_fetch_error(&self, symbol: &str, error: &QuoteError) {
        eprintln!("fetch failed for {symbol}: {error}");
    }

    fn on_tick(&self, _tick: u64) {}
}

/// Pacing knobs, split out so tests can run without real delays.
#[derive(Debug, Clone, Copy)]
pub struct Pacing {
    /// Pause between symbols within a tick, to avoid bursting the provider.
    pub symbol_pause: Duration,
    /// Granularity at which waits poll the cancellation token.
    pub cancel_poll: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            symbol_pause: Duration::from_millis(200),
            cancel_poll: Duration::from_millis(100),
        }
    }
}

/// Totals reported when the loop stops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunStats {
    pub ticks: u64,
    pub samples: u64,
    pub unavailable: u64,
}

/// Owns the loop state: symbol order, current tick, phase, pacing.
///
/// Built once per run; no process-wide globals.
pub struct PollScheduler {
    symbols: Vec<String>,
    interval: Duration,
    pacing: Pacing,
    state: SchedulerState,
    tick: u64,
}

impl PollScheduler {
    pub fn new(symbols: Vec<String>, interval: Duration) -> Self {
        Self {
            symbols,
            interval,
            pacing: Pacing::default(),
            state: SchedulerState::Idle,
            tick: 0,
        }
    }

    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Run until the token is raised.
    ///
    /// Storage failures abort with an error; provider failures become
    /// unavailable samples and the loop continues. Cancellation observed
    /// mid-tick truncates the remaining pauses but the in-flight tick still
    /// completes, so every tick contributes exactly one row per symbol.
    pub fn run(
        &mut self,
        provider: &dyn QuoteProvider,
        log: &SampleLog,
        cancel: &CancelToken,
        progress: &dyn PollProgress,
    ) -> Result<RunStats, LogError> {
        let mut stats = RunStats {
            ticks: 0,
            samples: 0,
            unavailable: 0,
        };

        while !cancel.is_cancelled() {
            self.state = SchedulerState::Ticking;
            self.tick += 1;
            let timestamp = tick_timestamp();

            for (i, symbol) in self.symbols.iter().enumerate() {
                let price = match provider.fetch_last(symbol) {
                    Ok(price) => Some(price),
                    Err(e) => {
                        progress.on_fetch_error(symbol, &e);
                        None
                    }
                };
                if price.is_none() {
                    stats.unavailable += 1;
                }

                let sample = Sample::new(timestamp, symbol.clone(), price);
                log.append(&sample)?;
                stats.samples += 1;
                progress.on_sample(&sample);

                if i + 1 < self.symbols.len() {
                    self.wait(self.pacing.symbol_pause, cancel);
                }
            }

            stats.ticks = self.tick;
            progress.on_tick(self.tick);

            if cancel.is_cancelled() {
                break;
            }

            self.state = SchedulerState::Waiting;
            if !self.wait(self.interval, cancel) {
                break;
            }
        }

        self.state = SchedulerState::Stopped;
        Ok(stats)
    }

    /// Sleep in `cancel_poll` slices. Returns false if the token was raised
    /// before the full duration elapsed.
    fn wait(&self, total: Duration, cancel: &CancelToken) -> bool {
        let mut waited = Duration::ZERO;
        while waited < total {
            if cancel.is_cancelled() {
                return false;
            }
            let slice = if self.pacing.cancel_poll.is_zero() {
                total - waited
            } else {
                self.pacing.cancel_poll.min(total - waited)
            };
            std::thread::sleep(slice);
            waited += slice;
        }
        !cancel.is_cancelled()
    }
}
