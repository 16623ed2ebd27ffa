//! The sample value type and price column formatting.

use chrono::{NaiveDateTime, Timelike};

/// Timestamp column format, second resolution.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Literal written to the price column when the provider had no price.
/// Kept type-distinct from numeric values (never zero, never empty) so
/// downstream parsing can tell the two apart.
pub const UNAVAILABLE_MARKER: &str = "N/A";

/// A single reading: one symbol at one tick, price present or unavailable.
///
/// Created once per symbol per tick and never mutated; the log appends
/// samples and never deletes them.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub timestamp: NaiveDateTime,
    pub symbol: String,
    pub price: Option<f64>,
}

impl Sample {
    pub fn new(timestamp: NaiveDateTime, symbol: impl Into<String>, price: Option<f64>) -> Self {
        Self {
            timestamp,
            symbol: symbol.into(),
            price,
        }
    }

    /// Price column text: exactly 3 decimal places, or the unavailable marker.
    pub fn price_text(&self) -> String {
        match self.price {
            Some(price) => format!("{price:.3}"),
            None => UNAVAILABLE_MARKER.to_string(),
        }
    }

    /// Timestamp column text in `YYYY-MM-DD HH:MM:SS` form.
    pub fn timestamp_text(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}

/// Current wall-clock time truncated to whole seconds, one stamp per tick.
pub fn tick_timestamp() -> NaiveDateTime {
    let now = chrono::Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}
