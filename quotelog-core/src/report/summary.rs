//! Per-symbol summary statistics over a run's samples.

use crate::sample::Sample;

/// Aggregates over one symbol's available prices.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolSummary {
    pub symbol: String,
    pub highest: f64,
    pub lowest: f64,
    pub average: f64,
    /// Number of samples that carried a price.
    pub sample_count: usize,
}

/// Symbols in first-appearance order.
///
/// By the tick invariant (one row per symbol per tick, in declared order)
/// this equals the configured polling order.
pub fn symbol_order(samples: &[Sample]) -> Vec<String> {
    let mut order: Vec<String> = Vec::new();
    for sample in samples {
        if !order.iter().any(|s| s == &sample.symbol) {
            order.push(sample.symbol.clone());
        }
    }
    order
}

/// One summary row per symbol with at least one available price.
///
/// Symbols whose samples were all unavailable are skipped.
pub fn summarize(samples: &[Sample]) -> Vec<SymbolSummary> {
    let mut summaries = Vec::new();

    for symbol in symbol_order(samples) {
        let prices: Vec<f64> = samples
            .iter()
            .filter(|s| s.symbol == symbol)
            .filter_map(|s| s.price)
            .collect();
        if prices.is_empty() {
            continue;
        }

        let highest = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let lowest = prices.iter().copied().fold(f64::INFINITY, f64::min);
        let average = prices.iter().sum::<f64>() / prices.len() as f64;

        summaries.push(SymbolSummary {
            symbol,
            highest,
            lowest,
            average,
            sample_count: prices.len(),
        });
    }

    summaries
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use proptest::prelude::*;

    fn ts() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 8, 6)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    fn sample(symbol: &str, price: Option<f64>) -> Sample {
        Sample::new(ts(), symbol, price)
    }

    #[test]
    fn computes_highest_lowest_average() {
        let samples = vec![
            sample("AAPL", Some(10.0)),
            sample("AAPL", Some(12.5)),
            sample("AAPL", Some(11.25)),
        ];

        let summaries = summarize(&samples);
        assert_eq!(summaries.len(), 1);
        let s = &summaries[0];
        assert_eq!(s.symbol, "AAPL");
        assert_eq!(s.highest, 12.5);
        assert_eq!(s.lowest, 10.0);
        assert!((s.average - 11.25).abs() < 1e-9);
        assert_eq!(s.sample_count, 3);
    }

    #[test]
    fn unavailable_samples_are_excluded_from_stats() {
        let samples = vec![
            sample("AAPL", Some(10.0)),
            sample("AAPL", None),
            sample("AAPL", Some(20.0)),
        ];

        let summaries = summarize(&samples);
        assert_eq!(summaries[0].sample_count, 2);
        assert!((summaries[0].average - 15.0).abs() < 1e-9);
    }

    #[test]
    fn symbol_with_only_unavailable_samples_is_skipped() {
        let samples = vec![
            sample("AAPL", Some(10.0)),
            sample("TSLA", None),
            sample("TSLA", None),
        ];

        let summaries = summarize(&samples);
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].symbol, "AAPL");
    }

    #[test]
    fn order_follows_first_appearance() {
        let samples = vec![
            sample("MSFT", Some(1.0)),
            sample("AAPL", Some(2.0)),
            sample("MSFT", Some(3.0)),
            sample("AAPL", Some(4.0)),
        ];

        assert_eq!(symbol_order(&samples), vec!["MSFT", "AAPL"]);
        let summaries = summarize(&samples);
        assert_eq!(summaries[0].symbol, "MSFT");
        assert_eq!(summaries[1].symbol, "AAPL");
    }

    #[test]
    fn empty_input_yields_no_summaries() {
        assert!(summarize(&[]).is_empty());
    }

    proptest! {
        #[test]
        fn average_lies_between_bounds(
            prices in proptest::collection::vec(0.001f64..10_000.0, 1..50)
        ) {
            let samples: Vec<Sample> =
                prices.iter().map(|p| sample("X", Some(*p))).collect();

            let summaries = summarize(&samples);
            prop_assert_eq!(summaries.len(), 1);
            let s = &summaries[0];
            prop_assert!(s.lowest <= s.highest);
            prop_assert!(s.lowest <= s.average + 1e-9);
            prop_assert!(s.average <= s.highest + 1e-9);
        }
    }
}
