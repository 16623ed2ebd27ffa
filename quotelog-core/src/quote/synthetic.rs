//! Deterministic synthetic quote provider.
//!
//! A per-symbol random walk seeded from the symbol name, so repeated runs and
//! tests see the same series. Offline/demo mode only; synthetic prices never
//! mix with network data within one run.

use super::{QuoteError, QuoteProvider};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::sync::Mutex;

/// Synthetic quote provider.
pub struct SyntheticProvider {
    walks: Mutex<HashMap<String, SymbolWalk>>,
}

struct SymbolWalk {
    rng: StdRng,
    price: f64,
}

/// Deterministic seed from the symbol name.
fn seed_for(symbol: &str) -> [u8; 32] {
    let mut seed = [0u8; 32];
    for (i, byte) in symbol.bytes().enumerate() {
        seed[i % 32] = seed[i % 32].wrapping_mul(31).wrapping_add(byte);
    }
    seed
}

impl SyntheticProvider {
    pub fn new() -> Self {
        Self {
            walks: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for SyntheticProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl QuoteProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch_last(&self, symbol: &str) -> Result<f64, QuoteError> {
        let mut walks = self.walks.lock().expect("synthetic walk lock poisoned");
        let walk = walks.entry(symbol.to_string()).or_insert_with(|| {
            let mut rng = StdRng::from_seed(seed_for(symbol));
            let price = rng.gen_range(50.0..500.0);
            SymbolWalk { rng, price }
        });

        let step: f64 = walk.rng.gen_range(-0.01..0.01);
        walk.price = (walk.price * (1.0 + step)).max(0.001);
        Ok(walk.price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walk_is_deterministic_per_symbol() {
        let a = SyntheticProvider::new();
        let b = SyntheticProvider::new();

        let series_a: Vec<f64> = (0..5).map(|_| a.fetch_last("AAPL").unwrap()).collect();
        let series_b: Vec<f64> = (0..5).map(|_| b.fetch_last("AAPL").unwrap()).collect();
        assert_eq!(series_a, series_b);
    }

    #[test]
    fn different_symbols_get_different_walks() {
        let provider = SyntheticProvider::new();
        let aapl = provider.fetch_last("AAPL").unwrap();
        let tsla = provider.fetch_last("TSLA").unwrap();
        assert_ne!(aapl, tsla);
    }

    #[test]
    fn prices_stay_positive() {
        let provider = SyntheticProvider::new();
        for _ in 0..200 {
            let price = provider.fetch_last("MSFT").unwrap();
            assert!(price > 0.0);
        }
    }
}
