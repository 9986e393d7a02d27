use chrono::Duration;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use plutus_core::MarketTick;
use plutus_ports::{Clock, PriceSource};

/// Number of points in a generated series
pub const HISTORY_POINTS: usize = 101;

/// Window applied when a caller does not specify one
pub const DEFAULT_WINDOW_HOURS: u32 = 24;

/// Derives a synthetic look-back series from the live price.
///
/// The walk runs backwards from the current price, so the final point of the
/// series always equals the live quote; every point is floored at half the
/// live price to keep the drift bounded. Reads the price table once and owns
/// no mutable state, so calls are safe concurrently with ticking.
pub struct HistoryGenerator {
    prices: Arc<dyn PriceSource>,
    clock: Arc<dyn Clock>,
    /// Volatility fraction of the backward walk
    volatility: f64,
    /// Base seed; per-call RNGs derive from it and the symbol
    seed: Option<u64>,
}

impl HistoryGenerator {
    pub fn new(prices: Arc<dyn PriceSource>, clock: Arc<dyn Clock>) -> Self {
        Self {
            prices,
            clock,
            volatility: 0.02,
            seed: None,
        }
    }

    /// Create with a base seed for reproducible series
    pub fn with_seed(prices: Arc<dyn PriceSource>, clock: Arc<dyn Clock>, seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::new(prices, clock)
        }
    }

    /// Series of [`HISTORY_POINTS`] ticks spanning `now - window_hours .. now`,
    /// oldest first. `None` when the symbol is untracked.
    pub fn history(&self, symbol: &str, window_hours: u32) -> Option<Vec<MarketTick>> {
        let live = self.prices.price(symbol)?;
        let now = self.clock.now();
        let floor = (live * dec!(0.5)).max(dec!(0.01));
        let step_ms = (window_hours as i64 * 3_600_000) / (HISTORY_POINTS as i64 - 1);

        let mut rng = self.rng_for(symbol);

        // Walk backwards from the live price, newest first
        let mut prices = Vec::with_capacity(HISTORY_POINTS);
        prices.push(live);
        for _ in 1..HISTORY_POINTS {
            let newest = *prices.last().unwrap_or(&live);
            let shock: f64 = (rng.r#gen::<f64>() - 0.5) * 2.0 * self.volatility;
            let delta = live * Decimal::from_f64_retain(shock).unwrap_or(Decimal::ZERO);
            prices.push((newest + delta).max(floor));
        }
        prices.reverse();

        let mut series = Vec::with_capacity(HISTORY_POINTS);
        for (i, price) in prices.iter().enumerate() {
            let age_steps = (HISTORY_POINTS - 1 - i) as i64;
            let timestamp = now - Duration::milliseconds(age_steps * step_ms);
            let previous = if i == 0 { *price } else { prices[i - 1] };
            let volume = rng.gen_range(1_000..11_000);
            series.push(MarketTick::from_previous(
                symbol, *price, previous, volume, timestamp,
            ));
        }
        Some(series)
    }

    fn rng_for(&self, symbol: &str) -> StdRng {
        match self.seed {
            Some(seed) => {
                let mut hasher = DefaultHasher::new();
                symbol.hash(&mut hasher);
                StdRng::seed_from_u64(seed ^ hasher.finish())
            }
            None => StdRng::from_entropy(),
        }
    }
}
