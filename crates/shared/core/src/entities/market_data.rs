use serde::{Deserialize, Serialize};

use crate::values::{Price, Symbol, Timestamp};

/// One observation of a simulated instrument price.
///
/// Ticks are immutable once emitted: every advance of the simulation produces
/// a new value, past observations are never edited. The same shape is used
/// for live ticks and for points of a historical series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketTick {
    pub symbol: Symbol,
    pub price: Price,
    pub timestamp: Timestamp,
    pub volume: u64,
    /// Absolute move relative to the previous observation
    pub change: Price,
    /// Relative move in percent relative to the previous observation
    pub change_percent: Price,
}

impl MarketTick {
    /// Build a tick from the previous price, deriving both delta fields
    pub fn from_previous(
        symbol: impl Into<Symbol>,
        price: Price,
        previous: Price,
        volume: u64,
        timestamp: Timestamp,
    ) -> Self {
        let change = price - previous;
        let change_percent = if previous.is_zero() {
            Price::ZERO
        } else {
            change / previous * Price::from(100)
        };
        Self {
            symbol: symbol.into(),
            price,
            timestamp,
            volume,
            change,
            change_percent,
        }
    }
}
