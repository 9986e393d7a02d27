use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::values::{Price, Quantity, Symbol, Timestamp, UserId};

/// Valuation snapshot of one user's holdings.
///
/// Produced by the ledger: `cash` and `positions` mirror the stored account,
/// `total_value` and `unrealized_pnl` are derived against a price lookup at
/// snapshot time. The positions map never carries zero or negative entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Portfolio {
    pub user_id: UserId,
    pub cash: Price,
    pub positions: HashMap<Symbol, Quantity>,
    pub total_value: Price,
    pub unrealized_pnl: Price,
    pub timestamp: Timestamp,
}

impl Portfolio {
    /// Quantity held for a symbol (zero when absent)
    pub fn quantity(&self, symbol: &str) -> Quantity {
        self.positions.get(symbol).copied().unwrap_or(0)
    }
}
