use serde::{Deserialize, Serialize};

/// Order lifecycle status
///
/// The status is monotonic: an order leaves `Pending` exactly once and never
/// returns to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Accepted, awaiting settlement
    Pending,
    /// Settled against the ledger
    Filled,
    /// Refused at submission or at settlement
    Rejected,
    /// Withdrawn by the owner before settlement
    Cancelled,
}

impl OrderStatus {
    /// Returns true if the order is in a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Filled | OrderStatus::Rejected | OrderStatus::Cancelled
        )
    }
}
