use serde::{Deserialize, Serialize};

/// Execution style of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderKind {
    /// Execute at the market price read at settlement time
    Market,
    /// Execute at the caller-specified limit price
    Limit,
}
