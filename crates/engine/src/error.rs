use plutus_core::{OrderId, Price, Quantity, Symbol, UserId};
use thiserror::Error;

/// Business-rule failures raised by the ledger when applying a settlement
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: Price, available: Price },

    #[error("insufficient position in {symbol}: requested {requested}, held {held}")]
    InsufficientPosition {
        symbol: Symbol,
        requested: Quantity,
        held: Quantity,
    },
}

#[derive(Error, Debug)]
pub enum EngineError {
    /// Malformed request, rejected before any state is touched
    #[error("invalid order: {0}")]
    InvalidOrder(String),

    #[error("symbol not found: {0}")]
    SymbolNotFound(Symbol),

    #[error("user not found: {0}")]
    UserNotFound(UserId),

    #[error("order not found: {0}")]
    OrderNotFound(OrderId),

    #[error("order {0} cannot be cancelled")]
    NotCancellable(OrderId),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

pub type Result<T> = std::result::Result<T, EngineError>;
