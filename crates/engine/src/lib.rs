//! Plutus Order Engine
//!
//! Accepts orders against live prices, settles them after a simulated
//! latency against the per-user [`Ledger`], and publishes every lifecycle
//! transition on the event bus. Settlement timing runs through the
//! [`SettlementScheduler`], so tests drive it with a controllable clock
//! instead of real sleeps.

mod engine;
mod error;
mod ledger;
mod scheduler;

pub use engine::{EngineConfig, OrderEngine};
pub use error::{EngineError, LedgerError, Result};
pub use ledger::Ledger;
pub use scheduler::SettlementScheduler;
