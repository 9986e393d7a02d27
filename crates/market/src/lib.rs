//! Plutus Market Data
//!
//! Synthetic market data for the simulation platform:
//!
//! - [`PriceSimulator`] advances every tracked instrument on a fixed tick
//!   with a bounded random walk and publishes one tick per symbol per
//!   advance.
//! - [`HistoryGenerator`] derives a bounded look-back series from the live
//!   price, for chart seeding and historical queries.

mod config;
mod history;
mod simulator;

pub use config::{InstrumentSeed, MarketConfig};
pub use history::{DEFAULT_WINDOW_HOURS, HISTORY_POINTS, HistoryGenerator};
pub use simulator::PriceSimulator;
