//! Plutus Ports
//!
//! Trait seams between the domain and its infrastructure. Components depend
//! on these abstractions, never on each other's concrete types, so every
//! collaborator can be swapped for a test double.

mod clock;
mod error;
mod price_source;
mod signal_source;

pub use clock::Clock;
pub use error::SignalError;
pub use price_source::PriceSource;
pub use signal_source::SignalSource;
