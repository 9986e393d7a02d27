//! Plutus Signal Boundary
//!
//! Talks to the external signal-generation service and shields the rest of
//! the platform from its failures: [`SignalService`] always answers, falling
//! back to a locally derived signal when the upstream is unreachable, slow or
//! returns garbage. The upstream never blocks the engine: the client owns
//! its own request timeout.

mod client;
mod local;
mod service;

pub use client::HttpSignalClient;
pub use local::LocalSignalGenerator;
pub use service::SignalService;
