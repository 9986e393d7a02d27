//! Plutus Runner
//!
//! Builds the platform out of explicitly constructed, injected components
//! and owns the background loops. Nothing in the lower crates reaches for a
//! global: everything shared is created here and handed down.

mod bootstrap;

pub use bootstrap::{BootstrapConfig, Platform, SeedAccount};
