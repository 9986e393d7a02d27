use plutus_core::Timestamp;

/// Port for time abstraction
///
/// Lets the system run against different time sources:
/// - Real system time in production
/// - A controllable clock for deterministic tests
pub trait Clock: Send + Sync {
    /// Get the current time according to this clock
    fn now(&self) -> Timestamp;

    /// Get the clock's name/identifier for debugging
    fn name(&self) -> &str {
        "Clock"
    }
}
