use chrono::{Duration, Utc};
use parking_lot::RwLock;
use plutus_core::Timestamp;
use plutus_ports::Clock;
use std::sync::Arc;

/// Controllable clock for simulation and testing.
///
/// In real-time mode it tracks wall time from a reference point; in fixed
/// mode time stands still until [`advance`](SimulationClock::advance) or
/// [`set_time`](SimulationClock::set_time) moves it. Clones share state, so a
/// test can hold one handle while the component under test holds another.
#[derive(Debug)]
pub struct SimulationClock {
    inner: Arc<RwLock<ClockState>>,
}

#[derive(Debug)]
struct ClockState {
    /// The reference point in simulated time
    simulated_time: Timestamp,
    /// Wall time when the reference point was taken
    wall_reference: Timestamp,
    /// Whether time flows on its own
    frozen: bool,
}

impl SimulationClock {
    /// Real-time clock starting at the current wall time
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            inner: Arc::new(RwLock::new(ClockState {
                simulated_time: now,
                wall_reference: now,
                frozen: false,
            })),
        }
    }

    /// Frozen clock at the current wall time
    pub fn fixed() -> Self {
        let clock = Self::new();
        clock.inner.write().frozen = true;
        clock
    }

    /// Frozen clock at a specific instant
    pub fn at(time: Timestamp) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ClockState {
                simulated_time: time,
                wall_reference: Utc::now(),
                frozen: true,
            })),
        }
    }

    /// Move simulated time forward
    pub fn advance(&self, duration: Duration) {
        let mut state = self.inner.write();
        state.simulated_time += duration;
        state.wall_reference = Utc::now();
    }

    /// Jump to an absolute instant
    pub fn set_time(&self, time: Timestamp) {
        let mut state = self.inner.write();
        state.simulated_time = time;
        state.wall_reference = Utc::now();
    }
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for SimulationClock {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Clock for SimulationClock {
    fn now(&self) -> Timestamp {
        let state = self.inner.read();
        if state.frozen {
            state.simulated_time
        } else {
            state.simulated_time + (Utc::now() - state.wall_reference)
        }
    }

    fn name(&self) -> &str {
        "SimulationClock"
    }
}
