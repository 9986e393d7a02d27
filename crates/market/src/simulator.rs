use parking_lot::{Mutex, RwLock};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use plutus_bus::{EventBus, Topic};
use plutus_core::{MarketTick, PlatformEvent, Price, Symbol};
use plutus_ports::{Clock, PriceSource};

use crate::config::MarketConfig;

/// Advances a synthetic price for every tracked instrument.
///
/// The tick loop is the sole writer of the price table; readers go through
/// [`PriceSource`] and never block a tick for longer than the table update
/// itself. Every advance publishes one [`MarketTick`] per symbol on
/// `price:<symbol>`.
pub struct PriceSimulator {
    prices: RwLock<HashMap<Symbol, Price>>,
    rng: Mutex<StdRng>,
    config: MarketConfig,
    bus: Arc<EventBus<PlatformEvent>>,
    clock: Arc<dyn Clock>,
}

impl PriceSimulator {
    pub fn new(
        config: MarketConfig,
        bus: Arc<EventBus<PlatformEvent>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self::with_rng(config, bus, clock, StdRng::from_entropy())
    }

    /// Create with a specific seed for reproducible simulations
    pub fn with_seed(
        config: MarketConfig,
        bus: Arc<EventBus<PlatformEvent>>,
        clock: Arc<dyn Clock>,
        seed: u64,
    ) -> Self {
        Self::with_rng(config, bus, clock, StdRng::seed_from_u64(seed))
    }

    fn with_rng(
        config: MarketConfig,
        bus: Arc<EventBus<PlatformEvent>>,
        clock: Arc<dyn Clock>,
        rng: StdRng,
    ) -> Self {
        let prices = config
            .instruments
            .iter()
            .map(|seed| (seed.symbol.clone(), seed.price))
            .collect();
        Self {
            prices: RwLock::new(prices),
            rng: Mutex::new(rng),
            config,
            bus,
            clock,
        }
    }

    /// Advance every tracked symbol once and publish the resulting ticks.
    ///
    /// `new = max(floor, p + p * U(-k, k))` with `k` the configured
    /// volatility fraction; the floor keeps every published price positive.
    pub fn tick(&self) {
        let now = self.clock.now();
        let mut ticks = Vec::with_capacity(self.config.instruments.len());

        {
            let mut table = self.prices.write();
            let mut rng = self.rng.lock();
            for (symbol, price) in table.iter_mut() {
                let noise: f64 = rng.gen_range(-1.0..=1.0) * self.config.volatility;
                let multiplier =
                    Decimal::ONE + Decimal::from_f64_retain(noise).unwrap_or(Decimal::ZERO);
                let previous = *price;
                let next = (previous * multiplier).max(self.config.price_floor);
                *price = next;

                let volume = rng.gen_range(self.config.volume_range.0..self.config.volume_range.1);
                ticks.push(MarketTick::from_previous(
                    symbol.clone(),
                    next,
                    previous,
                    volume,
                    now,
                ));
            }
        }

        for tick in ticks {
            let topic = Topic::price(&tick.symbol);
            debug!(symbol = %tick.symbol, price = %tick.price, "tick");
            self.bus.publish(&topic, &PlatformEvent::Market(tick));
        }
    }

    /// Run the tick loop for the lifetime of the process
    pub async fn run(self: Arc<Self>) {
        info!(
            interval_ms = self.config.tick_interval_ms,
            instruments = self.config.instruments.len(),
            "starting price simulation"
        );
        let mut interval =
            tokio::time::interval(std::time::Duration::from_millis(self.config.tick_interval_ms));
        loop {
            interval.tick().await;
            self.tick();
        }
    }

    /// Spawn the tick loop on the runtime
    pub fn spawn(self: &Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(Arc::clone(self).run())
    }
}

impl PriceSource for PriceSimulator {
    fn price(&self, symbol: &str) -> Option<Price> {
        self.prices.read().get(symbol).copied()
    }

    fn symbols(&self) -> Vec<Symbol> {
        self.prices.read().keys().cloned().collect()
    }
}
