//! Platform assembly and seed data.
//!
//! Creates the bus, clock, simulator, ledger, engine, rooms and signal
//! service as one dependency-injected bundle, seeds demo accounts and rooms,
//! and exposes spawn helpers for the two background loops (price ticks and
//! settlement polling).

use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

use plutus_bus::EventBus;
use plutus_clock::SystemClock;
use plutus_core::{PlatformEvent, Price, Quantity, Symbol};
use plutus_engine::{EngineConfig, Ledger, OrderEngine};
use plutus_market::{HistoryGenerator, MarketConfig, PriceSimulator};
use plutus_ports::{Clock, PriceSource};
use plutus_rooms::RoomService;
use plutus_signal::{HttpSignalClient, SignalService};
use rust_decimal_macros::dec;

/// One pre-funded account installed at startup
#[derive(Debug, Clone)]
pub struct SeedAccount {
    pub user_id: String,
    pub cash: Price,
    /// (symbol, quantity, entry price)
    pub positions: Vec<(Symbol, Quantity, Price)>,
}

/// Everything the composition root needs to know
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    pub market: MarketConfig,
    pub engine: EngineConfig,
    /// Balance seeded on first ledger access
    pub starting_cash: Price,
    /// Accounts installed before the first order
    pub seed_accounts: Vec<SeedAccount>,
    /// Rooms available at startup, as (id, name)
    pub seed_rooms: Vec<(String, String)>,
    /// Upstream signal endpoint; local fallback only when absent
    pub signal_url: Option<String>,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            market: MarketConfig::default(),
            engine: EngineConfig::default(),
            starting_cash: dec!(100000),
            seed_accounts: vec![SeedAccount {
                user_id: "demo-user".to_string(),
                cash: dec!(100000),
                positions: vec![
                    ("AAPL".to_string(), 10, dec!(150.25)),
                    ("MSFT".to_string(), 5, dec!(330.45)),
                ],
            }],
            seed_rooms: vec![("room-1".to_string(), "General Trading".to_string())],
            signal_url: None,
        }
    }
}

/// The assembled platform, ready to serve callers and spawn its loops
pub struct Platform {
    pub clock: Arc<dyn Clock>,
    pub bus: Arc<EventBus<PlatformEvent>>,
    pub simulator: Arc<PriceSimulator>,
    pub history: Arc<HistoryGenerator>,
    pub ledger: Arc<Ledger>,
    pub engine: Arc<OrderEngine>,
    pub rooms: Arc<RoomService>,
    pub signals: Arc<SignalService>,
}

impl Platform {
    /// Assemble with the default configuration and the system clock
    pub fn new() -> Self {
        Self::build(BootstrapConfig::default(), Arc::new(SystemClock::new()))
    }

    /// Assemble from explicit configuration and clock (tests inject a
    /// controllable clock here)
    pub fn build(config: BootstrapConfig, clock: Arc<dyn Clock>) -> Self {
        let bus = Arc::new(EventBus::new());

        let simulator = Arc::new(PriceSimulator::new(
            config.market.clone(),
            Arc::clone(&bus),
            Arc::clone(&clock),
        ));
        let prices: Arc<dyn PriceSource> = Arc::clone(&simulator) as Arc<dyn PriceSource>;

        let history = Arc::new(HistoryGenerator::new(
            Arc::clone(&prices),
            Arc::clone(&clock),
        ));

        let ledger = Arc::new(Ledger::new(config.starting_cash, Arc::clone(&clock)));
        for account in &config.seed_accounts {
            ledger.seed(&account.user_id, account.cash, &account.positions);
        }

        let engine = Arc::new(OrderEngine::new(
            config.engine.clone(),
            Arc::clone(&ledger),
            Arc::clone(&prices),
            Arc::clone(&bus),
            Arc::clone(&clock),
        ));

        let rooms = Arc::new(RoomService::new(Arc::clone(&bus), Arc::clone(&clock)));
        for (id, name) in &config.seed_rooms {
            if let Err(err) = rooms.create_room_with_id(id, name) {
                info!(room_id = id, error = %err, "seed room skipped");
            }
        }

        let signals = Arc::new(match &config.signal_url {
            Some(url) => {
                SignalService::new(HttpSignalClient::new(url.clone()), Arc::clone(&clock))
            }
            None => SignalService::local_only(Arc::clone(&clock)),
        });

        info!(
            instruments = config.market.instruments.len(),
            rooms = config.seed_rooms.len(),
            accounts = config.seed_accounts.len(),
            "platform assembled"
        );

        Self {
            clock,
            bus,
            simulator,
            history,
            ledger,
            engine,
            rooms,
            signals,
        }
    }

    /// Spawn the tick loop and the settlement poller
    pub fn spawn_background(&self) -> Vec<JoinHandle<()>> {
        vec![self.simulator.spawn(), self.engine.spawn()]
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::new()
    }
}
