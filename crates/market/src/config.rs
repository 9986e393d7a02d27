use plutus_core::{Price, Symbol};
use rust_decimal_macros::dec;

/// One tracked instrument and its opening price
#[derive(Debug, Clone)]
pub struct InstrumentSeed {
    pub symbol: Symbol,
    pub price: Price,
}

impl InstrumentSeed {
    pub fn new(symbol: impl Into<Symbol>, price: Price) -> Self {
        Self {
            symbol: symbol.into(),
            price,
        }
    }
}

/// Configuration for the price simulation
#[derive(Debug, Clone)]
pub struct MarketConfig {
    /// Instruments to track, with opening prices
    pub instruments: Vec<InstrumentSeed>,
    /// Tick cadence in milliseconds
    pub tick_interval_ms: u64,
    /// Volatility fraction per tick: each tick moves the price by
    /// `price * U(-volatility, volatility)`
    pub volatility: f64,
    /// Hard floor keeping every published price strictly positive
    pub price_floor: Price,
    /// Synthetic volume range per tick (inclusive low, exclusive high)
    pub volume_range: (u64, u64),
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            instruments: vec![
                InstrumentSeed::new("AAPL", dec!(150.25)),
                InstrumentSeed::new("MSFT", dec!(330.45)),
                InstrumentSeed::new("GOOGL", dec!(2800.75)),
                InstrumentSeed::new("TSLA", dec!(250.60)),
                InstrumentSeed::new("NVDA", dec!(490.30)),
                InstrumentSeed::new("AMZN", dec!(3400.20)),
            ],
            tick_interval_ms: 1_000,
            volatility: 0.002,
            price_floor: dec!(0.01),
            volume_range: (1_000, 11_000),
        }
    }
}

impl MarketConfig {
    /// A faster, noisier cadence for engine-driven simulations
    pub fn fast() -> Self {
        Self {
            tick_interval_ms: 100,
            volatility: 0.005,
            ..Self::default()
        }
    }
}
