use plutus_core::{Price, Symbol};

/// Port for reading live instrument prices.
///
/// The simulator is the production implementation; tests supply a fixed map.
/// Valuation and settlement take this seam instead of the simulator itself.
pub trait PriceSource: Send + Sync {
    /// Latest known price for a symbol, `None` when the symbol is untracked
    fn price(&self, symbol: &str) -> Option<Price>;

    /// Symbols this source currently tracks
    fn symbols(&self) -> Vec<Symbol>;
}
