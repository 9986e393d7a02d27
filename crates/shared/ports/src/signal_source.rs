use async_trait::async_trait;
use plutus_core::{MarketTick, Sentiment, TradeSignal};

use crate::error::SignalError;

/// Port for the external signal-generation collaborator.
///
/// Implementations may fail with [`SignalError`]; callers that face end users
/// must substitute a locally generated result instead of surfacing the error.
#[async_trait]
pub trait SignalSource: Send + Sync {
    /// Ask for a trading signal given the recent history of a symbol
    async fn trading_signal(
        &self,
        symbol: &str,
        history: &[MarketTick],
    ) -> Result<TradeSignal, SignalError>;

    /// Classify the sentiment of a piece of text
    async fn sentiment(&self, text: &str) -> Result<Sentiment, SignalError>;
}
