use std::sync::Arc;
use tracing::warn;

use plutus_core::{MarketTick, Sentiment, TradeSignal};
use plutus_ports::{Clock, SignalSource};

use crate::client::HttpSignalClient;
use crate::local::LocalSignalGenerator;

/// Front door for signal queries: tries the upstream, always answers.
///
/// An upstream failure is logged and substituted with the local generator;
/// callers never see the error, matching the platform rule that the signal
/// collaborator is best-effort.
pub struct SignalService {
    upstream: Option<HttpSignalClient>,
    fallback: LocalSignalGenerator,
    clock: Arc<dyn Clock>,
}

impl SignalService {
    /// Service backed by an upstream endpoint
    pub fn new(upstream: HttpSignalClient, clock: Arc<dyn Clock>) -> Self {
        Self {
            upstream: Some(upstream),
            fallback: LocalSignalGenerator::new(),
            clock,
        }
    }

    /// Service running purely on the local generator
    pub fn local_only(clock: Arc<dyn Clock>) -> Self {
        Self {
            upstream: None,
            fallback: LocalSignalGenerator::new(),
            clock,
        }
    }

    pub async fn trading_signal(&self, symbol: &str, history: &[MarketTick]) -> TradeSignal {
        if let Some(upstream) = &self.upstream {
            match upstream.trading_signal(symbol, history).await {
                Ok(signal) => return signal,
                Err(err) => {
                    warn!(symbol, error = %err, "signal upstream unavailable, using fallback");
                }
            }
        }
        self.fallback.signal(symbol, history, self.clock.now())
    }

    pub async fn sentiment(&self, text: &str) -> Sentiment {
        if let Some(upstream) = &self.upstream {
            match upstream.sentiment(text).await {
                Ok(sentiment) => return sentiment,
                Err(err) => {
                    warn!(error = %err, "sentiment upstream unavailable, using fallback");
                }
            }
        }
        self.fallback.sentiment(text)
    }
}
