use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use plutus_core::{MarketTick, Sentiment, SignalKind, Timestamp, TradeSignal};

/// Threshold move (in percent over the supplied window) that separates a
/// directional call from Hold
const MOMENTUM_THRESHOLD_PCT: f64 = 1.0;

/// Derives a substitute signal from the supplied history when the upstream
/// service is unavailable.
///
/// Pure momentum heuristic: the move of the window decides direction, its
/// magnitude scales confidence. Deterministic for a given history, so the
/// fallback path is fully testable.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalSignalGenerator;

impl LocalSignalGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn signal(&self, symbol: &str, history: &[MarketTick], now: Timestamp) -> TradeSignal {
        let (first, last) = match (history.first(), history.last()) {
            (Some(first), Some(last)) if first.price > Decimal::ZERO => (first, last),
            _ => {
                return TradeSignal {
                    signal: SignalKind::Hold,
                    confidence: 0.5,
                    reasoning: format!(
                        "No usable history for {symbol}; holding until data arrives"
                    ),
                    timestamp: now,
                };
            }
        };

        let move_pct = ((last.price - first.price) / first.price * Decimal::from(100))
            .to_f64()
            .unwrap_or(0.0);

        let signal = if move_pct > MOMENTUM_THRESHOLD_PCT {
            SignalKind::Buy
        } else if move_pct < -MOMENTUM_THRESHOLD_PCT {
            SignalKind::Sell
        } else {
            SignalKind::Hold
        };

        // Larger moves read as stronger conviction, capped well below 1.0
        let confidence = (0.5 + move_pct.abs() / 20.0).min(0.95);

        TradeSignal {
            signal,
            confidence,
            reasoning: format!(
                "Momentum analysis for {symbol}: {move_pct:.2}% over the window"
            ),
            timestamp: now,
        }
    }

    pub fn sentiment(&self, _text: &str) -> Sentiment {
        Sentiment::neutral()
    }
}
