use serde::{Deserialize, Serialize};

use crate::values::Timestamp;

/// Direction advised by the signal collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalKind {
    Buy,
    Sell,
    Hold,
}

/// A trading signal, whether produced upstream or by the local fallback
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeSignal {
    pub signal: SignalKind,
    /// Confidence in 0..1
    pub confidence: f64,
    pub reasoning: String,
    pub timestamp: Timestamp,
}

/// Sentiment classification of a piece of text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sentiment {
    pub label: SentimentLabel,
    /// Score in 0..1
    pub score: f64,
}

impl Sentiment {
    /// The fallback used when the upstream analyzer is unreachable
    pub fn neutral() -> Self {
        Self {
            label: SentimentLabel::Neutral,
            score: 0.5,
        }
    }
}
