use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

use plutus_core::{MarketTick, Price, Sentiment, TradeSignal};
use plutus_ports::{SignalError, SignalSource};

const DEFAULT_TIMEOUT_MS: u64 = 2_000;

#[derive(Serialize)]
struct SignalRequest<'a> {
    symbol: &'a str,
    historical_data: &'a [MarketTick],
    current_price: Option<Price>,
}

#[derive(Serialize)]
struct SentimentRequest<'a> {
    text: &'a str,
}

/// HTTP client for the upstream signal service.
///
/// Every request carries its own timeout so a hanging upstream cannot stall
/// a caller; all failure modes map onto [`SignalError`] for the service
/// layer to swallow.
pub struct HttpSignalClient {
    base_url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl HttpSignalClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn post_json<B: Serialize, R: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, SignalError> {
        let url = format!("{}{path}", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .json(body)
            .send()
            .await
            .map_err(|err| SignalError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SignalError::UpstreamStatus(status.as_u16()));
        }

        response
            .json::<R>()
            .await
            .map_err(|err| SignalError::MalformedResponse(err.to_string()))
    }
}

#[async_trait]
impl SignalSource for HttpSignalClient {
    async fn trading_signal(
        &self,
        symbol: &str,
        history: &[MarketTick],
    ) -> Result<TradeSignal, SignalError> {
        let body = SignalRequest {
            symbol,
            historical_data: history,
            current_price: history.last().map(|tick| tick.price),
        };
        self.post_json("/ai/trading-signal", &body).await
    }

    async fn sentiment(&self, text: &str) -> Result<Sentiment, SignalError> {
        self.post_json("/ai/sentiment-analysis", &SentimentRequest { text })
            .await
    }
}
