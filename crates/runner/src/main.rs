use plutus_bus::{Topic, TopicSubscription};
use plutus_core::{OrderRequest, PlatformEvent, Side};
use plutus_runner::{BootstrapConfig, Platform};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "plutus=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = BootstrapConfig {
        signal_url: std::env::var("SIGNAL_URL").ok(),
        ..BootstrapConfig::default()
    };
    let platform = Platform::build(config, Arc::new(plutus_clock::SystemClock::new()));
    let _background = platform.spawn_background();

    tracing::info!("plutus running; streaming AAPL and the demo portfolio (ctrl-c to stop)");

    // What a transport session would do: subscribe, act, consume events
    let mut prices = TopicSubscription::new(&platform.bus, Topic::price("AAPL"));
    let mut portfolios = TopicSubscription::new(&platform.bus, Topic::portfolios());

    platform.rooms.join("room-1", "demo-user")?;
    platform
        .rooms
        .post_message("room-1", "demo-user", "watching AAPL today")?;

    let order = platform
        .engine
        .submit("demo-user", OrderRequest::market("AAPL", Side::Buy, 2))?;
    tracing::info!(order_id = %order.id, status = ?order.status, "demo order submitted");

    if let Some(series) = platform.history.history("AAPL", plutus_market::DEFAULT_WINDOW_HOURS) {
        let signal = platform.signals.trading_signal("AAPL", &series).await;
        tracing::info!(
            signal = ?signal.signal,
            confidence = signal.confidence,
            "signal: {}",
            signal.reasoning
        );
    }

    loop {
        tokio::select! {
            Some(event) = prices.recv() => {
                if let PlatformEvent::Market(tick) = event {
                    tracing::info!(
                        symbol = %tick.symbol,
                        price = %tick.price,
                        change_pct = %tick.change_percent,
                        "tick"
                    );
                }
            }
            Some(event) = portfolios.recv() => {
                if let PlatformEvent::Portfolio(snapshot) = event {
                    tracing::info!(
                        user = %snapshot.user_id,
                        cash = %snapshot.cash,
                        total = %snapshot.total_value,
                        "portfolio updated"
                    );
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutting down");
                break;
            }
        }
    }

    Ok(())
}
