//! Cross-component sessions against the assembled platform, driven by a
//! fixed clock and manual ticks instead of the background loops.

use chrono::Duration;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

use plutus_bus::{Topic, TopicSubscription};
use plutus_clock::SimulationClock;
use plutus_core::{OrderRequest, OrderStatus, PlatformEvent, Side, SignalKind};
use plutus_ports::PriceSource;
use plutus_runner::{BootstrapConfig, Platform};

fn fixed_platform() -> (Platform, SimulationClock) {
    let clock = SimulationClock::fixed();
    let platform = Platform::build(BootstrapConfig::default(), Arc::new(clock.clone()));
    (platform, clock)
}

#[tokio::test]
async fn ticks_reach_price_subscribers() {
    let (platform, _clock) = fixed_platform();
    let mut prices = TopicSubscription::new(&platform.bus, Topic::price("AAPL"));

    platform.simulator.tick();
    platform.simulator.tick();

    for _ in 0..2 {
        match prices.recv().await {
            Some(PlatformEvent::Market(tick)) => {
                assert_eq!(tick.symbol, "AAPL");
                assert!(tick.price > Decimal::ZERO);
            }
            other => panic!("expected market tick, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn an_order_settles_at_the_price_of_its_settlement_tick() {
    let (platform, clock) = fixed_platform();
    let mut portfolios = TopicSubscription::new(&platform.bus, Topic::portfolios());

    let order = platform
        .engine
        .submit("demo-user", OrderRequest::market("AAPL", Side::Buy, 2))
        .unwrap();
    assert_eq!(order.status, OrderStatus::Pending);

    // The market moves while the order is in flight
    platform.simulator.tick();
    let price_at_settlement = platform.simulator.price("AAPL").unwrap();

    clock.advance(Duration::milliseconds(60));
    assert_eq!(platform.engine.settle_due(), 1);

    let settled = platform.engine.order(order.id).unwrap();
    assert_eq!(settled.status, OrderStatus::Filled);
    assert_eq!(settled.execution_price, Some(price_at_settlement));

    let snapshot = match portfolios.recv().await {
        Some(PlatformEvent::Portfolio(snapshot)) => snapshot,
        other => panic!("expected portfolio snapshot, got {other:?}"),
    };
    assert_eq!(snapshot.user_id, "demo-user");
    assert_eq!(snapshot.quantity("AAPL"), 12); // seeded 10 + bought 2
    assert_eq!(
        snapshot.cash,
        dec!(100000) - price_at_settlement * dec!(2)
    );
}

#[test]
fn history_is_anchored_to_the_live_price() {
    let (platform, _clock) = fixed_platform();
    platform.simulator.tick();

    let series = platform.history.history("AAPL", 24).unwrap();
    assert_eq!(series.len(), plutus_market::HISTORY_POINTS);
    assert_eq!(
        series.last().unwrap().price,
        platform.simulator.price("AAPL").unwrap()
    );
    assert_eq!(series[0].change, dec!(0));
}

#[tokio::test]
async fn room_activity_flows_to_room_subscribers() {
    let (platform, _clock) = fixed_platform();
    let mut room_events = TopicSubscription::new(&platform.bus, Topic::room("room-1"));

    platform.rooms.join("room-1", "alice").unwrap();
    platform
        .rooms
        .post_message("room-1", "alice", "first")
        .unwrap();
    platform
        .rooms
        .post_message("room-1", "alice", "second")
        .unwrap();
    platform
        .rooms
        .post_message("room-1", "alice", "third")
        .unwrap();

    // Join event first, then the messages in posting order
    assert!(matches!(
        room_events.recv().await,
        Some(PlatformEvent::Room(plutus_core::RoomEvent::Joined { .. }))
    ));
    for expected in ["first", "second", "third"] {
        match room_events.recv().await {
            Some(PlatformEvent::Room(plutus_core::RoomEvent::Message(message))) => {
                assert_eq!(message.text, expected);
            }
            other => panic!("expected message event, got {other:?}"),
        }
    }

    let recent = platform.rooms.recent_messages("room-1", 2);
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].text, "second");
    assert_eq!(recent[1].text, "third");
}

#[tokio::test]
async fn signals_always_answer_without_an_upstream() {
    let (platform, _clock) = fixed_platform();
    platform.simulator.tick();

    let series = platform.history.history("AAPL", 24).unwrap();
    let signal = platform.signals.trading_signal("AAPL", &series).await;

    assert!(matches!(
        signal.signal,
        SignalKind::Buy | SignalKind::Sell | SignalKind::Hold
    ));
    assert!((0.0..=1.0).contains(&signal.confidence));
    assert!(!signal.reasoning.is_empty());
}

#[test]
fn seeded_accounts_valuate_against_live_prices() {
    let (platform, _clock) = fixed_platform();

    let snapshot = platform
        .ledger
        .valuate("demo-user", platform.simulator.as_ref())
        .unwrap();
    assert_eq!(snapshot.cash, dec!(100000));
    assert_eq!(snapshot.quantity("AAPL"), 10);
    assert_eq!(snapshot.quantity("MSFT"), 5);

    let aapl = platform.simulator.price("AAPL").unwrap();
    let msft = platform.simulator.price("MSFT").unwrap();
    assert_eq!(
        snapshot.total_value,
        dec!(100000) + aapl * dec!(10) + msft * dec!(5)
    );
}

#[test]
fn a_session_owns_its_subscriptions() {
    let (platform, _clock) = fixed_platform();
    let topic = Topic::price("AAPL");

    {
        let _session_sub = TopicSubscription::new(&platform.bus, topic.clone());
        assert_eq!(platform.bus.listener_count(&topic), 1);
        // Session ends here; its handle is released with it
    }
    assert_eq!(platform.bus.listener_count(&topic), 0);
}
