//! End-to-end order lifecycle: submission, deferred settlement, slippage,
//! rejection policy and cancellation, driven by a fixed clock.

use chrono::Duration;
use parking_lot::{Mutex, RwLock};
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::Arc;

use plutus_bus::{EventBus, Topic};
use plutus_clock::SimulationClock;
use plutus_core::{
    OrderEvent, OrderRequest, OrderStatus, PlatformEvent, Price, RejectReason, Side, Symbol,
};
use plutus_engine::{EngineConfig, Ledger, OrderEngine};
use plutus_ports::PriceSource;

/// Price table the test can move between submission and settlement
struct MovablePrices(RwLock<HashMap<Symbol, Price>>);

impl MovablePrices {
    fn of(pairs: &[(&str, Price)]) -> Arc<Self> {
        Arc::new(Self(RwLock::new(
            pairs.iter().map(|(s, p)| (s.to_string(), *p)).collect(),
        )))
    }

    fn set(&self, symbol: &str, price: Price) {
        self.0.write().insert(symbol.to_string(), price);
    }
}

impl PriceSource for MovablePrices {
    fn price(&self, symbol: &str) -> Option<Price> {
        self.0.read().get(symbol).copied()
    }

    fn symbols(&self) -> Vec<Symbol> {
        self.0.read().keys().cloned().collect()
    }
}

struct Harness {
    engine: Arc<OrderEngine>,
    ledger: Arc<Ledger>,
    prices: Arc<MovablePrices>,
    clock: SimulationClock,
    bus: Arc<EventBus<PlatformEvent>>,
}

fn harness(starting_cash: Price) -> Harness {
    let clock = SimulationClock::fixed();
    let bus = Arc::new(EventBus::new());
    let prices = MovablePrices::of(&[("AAPL", dec!(150)), ("MSFT", dec!(330))]);
    let ledger = Arc::new(Ledger::new(
        starting_cash,
        Arc::new(clock.clone()) as Arc<dyn plutus_ports::Clock>,
    ));
    let engine = Arc::new(OrderEngine::new(
        EngineConfig::default(),
        Arc::clone(&ledger),
        Arc::clone(&prices) as Arc<dyn PriceSource>,
        Arc::clone(&bus),
        Arc::new(clock.clone()) as Arc<dyn plutus_ports::Clock>,
    ));
    Harness {
        engine,
        ledger,
        prices,
        clock,
        bus,
    }
}

fn record_order_events(
    h: &Harness,
    user: &str,
) -> (Arc<Mutex<Vec<OrderEvent>>>, plutus_bus::SubscriptionHandle) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let handle = h
        .bus
        .subscribe(Topic::orders(user), move |event: &PlatformEvent| {
            if let PlatformEvent::Order(order_event) = event {
                sink.lock().push(order_event.clone());
            }
        });
    (seen, handle)
}

/// Settle everything by pushing the clock past the configured latency
fn run_settlement(h: &Harness) {
    h.clock.advance(Duration::milliseconds(60));
    h.engine.settle_due();
}

#[test]
fn market_buy_settles_at_the_settlement_time_price() {
    let h = harness(dec!(100000));
    let order = h
        .engine
        .submit("user-1", OrderRequest::market("AAPL", Side::Buy, 1))
        .unwrap();
    assert_eq!(order.status, OrderStatus::Pending);

    // Price moves before the settlement fires: slippage must apply
    h.prices.set("AAPL", dec!(152));
    run_settlement(&h);

    let settled = h.engine.order(order.id).unwrap();
    assert_eq!(settled.status, OrderStatus::Filled);
    assert_eq!(settled.execution_price, Some(dec!(152)));
    assert_eq!(
        h.ledger.portfolio("user-1").unwrap().cash,
        dec!(100000) - dec!(152)
    );
}

#[test]
fn limit_buy_settles_at_the_limit_price() {
    let h = harness(dec!(100000));
    // Market is 145, the limit states 150: the fill uses the limit price
    h.prices.set("AAPL", dec!(145));
    let order = h
        .engine
        .submit("user-1", OrderRequest::limit("AAPL", Side::Buy, 5, dec!(150)))
        .unwrap();

    run_settlement(&h);

    let settled = h.engine.order(order.id).unwrap();
    assert_eq!(settled.execution_price, Some(dec!(150)));
    let portfolio = h.ledger.portfolio("user-1").unwrap();
    assert_eq!(portfolio.cash, dec!(100000) - dec!(750));
    assert_eq!(portfolio.quantity("AAPL"), 5);
}

#[test]
fn insufficient_funds_yields_a_rejected_record_and_leaves_cash_alone() {
    let h = harness(dec!(100));
    h.prices.set("AAPL", dec!(50));
    let (events, _sub) = record_order_events(&h, "user-1");

    let order = h
        .engine
        .submit("user-1", OrderRequest::market("AAPL", Side::Buy, 10))
        .unwrap();

    assert_eq!(order.status, OrderStatus::Rejected);
    assert_eq!(h.ledger.portfolio("user-1").unwrap().cash, dec!(100));

    let events = events.lock();
    assert_eq!(events.len(), 1);
    match &events[0] {
        OrderEvent::Rejected(rejected) => {
            assert_eq!(rejected.reason, RejectReason::InsufficientFunds);
        }
        other => panic!("expected rejection, got {other:?}"),
    }

    // Nothing left to settle
    run_settlement(&h);
    assert_eq!(
        h.engine.order(order.id).unwrap().status,
        OrderStatus::Rejected
    );
}

#[test]
fn selling_more_than_held_is_rejected_at_submission() {
    let h = harness(dec!(1000));
    let order = h
        .engine
        .submit("user-1", OrderRequest::market("AAPL", Side::Sell, 3))
        .unwrap();
    assert_eq!(order.status, OrderStatus::Rejected);
}

#[test]
fn malformed_requests_fail_without_creating_a_record() {
    let h = harness(dec!(1000));

    let err = h
        .engine
        .submit("user-1", OrderRequest::market("AAPL", Side::Buy, 0))
        .unwrap_err();
    assert!(matches!(err, plutus_engine::EngineError::InvalidOrder(_)));

    let mut request = OrderRequest::limit("AAPL", Side::Buy, 1, dec!(150));
    request.limit_price = None;
    assert!(h.engine.submit("user-1", request).is_err());

    let err = h
        .engine
        .submit("user-1", OrderRequest::market("DOGE", Side::Buy, 1))
        .unwrap_err();
    assert!(matches!(err, plutus_engine::EngineError::SymbolNotFound(_)));

    assert!(h.engine.orders("user-1").is_empty());
}

#[test]
fn accepted_precedes_filled_on_the_user_topic() {
    let h = harness(dec!(100000));
    let (events, _sub) = record_order_events(&h, "user-1");

    h.engine
        .submit("user-1", OrderRequest::market("AAPL", Side::Buy, 2))
        .unwrap();
    run_settlement(&h);

    let events = events.lock();
    assert_eq!(events.len(), 2);
    assert!(matches!(events[0], OrderEvent::Accepted(_)));
    assert!(matches!(events[1], OrderEvent::Filled(_)));
}

#[test]
fn settlement_publishes_a_portfolio_snapshot() {
    let h = harness(dec!(100000));
    let snapshots = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&snapshots);
    let _handle = h
        .bus
        .subscribe(Topic::portfolios(), move |event: &PlatformEvent| {
            if let PlatformEvent::Portfolio(snapshot) = event {
                sink.lock().push(snapshot.clone());
            }
        });

    h.engine
        .submit("user-1", OrderRequest::market("AAPL", Side::Buy, 2))
        .unwrap();
    run_settlement(&h);

    let snapshots = snapshots.lock();
    assert_eq!(snapshots.len(), 1);
    assert_eq!(snapshots[0].user_id, "user-1");
    assert_eq!(snapshots[0].quantity("AAPL"), 2);
    assert_eq!(snapshots[0].cash, dec!(100000) - dec!(300));
}

#[test]
fn duplicate_settlement_applies_the_delta_once() {
    let h = harness(dec!(100000));
    let order = h
        .engine
        .submit("user-1", OrderRequest::market("AAPL", Side::Buy, 1))
        .unwrap();
    run_settlement(&h);

    let cash_after_fill = h.ledger.portfolio("user-1").unwrap().cash;
    // Simulate a duplicate timer fire
    h.engine.settle(order.id);
    h.engine.settle(order.id);

    assert_eq!(h.ledger.portfolio("user-1").unwrap().cash, cash_after_fill);
}

#[test]
fn settlement_race_resolves_to_rejected_not_silence() {
    let h = harness(dec!(200));
    let (events, _sub) = record_order_events(&h, "user-1");

    // Passes the submission-time check (cost 150 <= 200)...
    let order = h
        .engine
        .submit("user-1", OrderRequest::market("AAPL", Side::Buy, 1))
        .unwrap();
    assert_eq!(order.status, OrderStatus::Pending);

    // ...but the funds are gone by the time the settlement fires
    h.ledger
        .apply_settlement("user-1", "MSFT", Side::Buy, 1, dec!(180))
        .unwrap();
    run_settlement(&h);

    let settled = h.engine.order(order.id).unwrap();
    assert_eq!(settled.status, OrderStatus::Rejected);
    let events = events.lock();
    assert!(matches!(
        events.last(),
        Some(OrderEvent::Rejected(rejected))
            if rejected.reason == RejectReason::InsufficientFunds
    ));
}

#[test]
fn full_position_sell_removes_the_entry() {
    let h = harness(dec!(0));
    h.ledger
        .seed("user-1", dec!(0), &[("AAPL".to_string(), 7, dec!(100))]);

    h.engine
        .submit("user-1", OrderRequest::market("AAPL", Side::Sell, 7))
        .unwrap();
    run_settlement(&h);

    let portfolio = h.ledger.portfolio("user-1").unwrap();
    assert!(!portfolio.positions.contains_key("AAPL"));
    assert_eq!(portfolio.cash, dec!(1050));
}

#[test]
fn cancelled_order_never_reaches_the_ledger() {
    let h = harness(dec!(100000));
    let (events, _sub) = record_order_events(&h, "user-1");

    let order = h
        .engine
        .submit("user-1", OrderRequest::market("AAPL", Side::Buy, 1))
        .unwrap();
    let cancelled = h.engine.cancel("user-1", order.id).unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);

    run_settlement(&h);

    assert_eq!(h.ledger.portfolio("user-1").unwrap().cash, dec!(100000));
    let events = events.lock();
    assert!(matches!(events.last(), Some(OrderEvent::Cancelled(_))));

    // Terminal orders cannot be cancelled again
    assert!(h.engine.cancel("user-1", order.id).is_err());
}

#[test]
fn cancel_is_scoped_to_the_owner() {
    let h = harness(dec!(100000));
    let order = h
        .engine
        .submit("user-1", OrderRequest::market("AAPL", Side::Buy, 1))
        .unwrap();

    assert!(h.engine.cancel("intruder", order.id).is_err());
    run_settlement(&h);
    assert_eq!(h.engine.order(order.id).unwrap().status, OrderStatus::Filled);
}

#[test]
fn concurrent_settlements_of_different_users_keep_cash_exact() {
    let h = harness(dec!(100000));
    let users = ["alice", "bob", "carol", "dave"];
    for user in users {
        h.engine
            .submit(user, OrderRequest::market("AAPL", Side::Buy, 4))
            .unwrap();
    }
    h.clock.advance(Duration::milliseconds(60));

    let due: Vec<_> = users
        .iter()
        .flat_map(|user| h.engine.orders(user))
        .collect();
    let mut handles = Vec::new();
    for order in due {
        let engine = Arc::clone(&h.engine);
        handles.push(std::thread::spawn(move || engine.settle(order.id)));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    for user in users {
        let portfolio = h.ledger.portfolio(user).unwrap();
        assert_eq!(portfolio.cash, dec!(100000) - dec!(600));
        assert_eq!(portfolio.quantity("AAPL"), 4);
    }
}

#[test]
fn listing_returns_newest_first() {
    let h = harness(dec!(100000));
    let first = h
        .engine
        .submit("user-1", OrderRequest::market("AAPL", Side::Buy, 1))
        .unwrap();
    h.clock.advance(Duration::milliseconds(5));
    let second = h
        .engine
        .submit("user-1", OrderRequest::market("MSFT", Side::Buy, 1))
        .unwrap();

    let listed = h.engine.orders("user-1");
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, second.id);
    assert_eq!(listed[1].id, first.id);
}
