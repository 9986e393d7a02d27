use chrono::Duration;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use plutus_bus::{EventBus, Topic};
use plutus_core::{
    Order, OrderAccepted, OrderCancelled, OrderEvent, OrderFilled, OrderId, OrderKind,
    OrderRejected, OrderRequest, OrderStatus, PlatformEvent, RejectReason, Side,
};
use plutus_ports::{Clock, PriceSource};

use crate::error::{EngineError, LedgerError, Result};
use crate::ledger::Ledger;
use crate::scheduler::SettlementScheduler;

/// Tunables for order processing
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Simulated latency between acceptance and settlement
    pub settle_delay_ms: u64,
    /// Cadence of the settlement poller
    pub poll_interval_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: 50,
            poll_interval_ms: 10,
        }
    }
}

/// Validates, accepts and asynchronously settles orders.
///
/// `submit` returns immediately: an accepted order comes back `Pending` and
/// resolves later through the scheduler, with every transition published on
/// `orders:<user>`. Business-rule refusals (funds, position) come back as
/// `Rejected`-status records rather than errors; only malformed requests and
/// unknown symbols fail the call itself.
pub struct OrderEngine {
    config: EngineConfig,
    ledger: Arc<Ledger>,
    prices: Arc<dyn PriceSource>,
    bus: Arc<EventBus<PlatformEvent>>,
    clock: Arc<dyn Clock>,
    orders: DashMap<OrderId, Order>,
    scheduler: SettlementScheduler,
}

impl OrderEngine {
    pub fn new(
        config: EngineConfig,
        ledger: Arc<Ledger>,
        prices: Arc<dyn PriceSource>,
        bus: Arc<EventBus<PlatformEvent>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config,
            ledger,
            prices,
            bus,
            clock,
            orders: DashMap::new(),
            scheduler: SettlementScheduler::new(),
        }
    }

    /// Submit an order on behalf of a user.
    ///
    /// Validation is synchronous; acceptance publishes `OrderEvent::Accepted`
    /// and schedules settlement `settle_delay_ms` ahead.
    pub fn submit(&self, user_id: &str, request: OrderRequest) -> Result<Order> {
        if request.quantity <= 0 {
            return Err(EngineError::InvalidOrder(
                "quantity must be a positive integer".to_string(),
            ));
        }
        if request.kind == OrderKind::Limit
            && !request.limit_price.is_some_and(|p| p > rust_decimal::Decimal::ZERO)
        {
            return Err(EngineError::InvalidOrder(
                "limit orders require a positive limit price".to_string(),
            ));
        }
        let live = self
            .prices
            .price(&request.symbol)
            .ok_or_else(|| EngineError::SymbolNotFound(request.symbol.clone()))?;

        let now = self.clock.now();
        let account = self.ledger.get_or_create(user_id);

        // Business-rule check against the submission-time snapshot; the
        // authoritative check happens again inside the ledger at settlement.
        let refusal = match request.side {
            Side::Buy => {
                let estimate = request.limit_price.unwrap_or(live)
                    * rust_decimal::Decimal::from(request.quantity);
                (estimate > account.cash).then_some(RejectReason::InsufficientFunds)
            }
            Side::Sell => {
                let held = account.quantity(&request.symbol);
                (request.quantity > held).then_some(RejectReason::InsufficientPosition)
            }
        };

        if let Some(reason) = refusal {
            let order = Order::with_status(user_id, &request, OrderStatus::Rejected, now);
            warn!(
                order_id = %order.id,
                user_id,
                symbol = %order.symbol,
                %reason,
                "order refused at submission"
            );
            self.orders.insert(order.id, order.clone());
            self.publish_order(
                user_id,
                OrderEvent::Rejected(OrderRejected {
                    order_id: order.id,
                    user_id: user_id.to_string(),
                    symbol: order.symbol.clone(),
                    reason,
                    timestamp: now,
                }),
            );
            return Ok(order);
        }

        let order = Order::pending(user_id, &request, now);
        info!(
            order_id = %order.id,
            user_id,
            symbol = %order.symbol,
            side = order.side.as_str(),
            quantity = order.quantity,
            "order accepted"
        );
        self.orders.insert(order.id, order.clone());
        self.publish_order(user_id, OrderEvent::Accepted(OrderAccepted::from(&order)));
        self.scheduler.schedule(
            order.id,
            now + Duration::milliseconds(self.config.settle_delay_ms as i64),
        );
        Ok(order)
    }

    /// Cancel a pending order owned by `user_id`
    pub fn cancel(&self, user_id: &str, order_id: OrderId) -> Result<Order> {
        let mut entry = self
            .orders
            .get_mut(&order_id)
            .ok_or(EngineError::OrderNotFound(order_id))?;
        if entry.user_id != user_id {
            return Err(EngineError::OrderNotFound(order_id));
        }
        if entry.status != OrderStatus::Pending {
            return Err(EngineError::NotCancellable(order_id));
        }

        self.scheduler.cancel(&order_id);
        entry.status = OrderStatus::Cancelled;
        let order = entry.clone();
        drop(entry);

        info!(order_id = %order_id, user_id, "order cancelled");
        self.publish_order(
            user_id,
            OrderEvent::Cancelled(OrderCancelled {
                order_id,
                user_id: user_id.to_string(),
                symbol: order.symbol.clone(),
                timestamp: self.clock.now(),
            }),
        );
        Ok(order)
    }

    /// Settle everything the scheduler considers due; returns how many
    pub fn settle_due(&self) -> usize {
        let due = self.scheduler.due(self.clock.now());
        let count = due.len();
        for order_id in due {
            self.settle(order_id);
        }
        count
    }

    /// Resolve one pending order against the ledger.
    ///
    /// Safe to call more than once for the same id: a terminal order is left
    /// untouched, so a duplicate timer fire cannot double-apply the delta.
    pub fn settle(&self, order_id: OrderId) {
        let Some(mut entry) = self.orders.get_mut(&order_id) else {
            debug!(order_id = %order_id, "settle called for unknown order");
            return;
        };
        if entry.status != OrderStatus::Pending {
            debug!(order_id = %order_id, status = ?entry.status, "already settled, skipping");
            return;
        }

        let now = self.clock.now();
        // Limit orders execute at their stated price; market orders re-read
        // the live price here, not at submission (slippage).
        let execution_price = match entry.kind {
            OrderKind::Limit => entry.limit_price,
            OrderKind::Market => self.prices.price(&entry.symbol),
        };

        let Some(execution_price) = execution_price else {
            entry.status = OrderStatus::Rejected;
            let event = OrderEvent::Rejected(OrderRejected {
                order_id,
                user_id: entry.user_id.clone(),
                symbol: entry.symbol.clone(),
                reason: RejectReason::PriceUnavailable,
                timestamp: now,
            });
            let user_id = entry.user_id.clone();
            drop(entry);
            warn!(order_id = %order_id, "no execution price available, order rejected");
            self.publish_order(&user_id, event);
            return;
        };

        let outcome = self.ledger.apply_settlement(
            &entry.user_id,
            &entry.symbol,
            entry.side,
            entry.quantity,
            execution_price,
        );

        match outcome {
            Ok(()) => {
                entry.status = OrderStatus::Filled;
                entry.execution_price = Some(execution_price);
                entry.settled_at = Some(now);
                let event = OrderEvent::Filled(OrderFilled {
                    order_id,
                    user_id: entry.user_id.clone(),
                    symbol: entry.symbol.clone(),
                    side: entry.side,
                    quantity: entry.quantity,
                    execution_price,
                    timestamp: now,
                });
                let user_id = entry.user_id.clone();
                drop(entry);

                info!(
                    order_id = %order_id,
                    user_id = %user_id,
                    price = %execution_price,
                    "order filled"
                );
                self.publish_order(&user_id, event);
                match self.ledger.valuate(&user_id, self.prices.as_ref()) {
                    Ok(snapshot) => self
                        .bus
                        .publish(&Topic::portfolios(), &PlatformEvent::Portfolio(snapshot)),
                    Err(err) => warn!(user_id = %user_id, error = %err, "valuation failed"),
                }
            }
            Err(err) => {
                // Submission-time check passed but the account moved in the
                // meantime; the order must still resolve, never vanish.
                entry.status = OrderStatus::Rejected;
                let event = OrderEvent::Rejected(OrderRejected {
                    order_id,
                    user_id: entry.user_id.clone(),
                    symbol: entry.symbol.clone(),
                    reason: reject_reason(&err),
                    timestamp: now,
                });
                let user_id = entry.user_id.clone();
                drop(entry);

                warn!(order_id = %order_id, error = %err, "settlement refused");
                self.publish_order(&user_id, event);
            }
        }
    }

    /// Orders submitted by a user, newest first
    pub fn orders(&self, user_id: &str) -> Vec<Order> {
        let mut orders: Vec<Order> = self
            .orders
            .iter()
            .filter(|entry| entry.user_id == user_id)
            .map(|entry| entry.clone())
            .collect();
        orders.sort_by(|a, b| b.accepted_at.cmp(&a.accepted_at));
        orders
    }

    /// Look up one order by id
    pub fn order(&self, order_id: OrderId) -> Option<Order> {
        self.orders.get(&order_id).map(|entry| entry.clone())
    }

    /// Due time of the next scheduled settlement (observability)
    pub fn next_settlement(&self) -> Option<plutus_core::Timestamp> {
        self.scheduler.next_due()
    }

    /// Run the settlement poller for the lifetime of the process
    pub async fn run(self: Arc<Self>) {
        info!(
            poll_ms = self.config.poll_interval_ms,
            settle_delay_ms = self.config.settle_delay_ms,
            "starting settlement poller"
        );
        let mut interval =
            tokio::time::interval(std::time::Duration::from_millis(self.config.poll_interval_ms));
        loop {
            interval.tick().await;
            self.settle_due();
        }
    }

    /// Spawn the settlement poller on the runtime
    pub fn spawn(self: &Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(Arc::clone(self).run())
    }

    fn publish_order(&self, user_id: &str, event: OrderEvent) {
        self.bus
            .publish(&Topic::orders(user_id), &PlatformEvent::Order(event));
    }
}

fn reject_reason(err: &LedgerError) -> RejectReason {
    match err {
        LedgerError::InsufficientFunds { .. } => RejectReason::InsufficientFunds,
        LedgerError::InsufficientPosition { .. } => RejectReason::InsufficientPosition,
    }
}
