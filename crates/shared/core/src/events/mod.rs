use serde::{Deserialize, Serialize};

use crate::entities::{ChatMessage, MarketTick, Order, Portfolio, Side};
use crate::values::{Price, Quantity, Symbol, Timestamp, UserId};
use uuid::Uuid;

/// Everything the platform publishes, one variant per topic category.
///
/// Consumers pattern-match exhaustively instead of probing optional fields;
/// a transport layer can serialize the whole union as a tagged object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "camelCase")]
pub enum PlatformEvent {
    /// A price advanced on `price:<symbol>`
    Market(MarketTick),
    /// An order changed state on `orders:<user>`
    Order(OrderEvent),
    /// A fresh valuation snapshot on `portfolios`
    Portfolio(Portfolio),
    /// Membership or chat activity on `room:<id>`
    Room(RoomEvent),
}

/// Order lifecycle events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "camelCase")]
pub enum OrderEvent {
    Accepted(OrderAccepted),
    Filled(OrderFilled),
    Rejected(OrderRejected),
    Cancelled(OrderCancelled),
}

impl OrderEvent {
    pub fn order_id(&self) -> Uuid {
        match self {
            Self::Accepted(e) => e.order_id,
            Self::Filled(e) => e.order_id,
            Self::Rejected(e) => e.order_id,
            Self::Cancelled(e) => e.order_id,
        }
    }

    pub fn user_id(&self) -> &str {
        match self {
            Self::Accepted(e) => &e.user_id,
            Self::Filled(e) => &e.user_id,
            Self::Rejected(e) => &e.user_id,
            Self::Cancelled(e) => &e.user_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderAccepted {
    pub order_id: Uuid,
    pub user_id: UserId,
    pub symbol: Symbol,
    pub side: Side,
    pub quantity: Quantity,
    pub limit_price: Option<Price>,
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderFilled {
    pub order_id: Uuid,
    pub user_id: UserId,
    pub symbol: Symbol,
    pub side: Side,
    pub quantity: Quantity,
    pub execution_price: Price,
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRejected {
    pub order_id: Uuid,
    pub user_id: UserId,
    pub symbol: Symbol,
    pub reason: RejectReason,
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCancelled {
    pub order_id: Uuid,
    pub user_id: UserId,
    pub symbol: Symbol,
    pub timestamp: Timestamp,
}

/// Why an order was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    InsufficientFunds,
    InsufficientPosition,
    /// The live price vanished between acceptance and settlement
    PriceUnavailable,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InsufficientFunds => write!(f, "insufficient funds"),
            Self::InsufficientPosition => write!(f, "insufficient position"),
            Self::PriceUnavailable => write!(f, "price unavailable"),
        }
    }
}

/// Room membership and chat events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "camelCase")]
pub enum RoomEvent {
    Joined {
        room_id: String,
        user_id: UserId,
        timestamp: Timestamp,
    },
    Left {
        room_id: String,
        user_id: UserId,
        timestamp: Timestamp,
    },
    Message(ChatMessage),
}

impl From<&Order> for OrderAccepted {
    fn from(order: &Order) -> Self {
        OrderAccepted {
            order_id: order.id,
            user_id: order.user_id.clone(),
            symbol: order.symbol.clone(),
            side: order.side,
            quantity: order.quantity,
            limit_price: order.limit_price,
            timestamp: order.accepted_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{OrderRequest, OrderStatus};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    #[test]
    fn accepted_event_carries_order_fields() {
        let request = OrderRequest::limit("AAPL", Side::Buy, 5, dec!(150));
        let order = Order::pending("user-1", &request, Utc::now());
        let event = OrderAccepted::from(&order);
        assert_eq!(event.order_id, order.id);
        assert_eq!(event.symbol, "AAPL");
        assert_eq!(event.limit_price, Some(dec!(150)));
        assert_eq!(order.status, OrderStatus::Pending);
    }

    #[test]
    fn platform_event_serializes_tagged() {
        let event = PlatformEvent::Room(RoomEvent::Joined {
            room_id: "room-1".to_string(),
            user_id: "alice".to_string(),
            timestamp: Utc::now(),
        });
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"category\":\"room\""));
        assert!(json.contains("\"event_type\":\"joined\""));
    }
}
