use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{OrderKind, OrderStatus, Side};
use crate::values::{Price, Quantity, Symbol, Timestamp, UserId};

/// Unique identifier for an order
pub type OrderId = Uuid;

/// What a caller asks the engine to do, before validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRequest {
    pub symbol: Symbol,
    pub kind: OrderKind,
    pub side: Side,
    pub quantity: Quantity,
    /// Required for Limit orders
    pub limit_price: Option<Price>,
}

impl OrderRequest {
    pub fn market(symbol: impl Into<Symbol>, side: Side, quantity: Quantity) -> Self {
        Self {
            symbol: symbol.into(),
            kind: OrderKind::Market,
            side,
            quantity,
            limit_price: None,
        }
    }

    pub fn limit(
        symbol: impl Into<Symbol>,
        side: Side,
        quantity: Quantity,
        limit_price: Price,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            kind: OrderKind::Limit,
            side,
            quantity,
            limit_price: Some(limit_price),
        }
    }

    /// Structural validity: positive quantity, and a positive limit price
    /// whenever the kind requires one.
    pub fn is_well_formed(&self) -> bool {
        if self.quantity <= 0 {
            return false;
        }
        match self.kind {
            OrderKind::Market => true,
            OrderKind::Limit => self.limit_price.is_some_and(|p| p > Price::ZERO),
        }
    }
}

/// Full order details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub symbol: Symbol,
    pub kind: OrderKind,
    pub side: Side,
    pub quantity: Quantity,
    /// Required for Limit orders
    pub limit_price: Option<Price>,
    pub status: OrderStatus,
    pub accepted_at: Timestamp,
    /// Set when the order reaches `Filled`
    pub settled_at: Option<Timestamp>,
    /// Price the settlement actually used
    pub execution_price: Option<Price>,
}

impl Order {
    /// Create a pending order from an accepted request
    pub fn pending(user_id: impl Into<UserId>, request: &OrderRequest, now: Timestamp) -> Self {
        Self::with_status(user_id, request, OrderStatus::Pending, now)
    }

    /// Create an order already in a given status (e.g. a rejected record)
    pub fn with_status(
        user_id: impl Into<UserId>,
        request: &OrderRequest,
        status: OrderStatus,
        now: Timestamp,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            symbol: request.symbol.clone(),
            kind: request.kind,
            side: request.side,
            quantity: request.quantity,
            limit_price: request.limit_price,
            status,
            accepted_at: now,
            settled_at: None,
            execution_price: None,
        }
    }

    /// Notional value at a given price
    pub fn notional(&self, price: Price) -> Price {
        price * Price::from(self.quantity)
    }
}
