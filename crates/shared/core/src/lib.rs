//! Plutus Core Domain
//!
//! Pure domain types for the plutus market-simulation platform.
//! This crate contains no async, no I/O, and is 100% unit testable.

pub mod entities;
pub mod events;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{
    ChatMessage,
    MarketTick,
    // Core trading entities
    Order,
    OrderId,
    OrderKind,
    OrderRequest,
    OrderStatus,
    Portfolio,
    // Rooms & chat
    Room,
    RoomId,
    Sentiment,
    SentimentLabel,
    Side,
    // AI-signal boundary types
    SignalKind,
    TradeSignal,
};
pub use events::{
    OrderAccepted, OrderCancelled, OrderEvent, OrderFilled, OrderRejected, PlatformEvent,
    RejectReason, RoomEvent,
};
pub use values::{Price, Quantity, Symbol, Timestamp, UserId};
