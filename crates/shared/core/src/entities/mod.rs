mod market_data;
mod order;
mod order_kind;
mod order_status;
mod portfolio;
mod room;
mod side;
mod signal;

pub use market_data::MarketTick;
pub use order::{Order, OrderId, OrderRequest};
pub use order_kind::OrderKind;
pub use order_status::OrderStatus;
pub use portfolio::Portfolio;
pub use room::{ChatMessage, Room, RoomId};
pub use side::Side;
pub use signal::{Sentiment, SentimentLabel, SignalKind, TradeSignal};
