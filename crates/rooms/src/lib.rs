//! Plutus Rooms
//!
//! Shared discussion rooms: membership sets and append-only chat history.
//! Joins, leaves and messages publish [`RoomEvent`]s on `room:<id>`; history
//! reads are forgiving and never error for unknown rooms.
//!
//! [`RoomEvent`]: plutus_core::RoomEvent

mod error;
mod service;

pub use error::{Result, RoomError};
pub use service::RoomService;
