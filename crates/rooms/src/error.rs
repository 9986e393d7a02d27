use plutus_core::RoomId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoomError {
    #[error("room not found: {0}")]
    RoomNotFound(RoomId),

    #[error("message text is empty")]
    EmptyMessage,

    #[error("room already exists: {0}")]
    RoomExists(RoomId),
}

pub type Result<T> = std::result::Result<T, RoomError>;
