use thiserror::Error;
use crate::game::Move;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("illegal move {0}")]
    IllegalMove(Move),

    #[error("cell {0} is outside the board")]
    OutOfBounds(Move),

    #[error("invalid board dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("invalid message: {0}")]
    Protocol(String),

    #[error("game has not started yet")]
    NotStarted,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("search worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),

    #[error("failed to initialise logger: {0}")]
    Logger(#[from] log::SetLoggerError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Raised when the time budget drops below the configured threshold. Only
/// `get_move` catches it.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
#[error("search cancelled with {remaining_ms}ms remaining (threshold {threshold_ms}ms)")]
pub struct SearchCancelled {
    pub remaining_ms: f64,
    pub threshold_ms: f64,
}
