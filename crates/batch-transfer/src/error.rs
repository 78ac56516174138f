//! Transfer error types.

use shelfmove_protocol::FrameError;

/// Errors produced while building or executing a batch.
///
/// None of these escape [`BatchExecutor::run`](crate::BatchExecutor::run);
/// they are folded into a soft item failure or a terminal outcome there.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("move service error: {0}")]
    Client(#[from] shelfmove_move_client::Error),

    #[error("service error: {0}")]
    Service(String),

    #[error("malformed progress frame: {0}")]
    Frame(#[from] FrameError),

    #[error("invalid item: {0}")]
    InvalidItem(String),

    #[error("invalid destination: {0}")]
    InvalidDestination(String),
}
