//! Wire types shared between the shelfmove orchestrator and the Move Service.
//!
//! Nothing in here performs I/O. The HTTP binding lives in
//! `shelfmove-move-client`, the orchestration logic in
//! `shelfmove-batch-transfer`.

pub mod constants;
pub mod messages;
pub mod stream;
pub mod types;

// Re-export primary types for convenience.
pub use messages::{CountFilesResponse, FolderSizeResponse, MoveRequest, MoveResponse};
pub use stream::{FrameError, StreamEvent, parse_frame};
pub use types::{ItemKind, RawEntry, TransferItem};
