//! Batch transfer orchestrator for the shelfmove comic library.
//!
//! Moves an ordered list of files and directories to one destination
//! through a remote Move Service, one item at a time. The crate holds
//! the business logic only: the caller supplies a [`MoveService`]
//! implementation (the HTTP client from `shelfmove-move-client`, or a
//! mock in tests) and a [`ProgressSink`] that displays progress.
//!
//! # Pipeline
//!
//! 1. **Estimate**: count files below every directory to size the batch
//! 2. **Execute**: files as single-shot moves, directories as streamed moves
//! 3. **Decode**: turn the streamed body into progress / done / error frames
//! 4. **Police**: files fail soft, directories fail hard, the watchdog bounds it all
//!
//! Every batch ends in exactly one [`Outcome`].

pub mod decoder;
pub mod error;
pub mod estimator;
pub mod executor;
pub mod orchestrator;
pub mod service;
pub mod sink;
pub mod state;
pub mod types;
pub mod watchdog;

#[cfg(test)]
pub(crate) mod mock;

// Re-export primary types for convenience.
pub use decoder::{EventStream, FrameDecoder};
pub use error::TransferError;
pub use estimator::{Estimate, estimate};
pub use executor::BatchExecutor;
pub use orchestrator::BatchOrchestrator;
pub use service::{ByteStream, MoveService, ServiceFuture};
pub use sink::{ChannelSink, LogSink, ProgressSink};
pub use state::{BatchPhase, ProgressState};
pub use types::{Outcome, TransferBatch, TransferConfig, TransferEvent};
pub use watchdog::{Deadline, Interrupt, Watchdog};

pub use shelfmove_protocol::{ItemKind, RawEntry, StreamEvent, TransferItem};
