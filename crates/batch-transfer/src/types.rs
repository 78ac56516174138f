//! Data types for the batch transfer flow.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use shelfmove_protocol::constants::{BATCH_TIMEOUT, STREAM_TIMEOUT};
use shelfmove_protocol::{ItemKind, RawEntry, TransferItem};

use crate::error::TransferError;

/// An ordered set of items moved to a single destination.
///
/// Items run strictly in order, index 0 first. The batch is never mutated
/// after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferBatch {
    items: Vec<TransferItem>,
    destination: String,
}

impl TransferBatch {
    /// Builds a batch from already-typed items.
    ///
    /// Duplicate source paths are kept; each occurrence is moved on its own.
    pub fn new(items: Vec<TransferItem>, destination: impl Into<String>) -> Result<Self, TransferError> {
        let destination = destination.into();
        if destination.trim().is_empty() {
            return Err(TransferError::InvalidDestination(
                "destination path is empty".into(),
            ));
        }

        if let Some(index) = items.iter().position(|i| i.source_path.trim().is_empty()) {
            return Err(TransferError::InvalidItem(format!(
                "item {index} has an empty path"
            )));
        }

        Ok(Self { items, destination })
    }

    /// Builds a batch from loosely-typed client entries.
    ///
    /// Bare strings are files; typed entries must name a known kind.
    pub fn from_entries(entries: Vec<RawEntry>, destination: impl Into<String>) -> Result<Self, TransferError> {
        let items = entries
            .into_iter()
            .map(|entry| match entry {
                RawEntry::Path(path) => Ok(TransferItem::file(path)),
                RawEntry::Typed { path, kind } => ItemKind::from_type_name(&kind)
                    .map(|kind| TransferItem {
                        source_path: path.clone(),
                        kind,
                    })
                    .ok_or_else(|| {
                        TransferError::InvalidItem(format!("{path}: unknown item type {kind:?}"))
                    }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(items, destination)
    }

    pub fn items(&self) -> &[TransferItem] {
        &self.items
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of directory items in the batch.
    pub fn directory_count(&self) -> usize {
        self.items.iter().filter(|i| i.kind.is_directory()).count()
    }
}

/// Terminal result of a batch. Exactly one is produced per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum Outcome {
    /// Every item was attempted. `failed` counts soft (file) failures.
    Completed { succeeded: usize, failed: usize },
    /// A directory failed; items after `at_index` were never started.
    AbortedOnDirectoryFailure { at_index: usize, reason: String },
    /// The whole-batch deadline elapsed before the last item finished.
    TimedOut { after_ms: u64 },
    /// The caller cancelled the batch while item `at_index` was pending.
    Cancelled { at_index: usize },
}

impl Outcome {
    /// Whether every item was moved.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed { failed: 0, .. })
    }

    /// Human-readable one-line summary.
    pub fn summary(&self) -> String {
        match self {
            Self::Completed { succeeded, failed: 0 } => format!("Moved {succeeded} items"),
            Self::Completed { succeeded, failed } => {
                format!("Moved {succeeded} items, {failed} failed")
            }
            Self::AbortedOnDirectoryFailure { at_index, reason } => {
                format!("Aborted at item {}: {reason}", at_index + 1)
            }
            Self::TimedOut { after_ms } => {
                format!("Timed out after {:.1}s", *after_ms as f64 / 1000.0)
            }
            Self::Cancelled { at_index } => format!("Cancelled at item {}", at_index + 1),
        }
    }
}

/// Progress event forwarded by [`ChannelSink`](crate::ChannelSink).
#[derive(Debug, Clone, PartialEq)]
pub enum TransferEvent {
    /// Status line naming the current item.
    Status(String),
    /// Aggregate progress, 0..=100.
    Percent(u8),
    /// Raw unit counters behind the aggregate percentage.
    Units { completed: u64, total: u64 },
    /// A soft failure the user should see.
    Warning(String),
    /// The batch reached its terminal outcome.
    Finished(Outcome),
}

/// Tunables for one orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferConfig {
    /// Bound on the whole batch, estimation included.
    pub batch_timeout: Duration,
    /// Bound on one streamed transfer; expiry counts as success.
    pub stream_timeout: Duration,
    /// Route file items through the streamed path too.
    pub stream_files: bool,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            batch_timeout: BATCH_TIMEOUT,
            stream_timeout: STREAM_TIMEOUT,
            stream_files: false,
        }
    }
}

impl TransferConfig {
    pub fn with_batch_timeout(mut self, timeout: Duration) -> Self {
        self.batch_timeout = timeout;
        self
    }

    pub fn with_stream_timeout(mut self, timeout: Duration) -> Self {
        self.stream_timeout = timeout;
        self
    }

    pub fn with_stream_files(mut self, enabled: bool) -> Self {
        self.stream_files = enabled;
        self
    }
}
