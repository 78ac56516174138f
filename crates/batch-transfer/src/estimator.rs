//! Work estimation.
//!
//! Sizes a batch in units before anything moves: one unit per file, and
//! for every directory the number of files below it.

use shelfmove_protocol::ItemKind;
use tracing::{debug, warn};

use crate::service::MoveService;
use crate::types::TransferBatch;

/// Units of work for a batch, fixed before execution starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Estimate {
    /// Sum of `item_units`.
    pub total_units: u64,
    /// Units credited when the item at the same index succeeds.
    pub item_units: Vec<u64>,
}

impl Estimate {
    /// Units credited for item `index`. Zero when out of range.
    pub fn units_for(&self, index: usize) -> u64 {
        self.item_units.get(index).copied().unwrap_or(0)
    }

    fn one_per_item(len: usize) -> Self {
        Self {
            total_units: len as u64,
            item_units: vec![1; len],
        }
    }
}

/// Counts the work in `batch`.
///
/// A directory whose count fails contributes 0 and estimation goes on.
/// If everything sums to 0, each item is worth exactly 1 unit instead.
pub async fn estimate(service: &dyn MoveService, batch: &TransferBatch) -> Estimate {
    let mut item_units = Vec::with_capacity(batch.len());

    for (index, item) in batch.items().iter().enumerate() {
        let units = match item.kind {
            ItemKind::File => 1,
            ItemKind::Directory => match service.count_files(&item.source_path).await {
                Ok(count) => count,
                Err(e) => {
                    warn!(
                        index,
                        path = %item.source_path,
                        error = %e,
                        "file count failed, directory contributes no units"
                    );
                    0
                }
            },
        };
        item_units.push(units);
    }

    let total_units = item_units.iter().fold(0u64, |acc, u| acc.saturating_add(*u));
    if total_units == 0 {
        debug!(items = batch.len(), "empty estimate, one unit per item");
        return Estimate::one_per_item(batch.len());
    }

    debug!(total_units, "batch estimated");
    Estimate {
        total_units,
        item_units,
    }
}
