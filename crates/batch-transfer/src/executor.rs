//! Batch executor.
//!
//! Runs one batch as a single sequential loop. Every remote call is raced
//! against the [`Watchdog`], so an expired deadline or a cancellation drops
//! whatever request or stream is in flight.

use humansize::{DECIMAL, format_size};
use shelfmove_protocol::{StreamEvent, TransferItem};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::decoder::EventStream;
use crate::error::TransferError;
use crate::estimator::estimate;
use crate::service::{MoveService, ServiceFuture};
use crate::sink::ProgressSink;
use crate::state::{BatchPhase, ProgressState};
use crate::types::{Outcome, TransferBatch, TransferConfig};
use crate::watchdog::{Interrupt, Watchdog};

/// How a single item ended.
#[derive(Debug)]
enum ItemResult {
    Moved,
    Failed(String),
    Interrupted(Interrupt),
}

/// Executes batches against a Move Service, reporting to a sink.
pub struct BatchExecutor<'a> {
    service: &'a dyn MoveService,
    sink: &'a dyn ProgressSink,
    config: &'a TransferConfig,
    cancel: CancellationToken,
}

impl<'a> BatchExecutor<'a> {
    pub fn new(
        service: &'a dyn MoveService,
        sink: &'a dyn ProgressSink,
        config: &'a TransferConfig,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            service,
            sink,
            config,
            cancel,
        }
    }

    /// Runs `batch` to its terminal outcome.
    ///
    /// Never fails: every error becomes a soft item failure or an
    /// [`Outcome`]. The sink's `on_terminal` is called exactly once.
    pub async fn run(&self, batch: &TransferBatch) -> Outcome {
        let watchdog = Watchdog::new(
            self.config.batch_timeout,
            self.config.stream_timeout,
            self.cancel.clone(),
        );

        let outcome = self.execute(batch, &watchdog).await;
        self.sink.on_terminal(&outcome);
        outcome
    }

    async fn execute(&self, batch: &TransferBatch, watchdog: &Watchdog) -> Outcome {
        if let Some(interrupt) = watchdog.check() {
            return interrupted_outcome(interrupt, 0, watchdog);
        }
        if batch.directory_count() > 0 {
            self.sink.set_status("Counting files...");
        }

        let estimate = tokio::select! {
            biased;
            est = estimate(self.service, batch) => est,
            interrupt = watchdog.interrupted() => {
                return interrupted_outcome(interrupt, 0, watchdog);
            }
        };

        let mut state = ProgressState::new(estimate.total_units);
        self.report_units(&state);

        for (index, item) in batch.items().iter().enumerate() {
            if let Some(interrupt) = watchdog.check() {
                state.enter(interrupt_phase(interrupt));
                return interrupted_outcome(interrupt, index, watchdog);
            }

            state.current_index = index;
            state.enter(BatchPhase::Executing(index));

            let streamed = item.kind.is_directory() || self.config.stream_files;
            let result = if streamed {
                self.move_streamed(item, batch.destination(), &mut state, watchdog)
                    .await
            } else {
                self.move_file(item, batch.destination(), watchdog).await
            };

            match result {
                ItemResult::Moved => {
                    state.record_success(estimate.units_for(index));
                    info!(index, path = %item.source_path, kind = %item.kind, "item moved");
                    self.report_units(&state);
                }
                ItemResult::Failed(reason) if item.kind.is_directory() => {
                    error!(index, path = %item.source_path, %reason, "directory move failed, aborting batch");
                    state.enter(BatchPhase::AbortedDirectory);
                    return Outcome::AbortedOnDirectoryFailure {
                        at_index: index,
                        reason,
                    };
                }
                ItemResult::Failed(reason) => {
                    warn!(index, path = %item.source_path, %reason, "file move failed, continuing");
                    state.record_failure();
                    self.sink
                        .warn(&format!("Failed to move {}: {reason}", item.display_name()));
                }
                ItemResult::Interrupted(interrupt) => {
                    state.enter(interrupt_phase(interrupt));
                    return interrupted_outcome(interrupt, index, watchdog);
                }
            }
        }

        state.enter(BatchPhase::Finalizing);
        self.sink.set_percent(100);
        let outcome = Outcome::Completed {
            succeeded: state.succeeded(),
            failed: state.failed(),
        };
        state.enter(BatchPhase::Terminal);
        outcome
    }

    async fn move_file(&self, item: &TransferItem, destination: &str, watchdog: &Watchdog) -> ItemResult {
        self.sink.set_status(&format!("Moving {}", item.display_name()));

        let response = tokio::select! {
            biased;
            res = self.service.move_item(&item.source_path, destination) => res,
            interrupt = watchdog.interrupted() => return ItemResult::Interrupted(interrupt),
        };

        match response {
            Ok(resp) if resp.success => ItemResult::Moved,
            Ok(resp) => ItemResult::Failed(resp.error_message().to_string()),
            Err(e) => ItemResult::Failed(e.to_string()),
        }
    }

    async fn move_streamed(
        &self,
        item: &TransferItem,
        destination: &str,
        state: &mut ProgressState,
        watchdog: &Watchdog,
    ) -> ItemResult {
        let mut status = ItemStatus::new(item.display_name());
        self.sink.set_status(&status.render());

        // Display only; polled alongside the transfer and dropped with it.
        let mut size_query = item
            .kind
            .is_directory()
            .then(|| self.service.folder_size(&item.source_path));

        state.pending_stream_open = true;
        let mut open = self.service.move_streamed(&item.source_path, destination);
        let opened = loop {
            tokio::select! {
                biased;
                size = poll_side(&mut size_query), if size_query.is_some() => {
                    self.show_size(&mut status, size);
                }
                res = &mut open => break res,
                interrupt = watchdog.interrupted() => {
                    state.pending_stream_open = false;
                    return ItemResult::Interrupted(interrupt);
                }
            }
        };
        state.pending_stream_open = false;

        let mut events = match opened {
            Ok(body) => EventStream::new(body),
            Err(e) => return ItemResult::Failed(format!("stream rejected: {e}")),
        };

        let deadline = watchdog.stream_deadline();
        loop {
            let event = tokio::select! {
                biased;
                size = poll_side(&mut size_query), if size_query.is_some() => {
                    self.show_size(&mut status, size);
                    continue;
                }
                event = events.next_event() => event,
                _ = deadline.expired() => {
                    warn!(
                        path = %item.source_path,
                        elapsed_ms = deadline.elapsed_ms(),
                        "stream deadline passed, treating item as moved"
                    );
                    return ItemResult::Moved;
                }
                interrupt = watchdog.interrupted() => return ItemResult::Interrupted(interrupt),
            };

            match event {
                Ok(Some(StreamEvent::Progress(percent))) => {
                    status.percent = Some(percent);
                    self.sink.set_status(&status.render());
                }
                Ok(Some(StreamEvent::Keepalive(text))) => {
                    debug!(path = %item.source_path, %text, "keepalive");
                    self.sink.set_status(&format!("{}: {text}", status.render()));
                }
                Ok(Some(StreamEvent::Done)) | Ok(None) => return ItemResult::Moved,
                Ok(Some(StreamEvent::Error(message))) => return ItemResult::Failed(message),
                Err(e) => return ItemResult::Failed(e.to_string()),
            }

            if let Some(interrupt) = watchdog.check() {
                return ItemResult::Interrupted(interrupt);
            }
        }
    }

    fn show_size(&self, status: &mut ItemStatus, size: Result<u64, TransferError>) {
        match size {
            Ok(bytes) => {
                status.size = Some(format_size(bytes, DECIMAL));
                self.sink.set_status(&status.render());
            }
            Err(e) => debug!(name = %status.name, error = %e, "folder size unavailable"),
        }
    }

    fn report_units(&self, state: &ProgressState) {
        self.sink
            .set_units(state.completed_units(), state.total_units());
        self.sink.set_percent(state.percent());
    }
}

/// Status line for the item in flight.
struct ItemStatus {
    name: String,
    size: Option<String>,
    percent: Option<u8>,
}

impl ItemStatus {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            size: None,
            percent: None,
        }
    }

    fn render(&self) -> String {
        let mut text = format!("Moving {}", self.name);
        if let Some(size) = &self.size {
            text.push_str(&format!(" ({size})"));
        }
        if let Some(percent) = self.percent {
            text.push_str(&format!(" {percent}%"));
        }
        text
    }
}

/// Awaits an optional side query, clearing the slot once it resolves.
///
/// Pending forever while the slot is empty.
async fn poll_side<T>(slot: &mut Option<ServiceFuture<'_, T>>) -> Result<T, TransferError> {
    let Some(fut) = slot.as_mut() else {
        return std::future::pending().await;
    };
    let result = fut.await;
    *slot = None;
    result
}

fn interrupt_phase(interrupt: Interrupt) -> BatchPhase {
    match interrupt {
        Interrupt::TimedOut => BatchPhase::TimedOut,
        Interrupt::Cancelled => BatchPhase::Cancelled,
    }
}

fn interrupted_outcome(interrupt: Interrupt, at_index: usize, watchdog: &Watchdog) -> Outcome {
    match interrupt {
        Interrupt::TimedOut => {
            let after_ms = watchdog.elapsed_ms();
            error!(at_index, after_ms, "batch deadline passed");
            Outcome::TimedOut { after_ms }
        }
        Interrupt::Cancelled => {
            warn!(at_index, "batch cancelled");
            Outcome::Cancelled { at_index }
        }
    }
}
