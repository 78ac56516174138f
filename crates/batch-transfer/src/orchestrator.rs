//! Batch orchestrator.
//!
//! Entry point for callers: owns the progress channel and the cancellation
//! token, and runs batches through a [`BatchExecutor`].

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::executor::BatchExecutor;
use crate::service::MoveService;
use crate::sink::{ChannelSink, ProgressSink};
use crate::types::{Outcome, TransferBatch, TransferConfig, TransferEvent};

/// Runs transfer batches and publishes their progress.
pub struct BatchOrchestrator {
    config: TransferConfig,
    events_tx: mpsc::UnboundedSender<TransferEvent>,
    events_rx: Option<mpsc::UnboundedReceiver<TransferEvent>>,
    cancel: CancellationToken,
}

impl Default for BatchOrchestrator {
    fn default() -> Self {
        Self::new(TransferConfig::default())
    }
}

impl BatchOrchestrator {
    pub fn new(config: TransferConfig) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            config,
            events_tx,
            events_rx: Some(events_rx),
            cancel: CancellationToken::new(),
        }
    }

    pub fn config(&self) -> &TransferConfig {
        &self.config
    }

    /// Takes the event receiver. Can only be called once.
    pub fn take_events(&mut self) -> Option<mpsc::UnboundedReceiver<TransferEvent>> {
        self.events_rx.take()
    }

    /// Returns the cancellation token shared by every batch this
    /// orchestrator runs.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Runs a batch, publishing progress on the event channel.
    pub async fn run(&self, service: &dyn MoveService, batch: &TransferBatch) -> Outcome {
        let sink = ChannelSink::new(self.events_tx.clone());
        self.run_with_sink(service, batch, &sink).await
    }

    /// Runs a batch, reporting progress to `sink` instead of the channel.
    pub async fn run_with_sink(
        &self,
        service: &dyn MoveService,
        batch: &TransferBatch,
        sink: &dyn ProgressSink,
    ) -> Outcome {
        info!(
            items = batch.len(),
            directories = batch.directory_count(),
            destination = %batch.destination(),
            "starting batch transfer"
        );

        let executor = BatchExecutor::new(service, sink, &self.config, self.cancel.clone());
        let outcome = executor.run(batch).await;

        match &outcome {
            Outcome::Completed { succeeded, failed } => {
                info!(succeeded, failed, "batch transfer completed");
            }
            other => warn!(outcome = ?other, "batch transfer did not complete"),
        }
        outcome
    }
}
