//! Progress sinks.
//!
//! The executor reports everything user-visible through a [`ProgressSink`].
//! Sink calls are fire-and-forget: a sink never fails a batch.

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::types::{Outcome, TransferEvent};

/// Receiver of status text, aggregate percentage and the terminal outcome.
pub trait ProgressSink: Send + Sync {
    /// Replaces the status line.
    fn set_status(&self, text: &str);

    /// Sets the aggregate percentage, 0..=100.
    fn set_percent(&self, percent: u8);

    /// Reports a soft failure.
    fn warn(&self, text: &str) {
        self.set_status(text);
    }

    /// Raw unit counters behind the percentage.
    fn set_units(&self, _completed: u64, _total: u64) {}

    /// Called exactly once per batch with the terminal outcome.
    fn on_terminal(&self, outcome: &Outcome);
}

/// Forwards progress as [`TransferEvent`]s over a channel.
///
/// The channel is unbounded so the executor never waits on a slow reader.
/// Send errors (reader gone) are ignored.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<TransferEvent>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::UnboundedSender<TransferEvent>) -> Self {
        Self { tx }
    }

    fn send(&self, event: TransferEvent) {
        let _ = self.tx.send(event);
    }
}

impl ProgressSink for ChannelSink {
    fn set_status(&self, text: &str) {
        self.send(TransferEvent::Status(text.to_string()));
    }

    fn set_percent(&self, percent: u8) {
        self.send(TransferEvent::Percent(percent));
    }

    fn warn(&self, text: &str) {
        self.send(TransferEvent::Warning(text.to_string()));
    }

    fn set_units(&self, completed: u64, total: u64) {
        self.send(TransferEvent::Units { completed, total });
    }

    fn on_terminal(&self, outcome: &Outcome) {
        self.send(TransferEvent::Finished(outcome.clone()));
    }
}

/// Writes progress to the tracing log. Useful for headless runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl ProgressSink for LogSink {
    fn set_status(&self, text: &str) {
        info!(status = %text, "transfer");
    }

    fn set_percent(&self, percent: u8) {
        info!(percent, "transfer progress");
    }

    fn warn(&self, text: &str) {
        warn!("{text}");
    }

    fn on_terminal(&self, outcome: &Outcome) {
        if outcome.is_success() {
            info!(summary = %outcome.summary(), "transfer finished");
        } else {
            warn!(summary = %outcome.summary(), "transfer finished");
        }
    }
}
