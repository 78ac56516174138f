//! Mutable progress state, owned by the executor for one batch.

use std::fmt;

use tracing::debug;

/// Where the executor is in its state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchPhase {
    Estimating,
    Executing(usize),
    Finalizing,
    AbortedDirectory,
    TimedOut,
    Cancelled,
    Terminal,
}

impl fmt::Display for BatchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Estimating => write!(f, "estimating"),
            Self::Executing(i) => write!(f, "executing({i})"),
            Self::Finalizing => write!(f, "finalizing"),
            Self::AbortedDirectory => write!(f, "aborted-directory"),
            Self::TimedOut => write!(f, "timed-out"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::Terminal => write!(f, "terminal"),
        }
    }
}

/// Progress counters for one batch run.
///
/// `total_units` is fixed at construction. `completed_units` only grows and
/// is clamped to `total_units`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressState {
    total_units: u64,
    completed_units: u64,
    /// Index of the item currently executing.
    pub current_index: usize,
    /// Set while a streamed move is waiting for the service to open the body.
    pub pending_stream_open: bool,
    succeeded: usize,
    failed: usize,
    phase: BatchPhase,
}

impl ProgressState {
    pub fn new(total_units: u64) -> Self {
        Self {
            total_units,
            completed_units: 0,
            current_index: 0,
            pending_stream_open: false,
            succeeded: 0,
            failed: 0,
            phase: BatchPhase::Estimating,
        }
    }

    pub fn total_units(&self) -> u64 {
        self.total_units
    }

    pub fn completed_units(&self) -> u64 {
        self.completed_units
    }

    pub fn succeeded(&self) -> usize {
        self.succeeded
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn phase(&self) -> BatchPhase {
        self.phase
    }

    /// Records a moved item worth `units`.
    pub fn record_success(&mut self, units: u64) {
        self.succeeded += 1;
        self.completed_units = self
            .completed_units
            .saturating_add(units)
            .min(self.total_units);
    }

    /// Records a soft failure. Units are not credited.
    pub fn record_failure(&mut self) {
        self.failed += 1;
    }

    /// Aggregate percentage from whole units, 0..=100.
    pub fn percent(&self) -> u8 {
        if self.total_units == 0 {
            return 0;
        }
        (self.completed_units.saturating_mul(100) / self.total_units).min(100) as u8
    }

    pub fn enter(&mut self, phase: BatchPhase) {
        debug!(from = %self.phase, to = %phase, "batch phase");
        self.phase = phase;
    }
}
