//! Deadlines and cancellation for a running batch.

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Stand-in for limits too large to add to the current instant.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// A fixed point in time after which work is abandoned.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    started: Instant,
    deadline: Instant,
}

impl Deadline {
    /// Starts a deadline `limit` from now.
    ///
    /// A limit past what the clock can represent is capped at roughly thirty
    /// years, which never expires in practice.
    pub fn after(limit: Duration) -> Self {
        let started = Instant::now();
        let deadline = started
            .checked_add(limit)
            .unwrap_or_else(|| started + FAR_FUTURE);
        Self { started, deadline }
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.deadline
    }

    /// Milliseconds since the deadline was started.
    pub fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    /// Resolves once the deadline has passed.
    pub async fn expired(&self) {
        tokio::time::sleep_until(self.deadline).await;
    }
}

/// Why the watchdog stopped a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    TimedOut,
    Cancelled,
}

/// Bounds a batch in time and lets the caller cancel it.
///
/// The batch deadline starts when the watchdog is created and is never
/// reset between items.
#[derive(Debug, Clone)]
pub struct Watchdog {
    batch: Deadline,
    stream_limit: Duration,
    cancel: CancellationToken,
}

impl Watchdog {
    pub fn new(batch_limit: Duration, stream_limit: Duration, cancel: CancellationToken) -> Self {
        Self {
            batch: Deadline::after(batch_limit),
            stream_limit,
            cancel,
        }
    }

    /// Non-blocking check. Cancellation wins over expiry.
    pub fn check(&self) -> Option<Interrupt> {
        if self.cancel.is_cancelled() {
            Some(Interrupt::Cancelled)
        } else if self.batch.is_expired() {
            Some(Interrupt::TimedOut)
        } else {
            None
        }
    }

    /// Resolves when the batch is cancelled or its deadline passes.
    pub async fn interrupted(&self) -> Interrupt {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Interrupt::Cancelled,
            _ = self.batch.expired() => Interrupt::TimedOut,
        }
    }

    /// Fresh deadline for one streamed transfer.
    pub fn stream_deadline(&self) -> Deadline {
        Deadline::after(self.stream_limit)
    }

    /// Milliseconds since the batch started.
    pub fn elapsed_ms(&self) -> u64 {
        self.batch.elapsed_ms()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn deadline_expires_after_limit() {
        let deadline = Deadline::after(Duration::from_secs(5));
        assert!(!deadline.is_expired());

        tokio::time::advance(Duration::from_secs(4)).await;
        assert!(!deadline.is_expired());
        assert_eq!(deadline.elapsed_ms(), 4000);

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(deadline.is_expired());
        deadline.expired().await;
    }

    #[tokio::test(start_paused = true)]
    async fn unbounded_limits_never_expire() {
        let deadline = Deadline::after(Duration::MAX);
        tokio::time::advance(Duration::from_secs(86_400 * 365)).await;
        assert!(!deadline.is_expired());

        let watchdog = Watchdog::new(Duration::MAX, Duration::MAX, CancellationToken::new());
        assert_eq!(watchdog.check(), None);
        assert!(!watchdog.stream_deadline().is_expired());
    }

    #[tokio::test(start_paused = true)]
    async fn watchdog_reports_timeout() {
        let watchdog = Watchdog::new(
            Duration::from_secs(10),
            Duration::from_secs(60),
            CancellationToken::new(),
        );
        assert_eq!(watchdog.check(), None);

        assert_eq!(watchdog.interrupted().await, Interrupt::TimedOut);
        assert_eq!(watchdog.check(), Some(Interrupt::TimedOut));
        assert!(watchdog.elapsed_ms() >= 10_000);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_wins_over_expiry() {
        let cancel = CancellationToken::new();
        let watchdog = Watchdog::new(Duration::from_secs(1), Duration::from_secs(1), cancel.clone());

        tokio::time::advance(Duration::from_secs(2)).await;
        cancel.cancel();

        assert_eq!(watchdog.check(), Some(Interrupt::Cancelled));
        assert_eq!(watchdog.interrupted().await, Interrupt::Cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn stream_deadline_is_independent() {
        let watchdog = Watchdog::new(
            Duration::from_secs(300),
            Duration::from_secs(30),
            CancellationToken::new(),
        );
        tokio::time::advance(Duration::from_secs(100)).await;

        let stream = watchdog.stream_deadline();
        assert!(!stream.is_expired());
        tokio::time::advance(Duration::from_secs(30)).await;
        assert!(stream.is_expired());
        assert_eq!(watchdog.check(), None);
    }
}
