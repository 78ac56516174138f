//! Terminal progress display.

use indicatif::{ProgressBar, ProgressStyle};
use shelfmove_batch_transfer::{Outcome, ProgressSink};

/// Progress bar on stderr driven by the batch executor.
pub struct TerminalSink {
    bar: ProgressBar,
}

impl TerminalSink {
    pub fn new() -> Self {
        let bar = ProgressBar::new(100);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos:>3}% {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▓░"),
        );
        bar.enable_steady_tick(std::time::Duration::from_millis(120));
        Self { bar }
    }
}

impl Default for TerminalSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for TerminalSink {
    fn set_status(&self, text: &str) {
        self.bar.set_message(text.to_string());
    }

    fn set_percent(&self, percent: u8) {
        self.bar.set_position(u64::from(percent.min(100)));
    }

    fn warn(&self, text: &str) {
        self.bar.println(format!("warning: {text}"));
    }

    fn on_terminal(&self, outcome: &Outcome) {
        if outcome.is_success() {
            self.bar.finish_with_message(outcome.summary());
        } else {
            self.bar.abandon_with_message(outcome.summary());
        }
    }
}
