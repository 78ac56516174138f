//! Progress frame grammar for streamed directory moves.
//!
//! ```text
//! progress:<integer>    per-item percentage, clamped to 0..=100
//! keepalive:<text>      liveness message, display only
//! done                  transfer finished
//! error:<message>       transfer failed
//! ```
//!
//! Frames are newline-delimited. Lines may also arrive in server-sent-event
//! form (`data: progress:10`); the `data:` prefix is stripped and SSE
//! comment lines are skipped.

use crate::constants::{FRAME_DONE, FRAME_ERROR, FRAME_KEEPALIVE, FRAME_PROGRESS};

/// A decoded frame from a streamed move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    Progress(u8),
    Keepalive(String),
    Done,
    Error(String),
}

impl StreamEvent {
    /// `Done` and `Error` end a stream; nothing after them is meaningful.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Error(_))
    }
}

/// A line that does not match the frame grammar.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    #[error("invalid progress value: {0:?}")]
    InvalidProgress(String),

    #[error("unrecognized frame: {0:?}")]
    Unrecognized(String),

    #[error("frame exceeds {limit} bytes without a newline")]
    LineTooLong { limit: usize },
}

/// Parses one line (without its `\n`) into a frame.
///
/// Returns `Ok(None)` for lines that carry no frame: blank separators and
/// SSE comments.
pub fn parse_frame(line: &str) -> Result<Option<StreamEvent>, FrameError> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    if line.trim().is_empty() || line.starts_with(':') {
        return Ok(None);
    }

    let line = match line.strip_prefix("data:") {
        Some(rest) => rest.strip_prefix(' ').unwrap_or(rest),
        None => line,
    };
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    if line == FRAME_DONE {
        return Ok(Some(StreamEvent::Done));
    }

    if let Some(value) = line.strip_prefix(FRAME_PROGRESS) {
        return parse_percent(value.trim())
            .map(|p| Some(StreamEvent::Progress(p)))
            .ok_or_else(|| FrameError::InvalidProgress(value.to_string()));
    }

    if let Some(text) = line.strip_prefix(FRAME_KEEPALIVE) {
        return Ok(Some(StreamEvent::Keepalive(text.trim().to_string())));
    }

    if let Some(message) = line.strip_prefix(FRAME_ERROR) {
        return Ok(Some(StreamEvent::Error(message.trim().to_string())));
    }

    Err(FrameError::Unrecognized(line.to_string()))
}

/// Parses an optionally signed integer and clamps it to 0..=100.
///
/// Integers too large for `i64` clamp by sign. Anything else is `None`.
fn parse_percent(value: &str) -> Option<u8> {
    let digits = value.strip_prefix(['+', '-']).unwrap_or(value);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let percent = match value.parse::<i64>() {
        Ok(n) => n.clamp(0, 100),
        Err(_) if value.starts_with('-') => 0,
        Err(_) => 100,
    };
    Some(percent as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_is_clamped() {
        assert_eq!(parse_frame("progress:42"), Ok(Some(StreamEvent::Progress(42))));
        assert_eq!(parse_frame("progress:250"), Ok(Some(StreamEvent::Progress(100))));
        assert_eq!(parse_frame("progress:-3"), Ok(Some(StreamEvent::Progress(0))));
        assert_eq!(parse_frame("progress:+64"), Ok(Some(StreamEvent::Progress(64))));
        assert_eq!(
            parse_frame("progress:99999999999999999999"),
            Ok(Some(StreamEvent::Progress(100)))
        );
        assert_eq!(
            parse_frame("progress:-99999999999999999999"),
            Ok(Some(StreamEvent::Progress(0)))
        );
    }

    #[test]
    fn non_integer_progress_is_malformed() {
        assert!(matches!(
            parse_frame("progress:ten"),
            Err(FrameError::InvalidProgress(_))
        ));
        assert!(matches!(
            parse_frame("progress:12.5"),
            Err(FrameError::InvalidProgress(_))
        ));
        for value in ["progress:", "progress:-", "progress:1e3", "progress:--4"] {
            assert!(
                matches!(parse_frame(value), Err(FrameError::InvalidProgress(_))),
                "{value}"
            );
        }
    }

    #[test]
    fn keepalive_and_error_carry_text() {
        assert_eq!(
            parse_frame("keepalive:still copying Saga 054.cbz"),
            Ok(Some(StreamEvent::Keepalive("still copying Saga 054.cbz".into())))
        );
        assert_eq!(
            parse_frame("error:disk full"),
            Ok(Some(StreamEvent::Error("disk full".into())))
        );
        assert_eq!(
            parse_frame("keepalive:"),
            Ok(Some(StreamEvent::Keepalive(String::new())))
        );
    }

    #[test]
    fn done_tolerates_crlf() {
        assert_eq!(parse_frame("done\r"), Ok(Some(StreamEvent::Done)));
    }

    #[test]
    fn sse_framing_is_unwrapped() {
        assert_eq!(parse_frame("data: progress:7"), Ok(Some(StreamEvent::Progress(7))));
        assert_eq!(parse_frame("data:done"), Ok(Some(StreamEvent::Done)));
        assert_eq!(parse_frame(": ping"), Ok(None));
        assert_eq!(parse_frame(""), Ok(None));
        assert_eq!(parse_frame("data:"), Ok(None));
    }

    #[test]
    fn unknown_tag_is_malformed() {
        assert_eq!(
            parse_frame("finished"),
            Err(FrameError::Unrecognized("finished".into()))
        );
        // Prefix match only: "done" must be the whole line.
        assert!(parse_frame("done!").is_err());
    }

    #[test]
    fn terminal_events() {
        assert!(StreamEvent::Done.is_terminal());
        assert!(StreamEvent::Error("x".into()).is_terminal());
        assert!(!StreamEvent::Progress(3).is_terminal());
    }
}
