//! Progress stream decoder.
//!
//! [`FrameDecoder`] turns arbitrarily-split byte chunks into frames.
//! [`EventStream`] drives it from a [`ByteStream`], pulling chunks only
//! when no buffered frame is left.

use shelfmove_protocol::constants::MAX_FRAME_LEN;
use shelfmove_protocol::{FrameError, StreamEvent, parse_frame};
use tracing::trace;

use crate::error::TransferError;
use crate::service::ByteStream;

/// Incremental, single-pass frame decoder.
///
/// Bytes after the last newline stay buffered until more data arrives or
/// the stream is closed, up to [`MAX_FRAME_LEN`] bytes. After a terminal
/// frame (or a malformed one) the decoder yields nothing further.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buf: Vec<u8>,
    /// Prefix of `buf` already known to hold no newline.
    scanned: usize,
    closed: bool,
    finished: bool,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a chunk read from the stream.
    pub fn push(&mut self, chunk: &[u8]) {
        if !self.closed && !self.finished {
            self.buf.extend_from_slice(chunk);
        }
    }

    /// Marks end of stream. A trailing line without `\n` is still decoded.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if !self.buf.is_empty() {
            self.buf.push(b'\n');
        }
    }

    /// Whether the decoder has produced its last frame.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Returns the next complete frame, if one is buffered.
    ///
    /// Once the stream is closed and the buffer drained, yields a single
    /// implicit [`StreamEvent::Done`].
    pub fn next_frame(&mut self) -> Option<Result<StreamEvent, FrameError>> {
        if self.finished {
            return None;
        }

        while let Some(offset) = self.buf[self.scanned..].iter().position(|&b| b == b'\n') {
            let pos = self.scanned + offset;
            self.scanned = 0;
            if pos > MAX_FRAME_LEN {
                return Some(Err(self.too_long()));
            }

            let line: Vec<u8> = self.buf.drain(..=pos).collect();
            let text = String::from_utf8_lossy(&line[..line.len() - 1]);

            match parse_frame(&text) {
                Ok(None) => continue,
                Ok(Some(event)) => {
                    trace!(?event, "frame");
                    if event.is_terminal() {
                        self.finish();
                    }
                    return Some(Ok(event));
                }
                Err(e) => {
                    self.finish();
                    return Some(Err(e));
                }
            }
        }
        self.scanned = self.buf.len();

        if self.buf.len() > MAX_FRAME_LEN {
            return Some(Err(self.too_long()));
        }

        if self.closed {
            self.finish();
            return Some(Ok(StreamEvent::Done));
        }

        None
    }

    fn too_long(&mut self) -> FrameError {
        self.finish();
        FrameError::LineTooLong {
            limit: MAX_FRAME_LEN,
        }
    }

    fn finish(&mut self) {
        self.finished = true;
        self.scanned = 0;
        self.buf.clear();
    }
}

/// Lazy, finite sequence of [`StreamEvent`]s read from a streamed move.
///
/// Not restartable. One `EventStream` owns its byte stream, so two decoders
/// can never read the same body.
pub struct EventStream {
    source: Box<dyn ByteStream>,
    decoder: FrameDecoder,
}

impl EventStream {
    pub fn new(source: Box<dyn ByteStream>) -> Self {
        Self {
            source,
            decoder: FrameDecoder::new(),
        }
    }

    /// Next event, or `None` after the terminal one.
    ///
    /// Transport errors and malformed frames are returned as errors.
    /// Dropping the returned future between chunks loses no data.
    pub async fn next_event(&mut self) -> Result<Option<StreamEvent>, TransferError> {
        loop {
            if let Some(frame) = self.decoder.next_frame() {
                return Ok(Some(frame?));
            }
            if self.decoder.is_finished() {
                return Ok(None);
            }

            match self.source.next_chunk().await? {
                Some(chunk) => self.decoder.push(&chunk),
                None => self.decoder.close(),
            }
        }
    }
}
