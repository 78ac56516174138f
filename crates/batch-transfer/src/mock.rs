//! Scripted Move Service and recording sink shared by the crate's tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use shelfmove_protocol::MoveResponse;

use crate::error::TransferError;
use crate::service::{ByteStream, MoveService, ServiceFuture};
use crate::sink::ProgressSink;
use crate::types::Outcome;

/// Scripted result of a single-shot move.
#[derive(Debug, Clone)]
pub(crate) enum FileScript {
    Ok,
    /// `success: false` with this message.
    Reject(String),
    /// Transport-level failure.
    Fail(String),
    /// Advances the paused clock, then succeeds.
    Advance(Duration),
    /// Never resolves.
    Hang,
}

/// How a scripted stream ends once its chunks are used up.
#[derive(Debug, Clone)]
pub(crate) enum StreamEnd {
    Close,
    Hang,
    Fail(String),
}

/// Scripted result of a streamed move.
#[derive(Debug, Clone)]
pub(crate) enum StreamScript {
    Body { chunks: Vec<String>, end: StreamEnd },
    /// The service refuses to open the stream.
    Reject(String),
}

impl StreamScript {
    pub fn closing(chunks: &[&str]) -> Self {
        Self::Body {
            chunks: chunks.iter().map(|c| c.to_string()).collect(),
            end: StreamEnd::Close,
        }
    }

    pub fn hanging(chunks: &[&str]) -> Self {
        Self::Body {
            chunks: chunks.iter().map(|c| c.to_string()).collect(),
            end: StreamEnd::Hang,
        }
    }

    pub fn failing(chunks: &[&str], message: &str) -> Self {
        Self::Body {
            chunks: chunks.iter().map(|c| c.to_string()).collect(),
            end: StreamEnd::Fail(message.into()),
        }
    }
}

/// Byte stream replaying a fixed list of chunks.
pub(crate) struct ScriptedStream {
    chunks: VecDeque<Vec<u8>>,
    end: StreamEnd,
}

impl ScriptedStream {
    fn new(chunks: Vec<String>, end: StreamEnd) -> Self {
        Self {
            chunks: chunks.into_iter().map(String::into_bytes).collect(),
            end,
        }
    }

    pub fn closing(chunks: &[&str]) -> Self {
        Self::new(chunks.iter().map(|c| c.to_string()).collect(), StreamEnd::Close)
    }

    pub fn failing(chunks: &[&str], message: &str) -> Self {
        Self::new(
            chunks.iter().map(|c| c.to_string()).collect(),
            StreamEnd::Fail(message.into()),
        )
    }
}

impl ByteStream for ScriptedStream {
    fn next_chunk(&mut self) -> ServiceFuture<'_, Option<Vec<u8>>> {
        Box::pin(async move {
            if let Some(chunk) = self.chunks.pop_front() {
                return Ok(Some(chunk));
            }
            match &self.end {
                StreamEnd::Close => Ok(None),
                StreamEnd::Hang => std::future::pending().await,
                StreamEnd::Fail(message) => Err(TransferError::Service(message.clone())),
            }
        })
    }
}

/// Service call recorded by [`MockService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Move(String),
    Stream(String),
    Count(String),
    Size(String),
}

/// In-memory Move Service.
///
/// Files succeed and streams send `done` unless scripted otherwise.
#[derive(Default)]
pub(crate) struct MockService {
    files: HashMap<String, FileScript>,
    streams: HashMap<String, StreamScript>,
    counts: HashMap<String, Result<u64, String>>,
    sizes: HashMap<String, u64>,
    calls: Mutex<Vec<Call>>,
}

impl MockService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: &str, script: FileScript) -> Self {
        self.files.insert(path.into(), script);
        self
    }

    pub fn with_stream(mut self, path: &str, script: StreamScript) -> Self {
        self.streams.insert(path.into(), script);
        self
    }

    pub fn with_count(mut self, path: &str, count: u64) -> Self {
        self.counts.insert(path.into(), Ok(count));
        self
    }

    pub fn with_count_error(mut self, path: &str, message: &str) -> Self {
        self.counts.insert(path.into(), Err(message.into()));
        self
    }

    pub fn with_size(mut self, path: &str, bytes: u64) -> Self {
        self.sizes.insert(path.into(), bytes);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of move attempts (single-shot or streamed) for `path`.
    pub fn calls_for(&self, path: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Move(p) | Call::Stream(p) if p == path))
            .count()
    }

    pub fn count_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Count(_)))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl MoveService for MockService {
    fn move_item(&self, source: &str, _destination: &str) -> ServiceFuture<'_, MoveResponse> {
        self.record(Call::Move(source.into()));
        let script = self.files.get(source).cloned().unwrap_or(FileScript::Ok);
        Box::pin(async move {
            match script {
                FileScript::Ok => Ok(MoveResponse::ok()),
                FileScript::Reject(message) => Ok(MoveResponse::failed(message)),
                FileScript::Fail(message) => Err(TransferError::Service(message)),
                FileScript::Advance(by) => {
                    tokio::time::advance(by).await;
                    Ok(MoveResponse::ok())
                }
                FileScript::Hang => std::future::pending().await,
            }
        })
    }

    fn move_streamed(&self, source: &str, _destination: &str) -> ServiceFuture<'_, Box<dyn ByteStream>> {
        self.record(Call::Stream(source.into()));
        let script = self
            .streams
            .get(source)
            .cloned()
            .unwrap_or_else(|| StreamScript::closing(&["done\n"]));
        Box::pin(async move {
            match script {
                StreamScript::Body { chunks, end } => {
                    Ok(Box::new(ScriptedStream::new(chunks, end)) as Box<dyn ByteStream>)
                }
                StreamScript::Reject(message) => Err(TransferError::Service(message)),
            }
        })
    }

    fn count_files(&self, path: &str) -> ServiceFuture<'_, u64> {
        self.record(Call::Count(path.into()));
        let count = self.counts.get(path).cloned().unwrap_or(Ok(0));
        Box::pin(async move { count.map_err(TransferError::Service) })
    }

    fn folder_size(&self, path: &str) -> ServiceFuture<'_, u64> {
        self.record(Call::Size(path.into()));
        let size = self.sizes.get(path).copied();
        Box::pin(async move { size.ok_or_else(|| TransferError::Service("size unavailable".into())) })
    }
}

/// Sink that keeps everything it is told.
#[derive(Default)]
pub(crate) struct RecordingSink {
    statuses: Mutex<Vec<String>>,
    percents: Mutex<Vec<u8>>,
    units: Mutex<Vec<(u64, u64)>>,
    warnings: Mutex<Vec<String>>,
    outcomes: Mutex<Vec<Outcome>>,
}

impl RecordingSink {
    pub fn statuses(&self) -> Vec<String> {
        self.statuses.lock().unwrap().clone()
    }

    pub fn percents(&self) -> Vec<u8> {
        self.percents.lock().unwrap().clone()
    }

    pub fn units(&self) -> Vec<(u64, u64)> {
        self.units.lock().unwrap().clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().unwrap().clone()
    }

    pub fn outcomes(&self) -> Vec<Outcome> {
        self.outcomes.lock().unwrap().clone()
    }
}

impl ProgressSink for RecordingSink {
    fn set_status(&self, text: &str) {
        self.statuses.lock().unwrap().push(text.into());
    }

    fn set_percent(&self, percent: u8) {
        self.percents.lock().unwrap().push(percent);
    }

    fn warn(&self, text: &str) {
        self.warnings.lock().unwrap().push(text.into());
    }

    fn set_units(&self, completed: u64, total: u64) {
        self.units.lock().unwrap().push((completed, total));
    }

    fn on_terminal(&self, outcome: &Outcome) {
        self.outcomes.lock().unwrap().push(outcome.clone());
    }
}
