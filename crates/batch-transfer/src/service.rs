//! Move Service trait.
//!
//! `MoveService` is the orchestrator's only view of the remote side.
//! The HTTP client implements it below; tests implement it with mocks.

use std::future::Future;
use std::pin::Pin;

use shelfmove_move_client::{Client, MoveStream};
use shelfmove_protocol::MoveResponse;

use crate::error::TransferError;

/// Boxed future returned by service calls.
pub type ServiceFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, TransferError>> + Send + 'a>>;

/// Body of a streamed move.
pub trait ByteStream: Send {
    /// Returns the next chunk of raw bytes, or `None` once the body closed.
    ///
    /// Chunk boundaries carry no meaning.
    fn next_chunk(&mut self) -> ServiceFuture<'_, Option<Vec<u8>>>;
}

/// Abstract connection to the Move Service.
pub trait MoveService: Send + Sync {
    /// Moves one item and waits for the JSON verdict.
    fn move_item(&self, source: &str, destination: &str) -> ServiceFuture<'_, MoveResponse>;

    /// Starts a streamed move and returns the open body.
    fn move_streamed(&self, source: &str, destination: &str) -> ServiceFuture<'_, Box<dyn ByteStream>>;

    /// Number of files below a directory.
    fn count_files(&self, path: &str) -> ServiceFuture<'_, u64>;

    /// Byte size of a directory. Display only.
    fn folder_size(&self, path: &str) -> ServiceFuture<'_, u64>;
}

impl ByteStream for MoveStream {
    fn next_chunk(&mut self) -> ServiceFuture<'_, Option<Vec<u8>>> {
        Box::pin(async move { Ok(MoveStream::next_chunk(self).await?) })
    }
}

impl MoveService for Client {
    fn move_item(&self, source: &str, destination: &str) -> ServiceFuture<'_, MoveResponse> {
        let (source, destination) = (source.to_string(), destination.to_string());
        Box::pin(async move { Ok(Client::move_item(self, &source, &destination).await?) })
    }

    fn move_streamed(&self, source: &str, destination: &str) -> ServiceFuture<'_, Box<dyn ByteStream>> {
        let (source, destination) = (source.to_string(), destination.to_string());
        Box::pin(async move {
            let stream = Client::move_streamed(self, &source, &destination).await?;
            Ok(Box::new(stream) as Box<dyn ByteStream>)
        })
    }

    fn count_files(&self, path: &str) -> ServiceFuture<'_, u64> {
        let path = path.to_string();
        Box::pin(async move { Ok(Client::count_files(self, &path).await?) })
    }

    fn folder_size(&self, path: &str) -> ServiceFuture<'_, u64> {
        let path = path.to_string();
        Box::pin(async move { Ok(Client::folder_size(self, &path).await?) })
    }
}
