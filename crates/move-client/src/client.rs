//! Move Service client.
//!
//! Async HTTP client using `reqwest`. Single-shot calls carry a request
//! timeout; streamed moves do not, their lifetime is bounded by the caller.

use std::time::Duration;

use reqwest::Url;
use serde::de::DeserializeOwned;
use shelfmove_protocol::constants::{COUNT_FILES_ENDPOINT, FOLDER_SIZE_ENDPOINT, MOVE_ENDPOINT};
use shelfmove_protocol::{CountFilesResponse, FolderSizeResponse, MoveRequest, MoveResponse};
use tracing::debug;

/// Errors from the Move Service client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid service URL: {0}")]
    InvalidUrl(String),
}

/// Move Service API client.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    request_timeout: Duration,
}

impl Client {
    /// Creates a client for the service rooted at `base_url`.
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self, Error> {
        let parsed = Url::parse(base_url).map_err(|e| Error::InvalidUrl(format!("{base_url}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::InvalidUrl(format!(
                "{base_url}: unsupported scheme {}",
                parsed.scheme()
            )));
        }

        let http = reqwest::Client::builder().build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            request_timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Moves a single item and waits for the JSON verdict.
    ///
    /// A non-2xx reply whose body is still a `MoveResponse` is returned as
    /// that response, so the service's own error text reaches the caller.
    pub async fn move_item(&self, source: &str, destination: &str) -> Result<MoveResponse, Error> {
        let req = MoveRequest::single(source, destination);
        let resp = self
            .http
            .post(self.url(MOVE_ENDPOINT))
            .json(&req)
            .timeout(self.request_timeout)
            .send()
            .await?;
        let status = resp.status();
        let body = resp.bytes().await?;

        if !status.is_success() {
            if let Ok(parsed) = serde_json::from_slice::<MoveResponse>(&body) {
                return Ok(parsed);
            }
            return Err(Error::Api {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        Ok(serde_json::from_slice(&body)?)
    }

    /// Starts a streamed move and returns the open response body.
    ///
    /// The request is rejected outright (`Error::Api`) when the service
    /// answers with a non-2xx status.
    pub async fn move_streamed(&self, source: &str, destination: &str) -> Result<MoveStream, Error> {
        let req = MoveRequest::streamed(source, destination);
        let resp = self
            .http
            .post(self.url(MOVE_ENDPOINT))
            .json(&req)
            .send()
            .await?;
        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        debug!(source, destination, "move stream opened");
        Ok(MoveStream { response: resp })
    }

    /// Returns the number of files below `path`.
    pub async fn count_files(&self, path: &str) -> Result<u64, Error> {
        let resp: CountFilesResponse = self.get_json(COUNT_FILES_ENDPOINT, path).await?;
        Ok(resp.file_count)
    }

    /// Returns the total byte size of `path`.
    pub async fn folder_size(&self, path: &str) -> Result<u64, Error> {
        let resp: FolderSizeResponse = self.get_json(FOLDER_SIZE_ENDPOINT, path).await?;
        Ok(resp.size)
    }

    /// Performs a GET with a `path` query parameter and decodes the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str, path: &str) -> Result<T, Error> {
        let resp = self
            .http
            .get(self.url(endpoint))
            .query(&[("path", path)])
            .timeout(self.request_timeout)
            .send()
            .await?;
        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Body of a streamed move, read chunk by chunk.
///
/// Chunk boundaries are whatever the transport delivers; they are not
/// aligned to frames.
#[derive(Debug)]
pub struct MoveStream {
    response: reqwest::Response,
}

impl MoveStream {
    /// Returns the next chunk, or `None` once the service closed the body.
    pub async fn next_chunk(&mut self) -> Result<Option<Vec<u8>>, Error> {
        Ok(self.response.chunk().await?.map(|bytes| bytes.to_vec()))
    }
}
