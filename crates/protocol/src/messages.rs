use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Request payloads
// ---------------------------------------------------------------------------

/// Body of `POST /api/move`.
///
/// With `stream` set the service answers with newline-delimited progress
/// frames instead of a single JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    pub source: String,
    pub destination: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub stream: bool,
}

impl MoveRequest {
    pub fn single(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            stream: false,
        }
    }

    pub fn streamed(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            stream: true,
            ..Self::single(source, destination)
        }
    }
}

// ---------------------------------------------------------------------------
// Response payloads
// ---------------------------------------------------------------------------

/// Result of a single-shot move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MoveResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
        }
    }

    /// Failure text, falling back to a generic message when the service sent none.
    pub fn error_message(&self) -> &str {
        self.error.as_deref().unwrap_or("move rejected by service")
    }
}

/// Result of `GET /api/count-files`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountFilesResponse {
    pub file_count: u64,
}

/// Result of `GET /api/folder-size`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderSizeResponse {
    /// Size in bytes.
    pub size: u64,
}

fn is_false(v: &bool) -> bool {
    !*v
}
