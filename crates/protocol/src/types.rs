use std::fmt;

use serde::{Deserialize, Serialize};

/// Whether a transfer item is a single file or a whole directory tree.
///
/// The kind decides both the execution path (single-shot vs. streamed) and
/// the failure policy: files fail soft, directories fail hard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    File,
    Directory,
}

impl ItemKind {
    /// Parses the loosely-typed `type` field sent by browser clients.
    ///
    /// Accepts `file`, `directory`, `dir` and `folder`, ignoring case.
    pub fn from_type_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "file" => Some(Self::File),
            "directory" | "dir" | "folder" => Some(Self::Directory),
            _ => None,
        }
    }

    pub fn is_directory(self) -> bool {
        matches!(self, Self::Directory)
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Directory => write!(f, "directory"),
        }
    }
}

/// One source path queued for transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferItem {
    pub source_path: String,
    pub kind: ItemKind,
}

impl TransferItem {
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            source_path: path.into(),
            kind: ItemKind::File,
        }
    }

    pub fn directory(path: impl Into<String>) -> Self {
        Self {
            source_path: path.into(),
            kind: ItemKind::Directory,
        }
    }

    /// Last path component, used in status text.
    pub fn display_name(&self) -> &str {
        let trimmed = self.source_path.trim_end_matches(['/', '\\']);
        trimmed
            .rsplit(['/', '\\'])
            .next()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.source_path)
    }
}

/// An item as it arrives from a browser selection or drag payload.
///
/// Either `{"path": "...", "type": "file"}` or a bare path string.
/// Normalized into [`TransferItem`] once, at batch construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawEntry {
    Typed {
        path: String,
        #[serde(rename = "type")]
        kind: String,
    },
    Path(String),
}
