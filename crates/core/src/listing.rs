//! Listing data model
//!
//! Folders and files are derived from one listing response and discarded on the
//! next navigation; nothing here is cached or mutated after construction.

use serde::{Deserialize, Serialize};

/// Delimiter used to group keys into folders
pub const FOLDER_DELIMITER: &str = "/";

/// Extension a key must end with to be listed as a playable file
pub const AUDIO_EXTENSION: &str = ".mp3";

/// Which kind of result a listing request asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingKind {
    /// Root listing grouped by delimiter, yields folders
    Folders,
    /// Flat listing under a prefix, yields files
    Files,
}

/// Query parameters for a single listing call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRequest {
    /// Key prefix (empty for the bucket root)
    pub prefix: String,

    /// Delimiter for grouping (set for folder listings only)
    pub delimiter: Option<String>,
}

impl ListingRequest {
    /// Root listing of folders (`?delimiter=/`)
    pub fn folders() -> Self {
        Self {
            prefix: String::new(),
            delimiter: Some(FOLDER_DELIMITER.to_string()),
        }
    }

    /// Listing of every object under a folder prefix (`?prefix=...`)
    pub fn files(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            delimiter: None,
        }
    }

    /// The kind of result this request produces
    pub fn kind(&self) -> ListingKind {
        if self.delimiter.is_some() {
            ListingKind::Folders
        } else {
            ListingKind::Files
        }
    }
}

/// A key prefix shown as a folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    /// Display name (currently the prefix verbatim)
    pub name: String,

    /// Full key prefix, including the trailing delimiter
    pub prefix: String,
}

impl Folder {
    /// Create a folder whose name is the prefix itself
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            name: prefix.clone(),
            prefix,
        }
    }
}

/// A playable object inside a folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Key with the folder prefix removed
    pub name: String,

    /// Full object key
    pub key: String,

    /// Public object URL, or `#` for mock entries
    pub url: String,

    /// Size in bytes, always greater than zero
    pub size: u64,

    /// Last modified timestamp, when the listing carried a parseable one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<jiff::Timestamp>,
}

/// Error document returned by the storage provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{code}: {message}")]
pub struct ListingError {
    /// Provider error code, e.g. `AccessDenied`
    pub code: String,

    /// Human-readable message
    pub message: String,
}

impl ListingError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Failure reported by the HTTP layer itself
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportError {
    /// HTTP status code, `None` when no response was received
    pub status: Option<u16>,

    /// Status text or the network failure description
    pub status_text: String,
}

impl TransportError {
    /// A non-success HTTP response
    pub fn http(status: u16, status_text: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            status_text: status_text.into(),
        }
    }

    /// A failure before any response arrived (DNS, connect, body read)
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            status: None,
            status_text: message.into(),
        }
    }
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(status) => write!(f, "HTTP {status}: {}", self.status_text),
            None => write!(f, "Network error: {}", self.status_text),
        }
    }
}

impl std::error::Error for TransportError {}

/// Parsed outcome of one listing document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedListing {
    /// The provider reported an error, no entries were read
    Error(ListingError),
    /// Folder listing result
    Folders(Vec<Folder>),
    /// File listing result
    Files(Vec<FileEntry>),
}
