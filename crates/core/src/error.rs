//! Error types for jukebox-core
//!
//! Provides a unified error type that can be converted to appropriate exit codes.

use thiserror::Error;

use crate::listing::{ListingError, TransportError};

/// Result type alias for jukebox-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for jukebox-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Profile not found
    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The HTTP layer reported a failure before any listing was read
    #[error("{0}")]
    Transport(#[from] TransportError),

    /// The provider answered with an `<Error>` document
    #[error("{0}")]
    Listing(#[from] ListingError),

    /// The listing body was not well-formed XML
    #[error("Malformed listing XML: {0}")]
    Parse(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// General error
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Get the appropriate exit code for this error
    pub const fn exit_code(&self) -> i32 {
        match self {
            Error::Config(_) | Error::InvalidUrl(_) => 2, // UsageError
            Error::Transport(_) => 3,                     // NetworkError
            Error::NotFound(_) | Error::ProfileNotFound(_) => 5, // NotFound
            _ => 1,                                       // GeneralError
        }
    }
}
