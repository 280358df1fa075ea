//! ListingSource trait definition
//!
//! This trait is the seam between the listing logic and the HTTP transport.
//! It allows the Library and Navigator to be tested without any network access.

use async_trait::async_trait;

use crate::error::Result;
use crate::listing::ListingRequest;

/// Source of raw listing documents
///
/// Implemented by the HTTP adapter and mocked in tests. One call issues exactly one
/// request; retrying is left to the caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Fetch the XML body answering `request`
    ///
    /// Fails with `Error::Transport` when the HTTP layer reports a non-success status
    /// or no response arrives.
    async fn fetch_listing(&self, request: &ListingRequest) -> Result<String>;
}

/// External playback collaborator
///
/// The Navigator never plays audio; front ends implement this to hand a URL to
/// whatever actually produces sound.
#[async_trait]
pub trait AudioSink: Send {
    /// Start playing `url`, replacing whatever is currently playing
    async fn play(&mut self, url: &str, name: &str) -> Result<()>;
}
