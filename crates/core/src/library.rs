//! Listing service with degraded-mode fallback
//!
//! `Library` joins a `ListingSource`, the parser and the bucket configuration. The
//! strict `try_*` calls report every failure; the plain calls never fail and instead
//! substitute the mock dataset, recording why in the returned `Origin`.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::bucket::BucketConfig;
use crate::error::{Error, Result};
use crate::listing::{FileEntry, Folder, ListingRequest, ParsedListing};
use crate::mock;
use crate::parser::parse_listing;
use crate::traits::ListingSource;

/// Where the items of a listing came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Origin {
    /// Parsed from a live listing response
    Live,
    /// Mock data because the bucket is unconfigured; nothing was fetched
    Preview,
    /// Mock data substituted after a caught failure
    Fallback {
        /// Message suitable for a dismissable banner
        reason: String,
    },
}

impl Origin {
    /// True for both mock variants
    pub fn is_mock(&self) -> bool {
        !matches!(self, Origin::Live)
    }
}

/// Items of one listing plus their origin
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Listing<T> {
    pub items: Vec<T>,
    pub origin: Origin,
}

impl<T> Listing<T> {
    /// The banner message, when the items are a fallback
    pub fn banner(&self) -> Option<&str> {
        match &self.origin {
            Origin::Fallback { reason } => Some(reason),
            _ => None,
        }
    }
}

/// Folder and file listings for one bucket
pub struct Library<S> {
    source: S,
    bucket: BucketConfig,
}

impl<S: ListingSource> Library<S> {
    /// Create a library over `source` for `bucket`
    pub fn new(source: S, bucket: BucketConfig) -> Self {
        if !bucket.is_configured() {
            info!("bucket is not configured, serving preview data");
        }
        Self { source, bucket }
    }

    /// The bucket this library lists
    pub fn bucket(&self) -> &BucketConfig {
        &self.bucket
    }

    /// False when serving preview data without fetching
    pub fn is_configured(&self) -> bool {
        self.bucket.is_configured()
    }

    /// Root folders; failures fall back to the mock folder set
    pub async fn list_folders(&self) -> Listing<Folder> {
        if !self.is_configured() {
            return Listing {
                items: mock::folders(),
                origin: Origin::Preview,
            };
        }

        match self.try_list_folders().await {
            Ok(items) => Listing {
                items,
                origin: Origin::Live,
            },
            Err(e) => {
                warn!(error = %e, "listing folders failed, using mock data");
                Listing {
                    items: mock::folders(),
                    origin: Origin::Fallback {
                        reason: format!("Error listing folders: {e}"),
                    },
                }
            }
        }
    }

    /// Files under `prefix`; failures fall back to mock files for that prefix
    pub async fn list_files(&self, prefix: &str) -> Listing<FileEntry> {
        if !self.is_configured() {
            return Listing {
                items: mock::files(prefix),
                origin: Origin::Preview,
            };
        }

        match self.try_list_files(prefix).await {
            Ok(items) => Listing {
                items,
                origin: Origin::Live,
            },
            Err(e) => {
                warn!(error = %e, prefix, "listing files failed, using mock data");
                Listing {
                    items: mock::files(prefix),
                    origin: Origin::Fallback {
                        reason: format!("Error listing files: {e}"),
                    },
                }
            }
        }
    }

    /// Root folders, reporting transport, parse and provider errors
    pub async fn try_list_folders(&self) -> Result<Vec<Folder>> {
        match self.fetch(&ListingRequest::folders()).await? {
            ParsedListing::Folders(folders) => Ok(folders),
            ParsedListing::Error(e) => Err(Error::Listing(e)),
            ParsedListing::Files(_) => Err(Error::General(
                "file listing returned for a folder request".into(),
            )),
        }
    }

    /// Files under `prefix`, reporting transport, parse and provider errors
    pub async fn try_list_files(&self, prefix: &str) -> Result<Vec<FileEntry>> {
        match self.fetch(&ListingRequest::files(prefix)).await? {
            ParsedListing::Files(files) => Ok(files),
            ParsedListing::Error(e) => Err(Error::Listing(e)),
            ParsedListing::Folders(_) => Err(Error::General(
                "folder listing returned for a file request".into(),
            )),
        }
    }

    async fn fetch(&self, request: &ListingRequest) -> Result<ParsedListing> {
        debug!(url = %self.bucket.listing_url(request), "fetching listing");
        let body = self.source.fetch_listing(request).await?;
        parse_listing(&body, request, &self.bucket)
    }
}
