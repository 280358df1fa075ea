//! Bucket configuration and URL derivation
//!
//! A `BucketConfig` is built once per session and handed to every component that
//! needs to talk to the bucket. All listing and object URLs are derived from it.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::listing::{FOLDER_DELIMITER, ListingKind, ListingRequest};

/// Bucket name that marks an unconfigured session
pub const PLACEHOLDER_BUCKET: &str = "your-bucket-name-here";

/// Region that marks an unconfigured session
pub const PLACEHOLDER_REGION: &str = "your-region-here";

/// Location of a public bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketConfig {
    /// Bucket name
    pub bucket_name: String,

    /// AWS region, e.g. `us-east-1`
    pub region: String,

    /// Custom endpoint for S3-compatible stores (path-style addressing)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

impl BucketConfig {
    /// Create a config addressing the AWS virtual-hosted endpoint
    pub fn new(bucket_name: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            region: region.into(),
            endpoint: None,
        }
    }

    /// The unset default, which activates preview mode
    pub fn placeholder() -> Self {
        Self::new(PLACEHOLDER_BUCKET, PLACEHOLDER_REGION)
    }

    /// Use a custom endpoint instead of `{bucket}.s3.{region}.amazonaws.com`
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// False when either field still holds its placeholder value
    pub fn is_configured(&self) -> bool {
        self.bucket_name != PLACEHOLDER_BUCKET && self.region != PLACEHOLDER_REGION
    }

    /// Check that the config can produce URLs
    pub fn validate(&self) -> Result<()> {
        if self.bucket_name.is_empty() {
            return Err(Error::Config("Bucket name cannot be empty".into()));
        }
        if self.region.is_empty() {
            return Err(Error::Config("Region cannot be empty".into()));
        }
        if let Some(endpoint) = &self.endpoint {
            let parsed = url::Url::parse(endpoint)?;
            if parsed.scheme() != "http" && parsed.scheme() != "https" {
                return Err(Error::Config(format!(
                    "Endpoint must use http or https: {endpoint}"
                )));
            }
        }
        Ok(())
    }

    /// Base URL of the bucket, without a trailing slash
    pub fn base_url(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => format!("{}/{}", endpoint.trim_end_matches('/'), self.bucket_name),
            None => format!(
                "https://{}.s3.{}.amazonaws.com",
                self.bucket_name, self.region
            ),
        }
    }

    /// URL of the listing call for `request`
    ///
    /// Folder listings produce `/?delimiter=/`, file listings `/?prefix={encoded}`.
    pub fn listing_url(&self, request: &ListingRequest) -> String {
        let mut query = Vec::new();

        if request.kind() == ListingKind::Files || !request.prefix.is_empty() {
            query.push(format!("prefix={}", urlencoding::encode(&request.prefix)));
        }

        if let Some(delimiter) = &request.delimiter {
            let encoded = urlencoding::encode(delimiter).replace("%2F", FOLDER_DELIMITER);
            query.push(format!("delimiter={encoded}"));
        }

        format!("{}/?{}", self.base_url(), query.join("&"))
    }

    /// Public URL of the object stored under `key`
    pub fn object_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url(), encode_key(key))
    }
}

impl Default for BucketConfig {
    fn default() -> Self {
        Self::placeholder()
    }
}

/// Percent-encode each `/`-separated segment of `key` independently
///
/// Separators survive untouched while anything special inside a segment is escaped,
/// so `My Mixes/Track One.mp3` becomes `My%20Mixes/Track%20One.mp3`.
pub fn encode_key(key: &str) -> String {
    key.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
