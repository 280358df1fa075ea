//! jukebox-core: Core library for the jukebox S3 music browser
//!
//! This crate provides everything except the HTTP transport and the terminal:
//! - Bucket configuration and URL derivation
//! - The listing XML parser
//! - The fallback-aware `Library` and the `Navigator` model
//! - Configuration and profile management
//!
//! Network access goes through the `ListingSource` trait, so the whole crate can be
//! exercised without a live bucket.

pub mod bucket;
pub mod config;
pub mod error;
pub mod library;
pub mod listing;
pub mod mock;
pub mod navigation;
pub mod parser;
pub mod profile;
pub mod traits;
pub mod view;

pub use bucket::{BucketConfig, encode_key};
pub use config::{Config, ConfigManager};
pub use error::{Error, Result};
pub use library::{Library, Listing, Origin};
pub use listing::{
    FileEntry, Folder, ListingError, ListingKind, ListingRequest, ParsedListing, TransportError,
};
pub use navigation::{Command, FetchTicket, NavigationState, Navigator, Outcome, PlaybackRequest};
pub use parser::parse_listing;
pub use profile::{Profile, ProfileManager};
pub use traits::{AudioSink, ListingSource};
pub use view::{FileItem, FolderItem, format_file_size};
