//! jukebox-s3: HTTP adapter for the jukebox
//!
//! This crate implements the `ListingSource` trait from jukebox-core with plain,
//! unauthenticated HTTP requests. It is the only crate that performs network I/O.

pub mod client;

pub use client::HttpListingClient;
