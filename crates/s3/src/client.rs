//! HTTP listing client
//!
//! Issues unauthenticated GET requests against the S3 REST API and implements the
//! `ListingSource` trait from jukebox-core. No credentials, signing, retries or
//! timeouts: one call is one request.

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::debug;

use jukebox_core::{BucketConfig, Error, ListingRequest, ListingSource, Result, TransportError};

/// Listing and download client for one public bucket
#[derive(Debug, Clone)]
pub struct HttpListingClient {
    http: Client,
    bucket: BucketConfig,
}

impl HttpListingClient {
    /// Create a client for `bucket`
    pub fn new(bucket: BucketConfig) -> Result<Self> {
        bucket.validate()?;

        let http = Client::builder()
            .user_agent(concat!("jukebox/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { http, bucket })
    }

    /// The bucket this client talks to
    pub fn bucket(&self) -> &BucketConfig {
        &self.bucket
    }

    /// Stream the object at `url` into `dest`
    ///
    /// `on_progress` receives the bytes written so far and the total when the server
    /// sent a Content-Length. Returns the number of bytes written.
    pub async fn download<W, F>(&self, url: &str, dest: &mut W, mut on_progress: F) -> Result<u64>
    where
        W: AsyncWrite + Unpin,
        F: FnMut(u64, Option<u64>),
    {
        debug!(%url, "GET object");
        let response = self.send(url).await?;
        let total = response.content_length();

        let mut written = 0u64;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| network(e.to_string()))?;
            dest.write_all(&chunk).await?;
            written += chunk.len() as u64;
            on_progress(written, total);
        }
        dest.flush().await?;

        Ok(written)
    }

    async fn send(&self, url: &str) -> Result<reqwest::Response> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Transport(TransportError::http(
                status.as_u16(),
                status.canonical_reason().unwrap_or_default(),
            )));
        }

        Ok(response)
    }
}

#[async_trait]
impl ListingSource for HttpListingClient {
    async fn fetch_listing(&self, request: &ListingRequest) -> Result<String> {
        let url = self.bucket.listing_url(request);
        debug!(%url, "GET listing");

        let response = self.send(&url).await?;
        response.text().await.map_err(|e| network(e.to_string()))
    }
}

fn network(message: String) -> Error {
    Error::Transport(TransportError::network(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response and return the endpoint plus the request line
    async fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/xml\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();

            let request = String::from_utf8_lossy(&request).into_owned();
            request.lines().next().unwrap_or_default().to_string()
        });

        (endpoint, handle)
    }

    fn client(endpoint: &str) -> HttpListingClient {
        HttpListingClient::new(BucketConfig::new("mixes", "us-east-1").with_endpoint(endpoint))
            .unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_bucket() {
        assert!(HttpListingClient::new(BucketConfig::new("", "us-east-1")).is_err());
    }

    #[tokio::test]
    async fn test_fetch_folder_listing() {
        let body = "<ListBucketResult><CommonPrefixes><Prefix>Rock/</Prefix></CommonPrefixes></ListBucketResult>";
        let (endpoint, server) = serve_once("200 OK", body).await;

        let xml = client(&endpoint)
            .fetch_listing(&ListingRequest::folders())
            .await
            .unwrap();
        assert_eq!(xml, body);
        assert_eq!(server.await.unwrap(), "GET /mixes/?delimiter=/ HTTP/1.1");
    }

    #[tokio::test]
    async fn test_fetch_file_listing_encodes_prefix() {
        let (endpoint, server) = serve_once("200 OK", "<ListBucketResult/>").await;

        client(&endpoint)
            .fetch_listing(&ListingRequest::files("My Mixes/"))
            .await
            .unwrap();
        assert_eq!(
            server.await.unwrap(),
            "GET /mixes/?prefix=My%20Mixes%2F HTTP/1.1"
        );
    }

    #[tokio::test]
    async fn test_non_success_status_is_transport_error() {
        let body = "<Error><Code>AccessDenied</Code><Message>Access Denied</Message></Error>";
        let (endpoint, _server) = serve_once("403 Forbidden", body).await;

        let err = client(&endpoint)
            .fetch_listing(&ListingRequest::folders())
            .await
            .unwrap_err();
        match err {
            Error::Transport(t) => {
                assert_eq!(t.status, Some(403));
                assert_eq!(t.status_text, "Forbidden");
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let err = client(&endpoint)
            .fetch_listing(&ListingRequest::folders())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Transport(TransportError { status: None, .. })));
    }

    #[tokio::test]
    async fn test_download_reports_progress() {
        let (endpoint, server) = serve_once("200 OK", "ID3-fake-mp3-bytes").await;
        let client = client(&endpoint);
        let url = client.bucket().object_url("Rock/Song One.mp3");

        let mut out = Vec::new();
        let mut last = (0, None);
        let written = client
            .download(&url, &mut out, |done, total| last = (done, total))
            .await
            .unwrap();

        assert_eq!(written, 18);
        assert_eq!(out, b"ID3-fake-mp3-bytes");
        assert_eq!(last, (18, Some(18)));
        assert_eq!(
            server.await.unwrap(),
            "GET /mixes/Rock/Song%20One.mp3 HTTP/1.1"
        );
    }
}
