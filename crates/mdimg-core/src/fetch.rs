//! Single-attempt HTTP GET of an image into memory.
//!
//! Uses the curl crate (libcurl). Redirects are followed; success means the
//! final response is exactly `200 OK`. There is no retry.

use std::time::Duration;

/// Why one image fetch failed.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Curl reported an error (timeout, connection, DNS, invalid URL, ...).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// The final response status was not 200.
    #[error("HTTP {0}")]
    Http(u32),
}

impl FetchError {
    /// True when the request hit the configured timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Curl(e) if e.is_operation_timedout())
    }
}

/// Source of image bytes. The engine only needs "URL in, body or error out",
/// so tests can substitute canned responses.
pub trait Fetch {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

impl<T: Fetch + ?Sized> Fetch for &T {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        (**self).fetch(url)
    }
}

/// Blocking libcurl fetcher with a bounded per-request timeout.
#[derive(Debug, Clone, Copy)]
pub struct CurlFetcher {
    timeout: Duration,
}

impl CurlFetcher {
    pub const MAX_REDIRECTS: u32 = 10;

    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Fetch for CurlFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let mut body = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.follow_location(true)?;
        easy.max_redirections(Self::MAX_REDIRECTS)?;
        easy.timeout(self.timeout)?;

        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let code = easy.response_code()?;
        if code != 200 {
            return Err(FetchError::Http(code));
        }
        tracing::debug!(url, bytes = body.len(), "image fetched");
        Ok(body)
    }
}
