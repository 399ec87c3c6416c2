//! HTTP GET transport.
//!
//! Pipeline components depend on the [`Transport`] trait only; the libcurl
//! implementation lives in [`CurlTransport`]. Tests substitute in-memory fakes.

mod easy;
mod status;

pub use easy::CurlTransport;

use std::collections::HashMap;
use std::io;

/// Error from a single GET request.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    /// Curl reported an error (DNS, connect, reset, too many redirects, ...).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// Final response had a non-2xx status.
    #[error("HTTP {0}")]
    Status(u32),
    /// The body sink failed (e.g. disk full). Transfer was aborted.
    #[error("write failed: {0}")]
    Sink(#[source] io::Error),
}

/// Callback receiving body chunks in arrival order.
pub type ChunkSink<'a> = dyn FnMut(&[u8]) -> io::Result<()> + 'a;

/// Blocking HTTP GET, following redirects, with caller-supplied headers.
pub trait Transport: Send + Sync {
    /// Stream the body of `url` into `sink`, one non-empty chunk at a time.
    /// Returns the number of body bytes delivered.
    fn get_streaming(
        &self,
        url: &str,
        headers: &HashMap<String, String>,
        sink: &mut ChunkSink<'_>,
    ) -> Result<u64, HttpError>;

    /// Fetch the whole body of `url` into memory.
    fn get(&self, url: &str, headers: &HashMap<String, String>) -> Result<Vec<u8>, HttpError> {
        let mut body = Vec::new();
        self.get_streaming(url, headers, &mut |chunk| {
            body.extend_from_slice(chunk);
            Ok(())
        })?;
        Ok(body)
    }
}

/// Headers sent with every request: just the fixed Referer.
pub fn referer_headers(referer: &str) -> HashMap<String, String> {
    let mut headers = HashMap::new();
    if !referer.is_empty() {
        headers.insert("Referer".to_string(), referer.to_string());
    }
    headers
}
