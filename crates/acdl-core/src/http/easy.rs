//! libcurl (Easy handle) implementation of [`Transport`].

use std::cell::Cell;
use std::collections::HashMap;
use std::io;
use std::time::Duration;

use curl::easy::{Easy, List};

use super::status::{is_success, parse_status_line};
use super::{ChunkSink, HttpError, Transport};
use crate::config::AcdlConfig;

/// Blocking GET via one curl Easy handle per request.
#[derive(Debug, Clone)]
pub struct CurlTransport {
    /// Receive buffer size; bounds the size of each chunk handed to the sink.
    pub buffer_size: usize,
    pub max_redirects: u32,
    pub connect_timeout: Option<Duration>,
}

impl Default for CurlTransport {
    fn default() -> Self {
        Self::from_config(&AcdlConfig::default())
    }
}

impl CurlTransport {
    pub fn from_config(cfg: &AcdlConfig) -> Self {
        Self {
            buffer_size: cfg.chunk_size,
            max_redirects: cfg.max_redirects,
            connect_timeout: cfg.connect_timeout(),
        }
    }

    fn prepare(&self, url: &str, headers: &HashMap<String, String>) -> Result<Easy, HttpError> {
        let mut easy = Easy::new();
        easy.url(url)?;
        easy.get(true)?;
        easy.follow_location(true)?;
        easy.max_redirections(self.max_redirects)?;
        easy.buffer_size(self.buffer_size)?;
        if let Some(t) = self.connect_timeout {
            easy.connect_timeout(t)?;
        }

        let mut list = List::new();
        for (k, v) in headers {
            list.append(&format!("{}: {}", k.trim(), v.trim()))?;
        }
        if !headers.is_empty() {
            easy.http_headers(list)?;
        }
        Ok(easy)
    }
}

impl Transport for CurlTransport {
    fn get_streaming(
        &self,
        url: &str,
        headers: &HashMap<String, String>,
        sink: &mut ChunkSink<'_>,
    ) -> Result<u64, HttpError> {
        let mut easy = self.prepare(url, headers)?;

        // Last status line seen; redirects produce several, the final one wins.
        let status: Cell<Option<u32>> = Cell::new(None);
        let mut written = 0u64;
        let mut sink_error: Option<io::Error> = None;

        let performed = {
            let mut transfer = easy.transfer();
            transfer.header_function(|line| {
                if let Some(code) = parse_status_line(line) {
                    status.set(Some(code));
                }
                true
            })?;
            transfer.write_function(|data| {
                // Never write an error page into the sink.
                if let Some(code) = status.get() {
                    if !is_success(code) {
                        return Ok(0);
                    }
                }
                if data.is_empty() {
                    return Ok(0);
                }
                match sink(data) {
                    Ok(()) => {
                        written += data.len() as u64;
                        Ok(data.len())
                    }
                    Err(e) => {
                        sink_error = Some(e);
                        Ok(0) // abort transfer
                    }
                }
            })?;
            transfer.perform()
        };

        if let Some(e) = sink_error {
            return Err(HttpError::Sink(e));
        }
        if let Some(code) = status.get() {
            if !is_success(code) {
                return Err(HttpError::Status(code));
            }
        }
        performed?;

        let code = easy.response_code()?;
        if !is_success(code) {
            return Err(HttpError::Status(code));
        }
        Ok(written)
    }
}
