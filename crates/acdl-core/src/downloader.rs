//! Streaming file download.
//!
//! Writes the response body sequentially to the output file as chunks
//! arrive. No length, checksum or content-type verification. Nothing is
//! created until data arrives; a transfer that fails midway leaves whatever
//! was written in place.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::http::{referer_headers, HttpError, Transport};
use crate::resolver::DownloadTarget;

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("failed to create {}: {source}", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("download of {url} failed: {source}")]
    Transfer {
        url: String,
        #[source]
        source: HttpError,
    },
}

pub struct FileDownloader<'a> {
    transport: &'a dyn Transport,
    headers: HashMap<String, String>,
}

impl<'a> FileDownloader<'a> {
    pub fn new(transport: &'a dyn Transport, referer: &str) -> Self {
        Self {
            transport,
            headers: referer_headers(referer),
        }
    }

    /// Streams `target` into `path`. The file is created (or truncated) on the
    /// first body chunk, so a request that fails before any data arrives
    /// leaves no file behind. Returns bytes written.
    pub fn download(&self, target: &DownloadTarget, path: &Path) -> Result<u64, DownloadError> {
        let create_err = |source| DownloadError::Create {
            path: path.to_path_buf(),
            source,
        };
        let transfer_err = |source| DownloadError::Transfer {
            url: target.as_str().to_string(),
            source,
        };

        let mut file: Option<File> = None;
        let mut open_failure: Option<io::Error> = None;
        let result = self
            .transport
            .get_streaming(target.as_str(), &self.headers, &mut |chunk| {
                if chunk.is_empty() {
                    return Ok(());
                }
                if file.is_none() {
                    match File::create(path) {
                        Ok(f) => file = Some(f),
                        Err(e) => {
                            let kind = e.kind();
                            open_failure = Some(e);
                            return Err(io::Error::new(kind, "output file not created"));
                        }
                    }
                }
                match file.as_mut() {
                    Some(f) => f.write_all(chunk),
                    None => Ok(()),
                }
            });
        if let Some(source) = open_failure {
            return Err(create_err(source));
        }
        let written = result.map_err(transfer_err)?;

        // Empty body on success still produces the (empty) output file.
        let mut file = match file {
            Some(f) => f,
            None => File::create(path).map_err(create_err)?,
        };
        file.flush()
            .map_err(|e| transfer_err(HttpError::Sink(e)))?;

        tracing::debug!(path = %path.display(), bytes = written, "download complete");
        Ok(written)
    }
}
