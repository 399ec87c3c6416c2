use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Retry policy parameters for page fetches.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of attempts per page (including the first).
    pub max_attempts: u32,
    /// Fixed delay in seconds between attempts.
    pub delay_secs: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            delay_secs: 5.0,
        }
    }
}

/// Everything the pipeline treats as a fixed value. `Default` reproduces the
/// stock behaviour; tests and library callers override individual fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AcdlConfig {
    /// Referer header sent with every request (some pages refuse requests without it).
    pub referer: String,
    /// Base URL the download identifier is appended to.
    pub download_base: String,
    /// Registrable domain label accepted for source pages.
    pub expected_domain: String,
    /// Public suffix accepted for source pages.
    pub expected_suffix: String,
    /// CSS selector of the anchor that carries the download link.
    pub anchor_selector: String,
    /// Attribute of that anchor holding the link.
    pub link_attribute: String,
    /// Transfer buffer size in bytes for streamed downloads.
    pub chunk_size: usize,
    /// Maximum characters taken from the URL basename for the output file.
    pub filename_max_chars: usize,
    /// Extension appended to the output file name (without the dot).
    pub filename_extension: String,
    /// Upper bound on worker threads (None = derived from available parallelism).
    pub max_workers: Option<usize>,
    /// Connect timeout in seconds (None = transport default).
    pub connect_timeout_secs: Option<u64>,
    /// Maximum HTTP redirects followed per request.
    pub max_redirects: u32,
    /// Directory output files are written to.
    pub output_dir: PathBuf,
    pub retry: RetryConfig,
}

impl Default for AcdlConfig {
    fn default() -> Self {
        Self {
            referer: "http://scholar.google.com".to_string(),
            download_base: "https://www.academia.edu/download".to_string(),
            expected_domain: "academia".to_string(),
            expected_suffix: "edu".to_string(),
            anchor_selector: "a.js-swp-download-button".to_string(),
            link_attribute: "href".to_string(),
            chunk_size: 8192,
            filename_max_chars: 250,
            filename_extension: "pdf".to_string(),
            max_workers: None,
            connect_timeout_secs: Some(30),
            max_redirects: 10,
            output_dir: PathBuf::from("."),
            retry: RetryConfig::default(),
        }
    }
}

impl AcdlConfig {
    /// Parse a (possibly partial) TOML document; missing keys keep their defaults.
    pub fn from_toml_str(data: &str) -> Result<Self> {
        let cfg: AcdlConfig = toml::from_str(data).context("invalid acdl config")?;
        Ok(cfg)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs_f64(self.retry.delay_secs.max(0.0))
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_secs.map(Duration::from_secs)
    }
}
