//! `acdl <URL>...` – download every page's PDF.

use acdl_core::batch::{BatchReport, BatchRunner};
use acdl_core::config::AcdlConfig;
use anyhow::{Context, Result};

pub async fn run_download(urls: Vec<String>) -> Result<()> {
    let cfg = AcdlConfig::default();
    tracing::debug!("using config: {:?}", cfg);
    let runner = BatchRunner::new(cfg).context("failed to set up download link resolver")?;

    let report = tokio::task::spawn_blocking(move || runner.run(&urls))
        .await
        .context("batch task join")?;
    check_report(&report)
}

/// Ok when every item was downloaded or skipped; otherwise an error naming the failures.
pub(crate) fn check_report(report: &BatchReport) -> Result<()> {
    if report.is_success() {
        tracing::info!("{}", report);
        return Ok(());
    }
    let failed: Vec<&str> = report.failures().map(|i| i.url.as_str()).collect();
    let prefix = if report.aborted {
        "batch aborted after a fatal error"
    } else {
        "some downloads failed"
    };
    anyhow::bail!(
        "{}: {} ({} of {} URLs not downloaded: {})",
        prefix,
        report,
        failed.len(),
        report.items.len(),
        failed.join(", ")
    )
}
