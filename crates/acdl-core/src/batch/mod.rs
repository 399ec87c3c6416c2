//! Batch runner: every input URL through the pipeline on a bounded worker pool.
//!
//! Items are independent; the only shared state is the work queue and the
//! abort flag. A fatal item (invalid URL, page fetch retries exhausted) sets
//! the flag: items not yet started are reported as cancelled, items already
//! running finish. The full report is returned once all workers stop.

mod outcome;
mod pipeline;
mod plan;

pub use outcome::{BatchReport, ItemOutcome, ItemReport, PipelineError, SkipReason};

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex, PoisonError};

use crate::config::AcdlConfig;
use crate::http::{CurlTransport, Transport};
use crate::resolver::{DownloadLinkResolver, ResolveError};

use pipeline::Pipeline;
use plan::Job;

/// Hard cap on the default worker count.
const MAX_DEFAULT_WORKERS: usize = 32;

/// Number of worker threads for `items` inputs.
///
/// `cfg.max_workers` when set, else `min(32, available_parallelism + 4)`;
/// never more than the number of items and never less than one.
pub fn worker_count(cfg: &AcdlConfig, items: usize) -> usize {
    let cap = cfg.max_workers.unwrap_or_else(|| {
        let cpus = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        (cpus + 4).min(MAX_DEFAULT_WORKERS)
    });
    cap.min(items).max(1)
}

pub struct BatchRunner {
    cfg: Arc<AcdlConfig>,
    transport: Arc<dyn Transport>,
    resolver: Arc<DownloadLinkResolver>,
}

impl BatchRunner {
    /// Runner over the libcurl transport.
    pub fn new(cfg: AcdlConfig) -> Result<Self, ResolveError> {
        let transport = Arc::new(CurlTransport::from_config(&cfg));
        Self::with_transport(cfg, transport)
    }

    pub fn with_transport(
        cfg: AcdlConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ResolveError> {
        let resolver = DownloadLinkResolver::from_config(&cfg)?;
        Ok(Self {
            cfg: Arc::new(cfg),
            transport,
            resolver: Arc::new(resolver),
        })
    }

    /// Runs every URL and returns outcomes in input order. Blocks until all
    /// workers have stopped.
    pub fn run(&self, urls: &[String]) -> BatchReport {
        if urls.is_empty() {
            return BatchReport::default();
        }

        let jobs: VecDeque<Job> = plan::plan(urls, &self.cfg).into();
        let num_workers = worker_count(&self.cfg, jobs.len());
        tracing::debug!(items = urls.len(), workers = num_workers, "starting batch");

        let work = Arc::new(Mutex::new(jobs));
        let abort = Arc::new(AtomicBool::new(false));
        let (tx, rx) = mpsc::channel::<ItemReport>();

        let mut handles = Vec::with_capacity(num_workers);
        for _ in 0..num_workers {
            let work = Arc::clone(&work);
            let abort = Arc::clone(&abort);
            let tx = tx.clone();
            let cfg = Arc::clone(&self.cfg);
            let transport = Arc::clone(&self.transport);
            let resolver = Arc::clone(&self.resolver);
            handles.push(std::thread::spawn(move || {
                let pipeline = Pipeline::new(&cfg, transport.as_ref(), &resolver);
                loop {
                    let job = work
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .pop_front();
                    let Some(job) = job else { break };
                    let report = run_job(&pipeline, job, &abort);
                    if report.outcome.is_fatal() {
                        abort.store(true, Ordering::SeqCst);
                    }
                    if tx.send(report).is_err() {
                        break;
                    }
                }
            }));
        }
        drop(tx);

        let mut items: Vec<ItemReport> = rx.into_iter().collect();
        for h in handles {
            if h.join().is_err() {
                tracing::error!("batch worker panicked");
            }
        }

        // Items lost to a panicked worker are reported as cancelled.
        if items.len() < urls.len() {
            let mut seen = vec![false; urls.len()];
            for item in &items {
                seen[item.index] = true;
            }
            for (index, url) in urls.iter().enumerate() {
                if !seen[index] {
                    items.push(ItemReport {
                        index,
                        url: url.clone(),
                        outcome: ItemOutcome::Cancelled,
                    });
                }
            }
        }
        items.sort_by_key(|i| i.index);

        let report = BatchReport {
            items,
            aborted: abort.load(Ordering::SeqCst),
        };
        tracing::debug!("batch finished: {}", report);
        report
    }
}

fn run_job(pipeline: &Pipeline<'_>, job: Job, abort: &AtomicBool) -> ItemReport {
    let index = job.index();
    let url = job.url().to_string();
    if abort.load(Ordering::SeqCst) {
        tracing::debug!(url = %url, "batch aborted, not starting");
        return ItemReport {
            index,
            url,
            outcome: ItemOutcome::Cancelled,
        };
    }

    let outcome = match job {
        Job::Run { url, .. } => pipeline.run(&url),
        Job::Settled { outcome, .. } => {
            if let ItemOutcome::Skipped { path, .. } = &outcome {
                tracing::info!("{} is listed more than once, skipping", path.display());
            }
            outcome
        }
    };
    if let ItemOutcome::Failed(e) = &outcome {
        tracing::error!("{}: {}", url, e);
    }
    ItemReport {
        index,
        url,
        outcome,
    }
}
