//! Pre-dispatch planning: detect inputs that would share an output file.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::config::AcdlConfig;
use crate::url_model::{self, DomainRule, SourceUrl};

use super::outcome::{ItemOutcome, PipelineError, SkipReason};

/// Unit of work handed to a worker.
#[derive(Debug)]
pub(crate) enum Job {
    /// Run the full pipeline for this URL.
    Run { index: usize, url: String },
    /// Outcome already known; no network activity.
    Settled {
        index: usize,
        url: String,
        outcome: ItemOutcome,
    },
}

impl Job {
    pub(crate) fn index(&self) -> usize {
        match self {
            Job::Run { index, .. } | Job::Settled { index, .. } => *index,
        }
    }

    pub(crate) fn url(&self) -> &str {
        match self {
            Job::Run { url, .. } | Job::Settled { url, .. } => url,
        }
    }
}

/// Builds jobs in input order. The first URL to claim an output path owns
/// it; an identical later URL is skipped, a different one fails with
/// `FilenameCollision`. Invalid URLs are left to the pipeline to report.
pub(crate) fn plan(urls: &[String], cfg: &AcdlConfig) -> Vec<Job> {
    let rule = DomainRule::from_config(cfg);
    let mut claimed: HashMap<PathBuf, &str> = HashMap::new();

    urls.iter()
        .enumerate()
        .map(|(index, url)| {
            let path = SourceUrl::parse(url, &rule)
                .ok()
                .and_then(|s| url_model::output_path(&s, cfg).ok());
            let Some(path) = path else {
                return Job::Run {
                    index,
                    url: url.clone(),
                };
            };
            match claimed.get(&path) {
                None => {
                    claimed.insert(path, url.as_str());
                    Job::Run {
                        index,
                        url: url.clone(),
                    }
                }
                Some(&first) if first == url => Job::Settled {
                    index,
                    url: url.clone(),
                    outcome: ItemOutcome::Skipped {
                        path,
                        reason: SkipReason::DuplicateInput,
                    },
                },
                Some(&first) => Job::Settled {
                    index,
                    url: url.clone(),
                    outcome: ItemOutcome::Failed(PipelineError::FilenameCollision {
                        path,
                        other: first.to_string(),
                    }),
                },
            }
        })
        .collect()
}
