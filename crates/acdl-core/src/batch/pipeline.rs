//! One URL through validate → existence check → fetch → resolve → download.

use crate::config::AcdlConfig;
use crate::downloader::FileDownloader;
use crate::fetch::PageFetcher;
use crate::http::Transport;
use crate::resolver::DownloadLinkResolver;
use crate::url_model::{self, DomainRule, SourceUrl};

use super::outcome::{ItemOutcome, PipelineError, SkipReason};

pub(crate) struct Pipeline<'a> {
    cfg: &'a AcdlConfig,
    rule: DomainRule,
    fetcher: PageFetcher<'a>,
    resolver: &'a DownloadLinkResolver,
    downloader: FileDownloader<'a>,
}

impl<'a> Pipeline<'a> {
    pub(crate) fn new(
        cfg: &'a AcdlConfig,
        transport: &'a dyn Transport,
        resolver: &'a DownloadLinkResolver,
    ) -> Self {
        Self {
            cfg,
            rule: DomainRule::from_config(cfg),
            fetcher: PageFetcher::from_config(transport, cfg),
            resolver,
            downloader: FileDownloader::new(transport, &cfg.referer),
        }
    }

    pub(crate) fn run(&self, url: &str) -> ItemOutcome {
        match self.try_run(url) {
            Ok(outcome) => outcome,
            Err(e) => ItemOutcome::Failed(e),
        }
    }

    fn try_run(&self, url: &str) -> Result<ItemOutcome, PipelineError> {
        let source = SourceUrl::parse(url, &self.rule)?;
        let path = url_model::output_path(&source, self.cfg)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        if path.exists() {
            tracing::info!("{} already exists, skipping", name);
            return Ok(ItemOutcome::Skipped {
                path,
                reason: SkipReason::AlreadyExists,
            });
        }

        let page = self.fetcher.fetch(source.as_str())?;
        let target = self.resolver.resolve(&page)?;
        drop(page);
        let bytes = self.downloader.download(&target, &path)?;

        tracing::info!("Downloaded {}", name);
        Ok(ItemOutcome::Downloaded { path, bytes })
    }
}
