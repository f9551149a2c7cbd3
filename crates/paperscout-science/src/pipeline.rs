//! Listing → abstract pages → records: the end-to-end scrape.

use std::path::Path;

use paperscout_core::{OutputSchema, PaperRecord, ScoutConfig, save_csv};
use tracing::{debug, info};

use crate::assemble::assemble;
use crate::dedup::dedupe;
use crate::detail::fetch_detail;
use crate::error::Result;
use crate::http::Fetcher;
use crate::listing::{ListingFragment, parse_listing_page};
use crate::rate_limit::RateLimiter;

/// How a completed run ended. A failed listing fetch is an `Err` instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// At least one record survived filtering and dedup.
    Emit(Vec<PaperRecord>),
    /// The run finished but nothing qualified.
    Empty,
}

impl RunOutcome {
    pub fn records(&self) -> &[PaperRecord] {
        match self {
            Self::Emit(records) => records,
            Self::Empty => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn into_records(self) -> Vec<PaperRecord> {
        match self {
            Self::Emit(records) => records,
            Self::Empty => Vec::new(),
        }
    }
}

/// Progress hooks. Every method defaults to a no-op.
pub trait PipelineObserver: Send + Sync {
    fn on_listing(&self, _candidates: usize) {}
    fn on_item(&self, _index: usize, _fragment: &ListingFragment) {}
    fn on_finish(&self, _kept: usize) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

// ─── Pipeline ─────────────────────────────────────────────────────────────────

pub struct Pipeline<F, L> {
    fetcher: F,
    limiter: L,
    listing_url: String,
    base_url: String,
    observer: Box<dyn PipelineObserver>,
}

impl<F: Fetcher, L: RateLimiter> Pipeline<F, L> {
    pub fn new(fetcher: F, limiter: L, listing_url: &str, base_url: &str) -> Self {
        Self {
            fetcher,
            limiter,
            listing_url: listing_url.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            observer: Box::new(NoopObserver),
        }
    }

    pub fn from_config(fetcher: F, limiter: L, config: &ScoutConfig) -> Self {
        Self::new(fetcher, limiter, &config.listing_url(), config.base_url())
    }

    pub fn with_observer(mut self, observer: impl PipelineObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    /// Run the scrape. Only a failed listing fetch returns `Err`; every
    /// per-item problem just drops that item.
    pub async fn run(&self) -> Result<RunOutcome> {
        info!(url = %self.listing_url, "fetching listing");
        let body = self.fetcher.fetch(&self.listing_url).await?;
        let fragments = parse_listing_page(&body, &self.base_url);
        info!(candidates = fragments.len(), "parsed listing");
        self.observer.on_listing(fragments.len());

        let mut collected = Vec::with_capacity(fragments.len());
        for (idx, fragment) in fragments.into_iter().enumerate() {
            self.observer.on_item(idx, &fragment);
            let detail = fetch_detail(&self.fetcher, &fragment.abs_url).await;
            self.limiter.pause().await;

            let id = fragment.id.clone();
            match assemble(fragment, detail) {
                Some(record) => collected.push(record),
                None => debug!(id = %id, "omitted: no usable abstract"),
            }
        }

        let assembled = collected.len();
        let records = dedupe(collected);
        info!(
            kept = records.len(),
            duplicates = assembled - records.len(),
            "collection finished"
        );
        self.observer.on_finish(records.len());

        if records.is_empty() {
            Ok(RunOutcome::Empty)
        } else {
            Ok(RunOutcome::Emit(records))
        }
    }

    /// [`run`](Self::run), then write the records as CSV to `path`. Nothing
    /// is written for [`RunOutcome::Empty`].
    pub async fn run_and_save(&self, path: &Path, schema: OutputSchema) -> Result<RunOutcome> {
        let outcome = self.run().await?;
        if let RunOutcome::Emit(records) = &outcome {
            save_csv(path, records, schema)?;
        }
        Ok(outcome)
    }
}
