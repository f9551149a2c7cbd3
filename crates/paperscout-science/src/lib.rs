//! Paperscout Science — arXiv listing scrape, detail enrichment, dedup.

pub mod assemble;
pub mod dedup;
pub mod detail;
pub mod error;
pub mod http;
pub mod listing;
pub mod pipeline;
pub mod rate_limit;
pub mod text;

pub use assemble::{assemble, is_includable};
pub use dedup::dedupe;
pub use detail::{DetailInfo, derive_pdf_url, fetch_detail, parse_detail, parse_detail_page};
pub use error::{Result, ScoutError};
pub use http::{Fetcher, HttpFetcher};
pub use listing::{ListingFragment, parse_listing, parse_listing_page};
pub use pipeline::{NoopObserver, Pipeline, PipelineObserver, RunOutcome};
pub use rate_limit::{FixedDelay, NoDelay, RateLimiter};
pub use text::clean;
