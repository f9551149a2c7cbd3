use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{debug, warn};

use crate::http::Fetcher;
use crate::listing::element_text;
use crate::text::{clean, normalize_whitespace, strip_label};

static ABSTRACT: Lazy<Selector> = Lazy::new(|| Selector::parse("blockquote.abstract").unwrap());
static SUBJECTS: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td.tablecell.subjects").unwrap());

/// Fields scraped from a paper's abstract page. Each is empty when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailInfo {
    pub abstract_text: String,
    pub subjects: String,
    pub pdf_url: String,
}

/// Parse raw abstract-page markup. See [`parse_detail`].
pub fn parse_detail_page(html: &str, abs_url: &str) -> DetailInfo {
    let document = Html::parse_document(html);
    parse_detail(&document, abs_url)
}

pub fn parse_detail(document: &Html, abs_url: &str) -> DetailInfo {
    let abstract_text = document
        .select(&ABSTRACT)
        .next()
        .map(|el| clean(strip_label(&normalize_whitespace(&element_text(el)), "Abstract:")))
        .unwrap_or_default();

    let subjects = document
        .select(&SUBJECTS)
        .next()
        .map(|el| clean(&normalize_whitespace(&element_text(el))))
        .unwrap_or_default();

    DetailInfo {
        abstract_text,
        subjects,
        pdf_url: derive_pdf_url(abs_url),
    }
}

/// `https://host/abs/<id>` → `https://host/pdf/<id>.pdf`, from the URL alone.
/// Returns an empty string when the URL has no `/abs/` segment.
pub fn derive_pdf_url(abs_url: &str) -> String {
    if !abs_url.contains("/abs/") {
        return String::new();
    }
    format!("{}.pdf", abs_url.replacen("/abs/", "/pdf/", 1))
}

/// Fetch and parse one abstract page. A failed fetch is logged and yields
/// [`DetailInfo::default()`]; it never aborts the caller.
pub async fn fetch_detail<F>(fetcher: &F, abs_url: &str) -> DetailInfo
where
    F: Fetcher + ?Sized,
{
    match fetcher.fetch(abs_url).await {
        Ok(body) => {
            debug!(url = %abs_url, bytes = body.len(), "fetched abstract page");
            parse_detail_page(&body, abs_url)
        }
        Err(err) => {
            warn!(url = %abs_url, error = %err, "abstract page fetch failed");
            DetailInfo::default()
        }
    }
}
