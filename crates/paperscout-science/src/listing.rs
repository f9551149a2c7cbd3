use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use crate::text::{clean, normalize_whitespace, strip_label};

static DL: Lazy<Selector> = Lazy::new(|| Selector::parse("dl").unwrap());
static DT: Lazy<Selector> = Lazy::new(|| Selector::parse("dt").unwrap());
static DD: Lazy<Selector> = Lazy::new(|| Selector::parse("dd").unwrap());
static ABSTRACT_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"a[title="Abstract"][href]"#).unwrap());
static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());
static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("div.list-title").unwrap());
static AUTHORS: Lazy<Selector> = Lazy::new(|| Selector::parse("div.list-authors").unwrap());
static SUBJECTS: Lazy<Selector> = Lazy::new(|| Selector::parse("div.list-subjects").unwrap());

/// One listing entry before enrichment. Missing pieces are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingFragment {
    pub id: String,
    pub abs_url: String,
    pub title: String,
    pub authors: String,
    pub subjects: String,
    pub pdf_url: String,
    pub html_url: String,
    pub other_formats_url: String,
}

/// Parse raw listing markup. See [`parse_listing`].
pub fn parse_listing_page(html: &str, base_url: &str) -> Vec<ListingFragment> {
    let document = Html::parse_document(html);
    parse_listing(&document, base_url)
}

/// Pair the `<dt>`/`<dd>` nodes of the page's definition list into fragments.
///
/// Pairing is positional. When the two sequences differ in length only the
/// first `min(dt, dd)` pairs are used and the anomaly is logged. Rows without
/// an `Abstract` anchor (separators, announcements) are skipped silently.
pub fn parse_listing(document: &Html, base_url: &str) -> Vec<ListingFragment> {
    let Some(dl) = document.select(&DL).next() else {
        warn!("listing page has no <dl> container");
        return Vec::new();
    };

    let terms: Vec<ElementRef<'_>> = dl.select(&DT).collect();
    let descriptions: Vec<ElementRef<'_>> = dl.select(&DD).collect();
    if terms.len() != descriptions.len() {
        warn!(
            terms = terms.len(),
            descriptions = descriptions.len(),
            "listing term/description counts differ, pairing up to the shorter"
        );
    }

    terms
        .iter()
        .zip(descriptions.iter())
        .enumerate()
        .filter_map(|(idx, (dt, dd))| {
            let fragment = parse_pair(*dt, *dd, base_url);
            if fragment.is_none() {
                debug!(index = idx, "skipping listing row without identifier link");
            }
            fragment
        })
        .collect()
}

fn parse_pair(dt: ElementRef<'_>, dd: ElementRef<'_>, base_url: &str) -> Option<ListingFragment> {
    let abs_link = dt.select(&ABSTRACT_LINK).next()?;
    let href = abs_link.value().attr("href")?;

    let pdf_url = find_href(dt, |h| h.starts_with("/pdf/"))
        .map(|h| with_pdf_extension(absolutize(base_url, h)))
        .unwrap_or_default();
    let html_url = find_href(dt, |h| h.contains("html"))
        .map(|h| absolutize(base_url, h))
        .unwrap_or_default();
    let other_formats_url = find_href(dt, |h| h.contains("/format/"))
        .map(|h| absolutize(base_url, h))
        .unwrap_or_default();

    Some(ListingFragment {
        id: normalize_whitespace(&element_text(abs_link)),
        abs_url: absolutize(base_url, href),
        title: labelled_block(dd, &TITLE, "Title:"),
        authors: labelled_block(dd, &AUTHORS, "Authors:"),
        subjects: labelled_block(dd, &SUBJECTS, "Subjects:"),
        pdf_url,
        html_url,
        other_formats_url,
    })
}

fn labelled_block(dd: ElementRef<'_>, selector: &Selector, label: &str) -> String {
    dd.select(selector)
        .next()
        .map(|el| clean(strip_label(&normalize_whitespace(&element_text(el)), label)))
        .unwrap_or_default()
}

fn find_href<'a>(dt: ElementRef<'a>, pred: impl Fn(&str) -> bool) -> Option<&'a str> {
    dt.select(&ANCHOR)
        .filter_map(|a| a.value().attr("href"))
        .find(|&h| pred(h))
}

pub(crate) fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>()
}

/// Resolve `href` against `base_url`; absolute URLs pass through.
pub(crate) fn absolutize(base_url: &str, href: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if href.starts_with("http://") || href.starts_with("https://") {
        return href.to_string();
    }
    if href.starts_with("//") {
        return format!("https:{href}");
    }
    if href.starts_with('/') {
        return format!("{base}{href}");
    }
    format!("{base}/{href}")
}

fn with_pdf_extension(url: String) -> String {
    if url.ends_with(".pdf") {
        url
    } else {
        url + ".pdf"
    }
}
