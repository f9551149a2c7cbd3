use paperscout_core::PaperRecord;

use crate::detail::DetailInfo;
use crate::listing::ListingFragment;

/// Abstracts containing this (case-insensitively) point at an external host
/// instead of carrying the text itself.
const EXTERNAL_MARKER: &str = "available at";

/// Whether an abstract qualifies a record for output.
pub fn is_includable(abstract_text: &str) -> bool {
    !abstract_text.is_empty() && !abstract_text.to_lowercase().contains(EXTERNAL_MARKER)
}

/// Merge a listing fragment with its abstract-page data.
///
/// Listing fields supply identity, title, authors and links; the abstract
/// page supplies the abstract and subjects (falling back to the listing's
/// subjects) and a PDF link that wins over the listing's. Returns `None`
/// when the abstract fails [`is_includable`].
pub fn assemble(fragment: ListingFragment, detail: DetailInfo) -> Option<PaperRecord> {
    if !is_includable(&detail.abstract_text) {
        return None;
    }

    let subjects = prefer(detail.subjects, fragment.subjects);
    let pdf_url = prefer(detail.pdf_url, fragment.pdf_url);

    Some(PaperRecord {
        id: fragment.id,
        title: fragment.title,
        authors: fragment.authors,
        abstract_text: detail.abstract_text,
        subjects,
        abs_url: fragment.abs_url,
        pdf_url,
        html_url: fragment.html_url,
        other_formats_url: fragment.other_formats_url,
    })
}

fn prefer(primary: String, fallback: String) -> String {
    if primary.is_empty() { fallback } else { primary }
}
