use once_cell::sync::Lazy;
use regex::Regex;

// `\href{url}{label}`, matched lazily so adjacent occurrences stay separate.
static HREF_PAIR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\href\{.*?\}\{.*?\}").unwrap());

static HREF_EMPTY: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\href\{\}").unwrap());

/// Placeholder phrases listings substitute for stripped links.
const PLACEHOLDERS: &[&str] = &["this https URL", "{https URL}"];

/// Strip LaTeX link markup and link placeholders, then trim.
pub fn clean(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let text = HREF_PAIR.replace_all(text, "");
    let mut text = HREF_EMPTY.replace_all(&text, "").into_owned();
    for placeholder in PLACEHOLDERS {
        text = text.replace(placeholder, "");
    }
    text.trim().to_string()
}

/// Collapse runs of whitespace (including newlines) into single spaces.
pub(crate) fn normalize_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove a leading label such as `Title:` if present.
pub(crate) fn strip_label<'a>(text: &'a str, label: &str) -> &'a str {
    let text = text.trim();
    text.strip_prefix(label).unwrap_or(text).trim_start()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_every_href_fragment() {
        assert_eq!(
            clean(r"See \href{http://a.b}{here} and \href{x}{y} for code"),
            "See  and  for code"
        );
        assert_eq!(clean(r"start \href{}{} end"), "start  end");
    }

    #[test]
    fn removes_degenerate_href() {
        assert_eq!(clean(r"code at \href{} now"), "code at  now");
    }

    #[test]
    fn href_match_is_non_greedy() {
        // A greedy match would swallow the text between the two fragments.
        assert_eq!(clean(r"\href{a}{b}keep\href{c}{d}"), "keep");
    }

    #[test]
    fn removes_placeholders_and_trims() {
        assert_eq!(clean("this https URL appears"), "appears");
        assert_eq!(clean("  code: {https URL}  "), "code:");
        assert_eq!(
            clean("at this https URL and this https URL too"),
            "at  and  too"
        );
    }

    #[test]
    fn leaves_plain_text_verbatim() {
        assert_eq!(clean("Plain  text, with (parens)."), "Plain  text, with (parens).");
    }

    #[test]
    fn empty_input() {
        assert_eq!(clean(""), "");
        assert_eq!(clean("   "), "");
    }

    #[test]
    fn strip_label_only_at_start() {
        assert_eq!(strip_label("  Title: Foo", "Title:"), "Foo");
        assert_eq!(strip_label("Foo Title: Bar", "Title:"), "Foo Title: Bar");
    }
}
