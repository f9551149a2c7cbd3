use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// One enriched, filtered paper entry. Every field is plain text; a missing
/// value is an empty string, never absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperRecord {
    pub id: String,
    pub title: String,
    pub authors: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub subjects: String,
    pub abs_url: String,
    pub pdf_url: String,
    pub html_url: String,
    pub other_formats_url: String,
}

impl PaperRecord {
    /// Field values in the column order of `schema`.
    pub fn row(&self, schema: OutputSchema) -> Vec<&str> {
        let mut row = vec![
            self.id.as_str(),
            self.title.as_str(),
            self.authors.as_str(),
            self.abstract_text.as_str(),
            self.subjects.as_str(),
            self.abs_url.as_str(),
            self.pdf_url.as_str(),
        ];
        if schema == OutputSchema::Full {
            row.push(self.html_url.as_str());
            row.push(self.other_formats_url.as_str());
        }
        row
    }
}

/// Column layout of the exported table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputSchema {
    /// All nine columns, including the rendered-HTML and alternate-format links.
    #[default]
    Full,
    /// The seven-column layout without `html_url` and `other_formats_url`.
    Reduced,
}

const FULL_COLUMNS: &[&str] = &[
    "id",
    "title",
    "authors",
    "abstract",
    "subjects",
    "abs_url",
    "pdf_url",
    "html_url",
    "other_formats_url",
];

impl OutputSchema {
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            Self::Full => FULL_COLUMNS,
            Self::Reduced => &FULL_COLUMNS[..7],
        }
    }
}

impl fmt::Display for OutputSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => f.write_str("full"),
            Self::Reduced => f.write_str("reduced"),
        }
    }
}

impl FromStr for OutputSchema {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "reduced" => Ok(Self::Reduced),
            other => Err(CoreError::ConfigError(format!(
                "unknown output schema '{other}' (expected 'full' or 'reduced')"
            ))),
        }
    }
}
