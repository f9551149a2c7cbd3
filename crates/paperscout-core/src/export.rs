//! Tabular persistence: header row plus one row per record.

use std::io::Write;
use std::path::Path;

use crate::error::{CoreError, Result};
use crate::models::{OutputSchema, PaperRecord};

/// Write `records` as CSV to `writer`. The header is `schema.columns()`.
pub fn write_csv<W: Write>(writer: W, records: &[PaperRecord], schema: OutputSchema) -> Result<()> {
    if records.is_empty() {
        return Err(CoreError::EmptyExport);
    }

    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(schema.columns())?;
    for record in records {
        wtr.write_record(record.row(schema))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write `records` to the file at `path`, creating parent directories.
pub fn save_csv(path: &Path, records: &[PaperRecord], schema: OutputSchema) -> Result<()> {
    if records.is_empty() {
        return Err(CoreError::EmptyExport);
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    write_csv(file, records, schema)?;
    tracing::info!(path = %path.display(), rows = records.len(), "saved CSV");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(id: &str, title: &str, abstract_text: &str) -> PaperRecord {
        PaperRecord {
            id: id.to_string(),
            title: title.to_string(),
            authors: "Ada Lovelace, Charles Babbage".to_string(),
            abstract_text: abstract_text.to_string(),
            subjects: "Cryptography and Security (cs.CR)".to_string(),
            abs_url: format!("https://arxiv.org/abs/{id}"),
            pdf_url: format!("https://arxiv.org/pdf/{id}.pdf"),
            html_url: String::new(),
            other_formats_url: format!("https://arxiv.org/format/{id}"),
        }
    }

    #[test]
    fn test_full_schema_header_and_rows() {
        let mut out = Vec::new();
        write_csv(&mut out, &[record("1", "One", "First.")], OutputSchema::Full).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("id,title,authors,abstract,subjects,abs_url,pdf_url,html_url,other_formats_url")
        );
        assert_eq!(
            lines.next(),
            Some(
                "1,One,\"Ada Lovelace, Charles Babbage\",First.,Cryptography and Security (cs.CR),\
                 https://arxiv.org/abs/1,https://arxiv.org/pdf/1.pdf,,https://arxiv.org/format/1"
            )
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_reduced_schema_drops_link_columns() {
        let mut out = Vec::new();
        write_csv(&mut out, &[record("1", "One", "First.")], OutputSchema::Reduced).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("id,title,authors,abstract,subjects,abs_url,pdf_url\n"));
        assert!(!text.contains("format"));
    }

    #[test]
    fn test_quotes_and_newlines_are_escaped() {
        let mut out = Vec::new();
        let rec = record("1", "Say \"hi\"", "line one\nline two");
        write_csv(&mut out, &[rec], OutputSchema::Reduced).unwrap();

        let mut rdr = csv::Reader::from_reader(out.as_slice());
        let row = rdr.records().next().unwrap().unwrap();
        assert_eq!(&row[1], "Say \"hi\"");
        assert_eq!(&row[3], "line one\nline two");
    }

    #[test]
    fn test_empty_set_is_refused() {
        let mut out = Vec::new();
        assert!(matches!(
            write_csv(&mut out, &[], OutputSchema::Full),
            Err(CoreError::EmptyExport)
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn test_save_csv_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("papers.csv");
        let records = vec![record("1", "One", "First."), record("2", "Two", "Second.")];

        save_csv(&path, &records, OutputSchema::Full).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 3);
    }
}
