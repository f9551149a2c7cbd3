use std::collections::HashSet;

use paperscout_core::PaperRecord;

/// Keep the first record for each distinct title, preserving input order.
pub fn dedupe(records: Vec<PaperRecord>) -> Vec<PaperRecord> {
    let mut seen: HashSet<String> = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|record| seen.insert(record.title.clone()))
        .collect()
}
