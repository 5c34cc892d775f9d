use std::collections::HashSet;

use crate::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DedupeSummary {
    pub kept: usize,
    pub duplicates: usize,
    pub missing_id: usize,
}

/// Keeps the first record for every external id, in input order.
///
/// Records without an external id (empty or blank) are dropped: only records that can be
/// joined on the id make it into the output.
pub fn dedupe(records: &[Record]) -> Vec<Record> {
    dedupe_with_summary(records).0
}

pub fn dedupe_with_summary(records: &[Record]) -> (Vec<Record>, DedupeSummary) {
    let mut seen: HashSet<&str> = HashSet::with_capacity(records.len());
    let mut unique = Vec::with_capacity(records.len());
    let mut summary = DedupeSummary::default();

    for record in records {
        if !record.has_external_id() {
            summary.missing_id += 1;
            continue;
        }
        if seen.insert(record.external_id.as_str()) {
            unique.push(record.clone());
        } else {
            summary.duplicates += 1;
        }
    }

    summary.kept = unique.len();
    (unique, summary)
}
