use std::collections::BTreeMap;

use serde::Serialize;

use crate::row::RejectReason;

/// Aggregate counters for one extraction run. Rejected rows are only ever
/// reported here, never individually.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionStats {
    pub pages_seen: usize,
    pub pages_before_start: usize,
    pub pages_without_text: usize,
    pub pages_without_tables: usize,
    pub summary_pages: usize,
    pub tables_seen: usize,
    pub tables_skipped: usize,
    pub rows_seen: usize,
    pub region_changes: usize,
    pub council_changes: usize,
    pub records_emitted: usize,
    pub duplicates_removed: usize,
    pub rejected: BTreeMap<RejectReason, usize>,
}

impl ExtractionStats {
    pub fn reject(&mut self, reason: RejectReason) {
        *self.rejected.entry(reason).or_insert(0) += 1;
    }

    pub fn rejected_total(&self) -> usize {
        self.rejected.values().sum()
    }

    /// Add another page's counters into this one.
    pub fn absorb(&mut self, other: &ExtractionStats) {
        self.pages_seen += other.pages_seen;
        self.pages_before_start += other.pages_before_start;
        self.pages_without_text += other.pages_without_text;
        self.pages_without_tables += other.pages_without_tables;
        self.summary_pages += other.summary_pages;
        self.tables_seen += other.tables_seen;
        self.tables_skipped += other.tables_skipped;
        self.rows_seen += other.rows_seen;
        self.region_changes += other.region_changes;
        self.council_changes += other.council_changes;
        self.records_emitted += other.records_emitted;
        self.duplicates_removed += other.duplicates_removed;
        for (reason, count) in &other.rejected {
            *self.rejected.entry(*reason).or_insert(0) += count;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absorb_sums_counters_and_reasons() {
        let mut a = ExtractionStats { pages_seen: 2, rows_seen: 10, ..Default::default() };
        a.reject(RejectReason::Blank);

        let mut b = ExtractionStats { pages_seen: 1, rows_seen: 4, ..Default::default() };
        b.reject(RejectReason::Blank);
        b.reject(RejectReason::Implausible);

        a.absorb(&b);
        assert_eq!(a.pages_seen, 3);
        assert_eq!(a.rows_seen, 14);
        assert_eq!(a.rejected[&RejectReason::Blank], 2);
        assert_eq!(a.rejected_total(), 3);
    }

    #[test]
    fn serializes_reasons_as_snake_case_keys() {
        let mut s = ExtractionStats::default();
        s.reject(RejectReason::TooFewNumbers);
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["rejected"]["too_few_numbers"], 1);
    }
}
