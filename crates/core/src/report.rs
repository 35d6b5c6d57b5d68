use serde::{Deserialize, Serialize};

use super::transaction::{sort_for_display, TransactionRecord};

/// An A-side record, the B-side candidate it was paired with, and the score of
/// that comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedPair {
    pub first: TransactionRecord,
    pub second: TransactionRecord,
    pub similarity: f64,
}

/// Result of one matcher run.
///
/// `matched` is deduplicated on the A-side record, so two identical rows in
/// batch A that each found a partner count once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconciliationOutcome {
    pub matched: Vec<MatchedPair>,
    pub first_unmatched: Vec<TransactionRecord>,
    pub second_unmatched: Vec<TransactionRecord>,
    /// A records that found a partner, before deduplication.
    pub first_batch_matched: usize,
    /// B records consumed by a pairing.
    pub second_batch_matched: usize,
}

impl ReconciliationOutcome {
    pub fn matched_records(&self) -> impl Iterator<Item = &TransactionRecord> {
        self.matched.iter().map(|p| &p.first)
    }

    pub fn matched_count(&self) -> usize {
        self.matched.len()
    }
}

/// How the report counts matched records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchCountMode {
    /// One number taken from the deduplicated A-side set.
    #[default]
    Combined,
    /// Additionally report independent counts for each batch.
    PerBatch,
}

/// Name and size of one uploaded batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchInfo {
    pub name: String,
    pub total: usize,
}

impl BatchInfo {
    pub fn new(name: impl Into<String>, total: usize) -> Self {
        Self {
            name: name.into(),
            total,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadReport {
    pub first_file_total_record_count: usize,
    pub first_file_unmatched_record_count: usize,
    pub first_file_unmatched_record_list: Vec<TransactionRecord>,
    pub first_file_name: String,
    pub second_file_total_record_count: usize,
    pub second_file_unmatched_record_count: usize,
    pub second_file_unmatched_record_list: Vec<TransactionRecord>,
    pub second_file_name: String,
    pub matched_record_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_file_matched_record_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub second_file_matched_record_count: Option<usize>,
}

impl UploadReport {
    pub fn summarize(
        first: BatchInfo,
        second: BatchInfo,
        outcome: ReconciliationOutcome,
        mode: MatchCountMode,
    ) -> Self {
        let matched_record_count = outcome.matched_count();
        let (first_matched, second_matched) = match mode {
            MatchCountMode::Combined => (None, None),
            MatchCountMode::PerBatch => (
                Some(outcome.first_batch_matched),
                Some(outcome.second_batch_matched),
            ),
        };

        UploadReport {
            first_file_total_record_count: first.total,
            first_file_unmatched_record_count: outcome.first_unmatched.len(),
            first_file_unmatched_record_list: outcome.first_unmatched,
            first_file_name: first.name,
            second_file_total_record_count: second.total,
            second_file_unmatched_record_count: outcome.second_unmatched.len(),
            second_file_unmatched_record_list: outcome.second_unmatched,
            second_file_name: second.name,
            matched_record_count,
            first_file_matched_record_count: first_matched,
            second_file_matched_record_count: second_matched,
        }
    }

    /// Orders both unmatched lists by transaction id for display.
    pub fn sorted_for_display(mut self) -> Self {
        sort_for_display(&mut self.first_file_unmatched_record_list);
        sort_for_display(&mut self.second_file_unmatched_record_list);
        self
    }
}
