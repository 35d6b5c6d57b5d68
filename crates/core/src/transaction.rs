use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// One parsed row of an uploaded batch.
///
/// Equality and hashing cover the eight business fields only. `source_label`,
/// `similarity_score` and `status` never take part, so the same transaction
/// read from two different files compares equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub transaction_id: String,
    pub transaction_type: String,
    pub description: String,
    pub narrative: String,
    /// Smallest currency unit.
    pub amount: i64,
    pub timestamp: NaiveDateTime,
    pub profile_name: String,
    pub wallet_reference: String,
    pub source_label: String,
    /// Score of the last comparison made for this record, if any.
    pub similarity_score: Option<f64>,
    pub status: Option<String>,
}

impl TransactionRecord {
    /// Returns a copy carrying the given comparison score.
    pub fn with_similarity(&self, score: f64) -> Self {
        Self {
            similarity_score: Some(score),
            ..self.clone()
        }
    }

    pub fn has_transaction_id(&self) -> bool {
        !self.transaction_id.is_empty()
    }
}

impl PartialEq for TransactionRecord {
    fn eq(&self, other: &Self) -> bool {
        self.transaction_id == other.transaction_id
            && self.transaction_type == other.transaction_type
            && self.description == other.description
            && self.narrative == other.narrative
            && self.amount == other.amount
            && self.timestamp == other.timestamp
            && self.profile_name == other.profile_name
            && self.wallet_reference == other.wallet_reference
    }
}

impl Eq for TransactionRecord {}

impl Hash for TransactionRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.transaction_id.hash(state);
        self.transaction_type.hash(state);
        self.description.hash(state);
        self.narrative.hash(state);
        self.amount.hash(state);
        self.timestamp.hash(state);
        self.profile_name.hash(state);
        self.wallet_reference.hash(state);
    }
}

/// Display ordering by transaction id. Records without an id sort last.
///
/// Equal ids compare `Equal`, so a stable sort keeps input position as the
/// final tie-break.
pub fn display_order(a: &TransactionRecord, b: &TransactionRecord) -> Ordering {
    match (a.has_transaction_id(), b.has_transaction_id()) {
        (true, true) => a.transaction_id.cmp(&b.transaction_id),
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => Ordering::Equal,
    }
}

pub fn sort_for_display(records: &mut [TransactionRecord]) {
    records.sort_by(display_order);
}
