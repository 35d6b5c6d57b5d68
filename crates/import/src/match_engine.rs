use recon_core::{MatchedPair, ReconciliationOutcome, TransactionRecord};
use std::collections::{HashMap, HashSet};

use crate::similarity::similarity;

pub const DEFAULT_THRESHOLD: f64 = 90.0;

/// Records of one batch grouped by transaction id. Keys keep first-seen order
/// and each bucket keeps row order.
struct Buckets<'a> {
    order: Vec<&'a str>,
    groups: HashMap<&'a str, Vec<&'a TransactionRecord>>,
}

impl<'a> Buckets<'a> {
    fn group(records: &'a [TransactionRecord]) -> Self {
        let mut order = Vec::new();
        let mut groups: HashMap<&'a str, Vec<&'a TransactionRecord>> = HashMap::new();

        for record in records {
            let key = record.transaction_id.as_str();
            groups
                .entry(key)
                .or_insert_with(|| {
                    order.push(key);
                    Vec::new()
                })
                .push(record);
        }

        Self { order, groups }
    }
}

/// Greedy first-fit matcher over transaction-id buckets.
///
/// Within a bucket the first A record gets first pick among the B candidates,
/// in row order, and a consumed candidate is never offered again. A pair
/// matches when its score is strictly above `threshold`.
pub struct MatchEngine {
    pub threshold: f64,
}

impl Default for MatchEngine {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl MatchEngine {
    pub fn with_threshold(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn reconcile(
        &self,
        first: &[TransactionRecord],
        second: &[TransactionRecord],
    ) -> ReconciliationOutcome {
        let first_buckets = Buckets::group(first);
        let mut second_buckets = Buckets::group(second);

        let mut outcome = ReconciliationOutcome::default();
        let mut matched_seen: HashSet<&TransactionRecord> = HashSet::new();

        for key in &first_buckets.order {
            let records = &first_buckets.groups[key];

            let Some(mut candidates) = second_buckets.groups.remove(key) else {
                outcome
                    .first_unmatched
                    .extend(records.iter().map(|r| (*r).clone()));
                continue;
            };

            for &record in records {
                let mut last_score = None;
                let mut picked = None;

                for (idx, candidate) in candidates.iter().enumerate() {
                    let score = similarity(record, candidate);
                    last_score = Some(score);
                    if score > self.threshold {
                        picked = Some((idx, score));
                        break;
                    }
                }

                match picked {
                    Some((idx, score)) => {
                        let candidate = candidates.remove(idx);
                        outcome.first_batch_matched += 1;
                        outcome.second_batch_matched += 1;
                        if matched_seen.insert(record) {
                            outcome.matched.push(MatchedPair {
                                first: record.with_similarity(score),
                                second: candidate.with_similarity(score),
                                similarity: score,
                            });
                        }
                    }
                    None => {
                        let unmatched = match last_score {
                            Some(score) => record.with_similarity(score),
                            None => record.clone(),
                        };
                        outcome.first_unmatched.push(unmatched);
                    }
                }
            }

            outcome
                .second_unmatched
                .extend(candidates.into_iter().cloned());
        }

        // Ids that only exist in batch B.
        for key in &second_buckets.order {
            if let Some(records) = second_buckets.groups.remove(key) {
                outcome
                    .second_unmatched
                    .extend(records.into_iter().cloned());
            }
        }

        tracing::debug!(
            matched = outcome.matched_count(),
            first_unmatched = outcome.first_unmatched.len(),
            second_unmatched = outcome.second_unmatched.len(),
            "reconciled batches"
        );

        outcome
    }
}
