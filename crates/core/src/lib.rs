pub mod report;
pub mod transaction;

pub use report::{BatchInfo, MatchCountMode, MatchedPair, ReconciliationOutcome, UploadReport};
pub use transaction::{display_order, sort_for_display, TransactionRecord};
