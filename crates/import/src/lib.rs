pub mod csv;
pub mod match_engine;
pub mod similarity;
pub mod upload;

pub use csv::{import_csv, ColumnMapping, CsvError};
pub use match_engine::{MatchEngine, DEFAULT_THRESHOLD};
pub use similarity::{score_breakdown, similarity, DateAgreement, FieldAgreement};
pub use upload::{reconcile_uploads, validate_uploads, ReconcileOptions, Upload, UploadError};
