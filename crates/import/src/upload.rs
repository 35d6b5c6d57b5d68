use recon_core::{BatchInfo, MatchCountMode, UploadReport};
use thiserror::Error;

use crate::csv::{import_csv, CsvError};
use crate::match_engine::{MatchEngine, DEFAULT_THRESHOLD};

pub const CSV_SUFFIX: &str = ".csv";

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Invalid file format. Please provide two CSV files.")]
    InvalidFormat,
    #[error("Please provide two file content")]
    EmptyInput,
    #[error(transparent)]
    Parse(#[from] CsvError),
}

/// One uploaded file, fully buffered.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub content: Vec<u8>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            content: content.into(),
        }
    }

    fn has_csv_suffix(&self) -> bool {
        self.file_name.ends_with(CSV_SUFFIX)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ReconcileOptions {
    pub match_threshold: f64,
    pub count_mode: MatchCountMode,
    pub sort_unmatched: bool,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            match_threshold: DEFAULT_THRESHOLD,
            count_mode: MatchCountMode::Combined,
            sort_unmatched: false,
        }
    }
}

/// Suffix is checked on both files before emptiness is checked on either.
pub fn validate_uploads(first: &Upload, second: &Upload) -> Result<(), UploadError> {
    if !first.has_csv_suffix() || !second.has_csv_suffix() {
        return Err(UploadError::InvalidFormat);
    }
    if first.content.is_empty() || second.content.is_empty() {
        return Err(UploadError::EmptyInput);
    }
    Ok(())
}

/// Validate, parse both batches, match them and summarize the result.
pub fn reconcile_uploads(
    first: &Upload,
    second: &Upload,
    options: &ReconcileOptions,
) -> Result<UploadReport, UploadError> {
    let run_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!(
        "reconcile",
        %run_id,
        first = %first.file_name,
        second = %second.file_name
    );
    let _guard = span.enter();

    validate_uploads(first, second)?;

    let first_records = import_csv(first.content.as_slice(), &first.file_name)?;
    let second_records = import_csv(second.content.as_slice(), &second.file_name)?;

    let engine = MatchEngine::with_threshold(options.match_threshold);
    let outcome = engine.reconcile(&first_records, &second_records);

    let report = UploadReport::summarize(
        BatchInfo::new(first.file_name.as_str(), first_records.len()),
        BatchInfo::new(second.file_name.as_str(), second_records.len()),
        outcome,
        options.count_mode,
    );

    tracing::info!(
        first_total = report.first_file_total_record_count,
        second_total = report.second_file_total_record_count,
        matched = report.matched_record_count,
        "reconciliation finished"
    );

    Ok(if options.sort_unmatched {
        report.sorted_for_display()
    } else {
        report
    })
}
