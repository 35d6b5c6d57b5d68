use chrono::NaiveDateTime;
use recon_core::TransactionRecord;
use std::io::Read;
use thiserror::Error;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const COL_TRANSACTION_ID: &str = "TransactionID";
pub const COL_TRANSACTION_TYPE: &str = "TransactionType";
pub const COL_DESCRIPTION: &str = "TransactionDescription";
pub const COL_NARRATIVE: &str = "TransactionNarrative";
pub const COL_AMOUNT: &str = "TransactionAmount";
pub const COL_DATE: &str = "TransactionDate";
pub const COL_PROFILE_NAME: &str = "ProfileName";
pub const COL_WALLET_REFERENCE: &str = "WalletReference";

#[derive(Error, Debug)]
pub enum CsvError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Missing required column: {0}")]
    MissingColumn(String),
    #[error("Parsing file exception. File name: {source_label}, record number: {row}. Exception: {cause}")]
    RecordParsing {
        source_label: String,
        /// 1-based, header excluded.
        row: u64,
        cause: String,
    },
}

/// Column positions resolved from the header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMapping {
    pub transaction_id: usize,
    pub transaction_type: usize,
    pub description: usize,
    pub narrative: usize,
    pub amount: usize,
    pub date: usize,
    pub profile_name: usize,
    pub wallet_reference: usize,
}

impl ColumnMapping {
    /// Looks every required column up by exact name. Column order is free and
    /// extra columns are ignored.
    pub fn from_headers(headers: &csv::StringRecord) -> Result<Self, CsvError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| CsvError::MissingColumn(name.to_string()))
        };

        Ok(Self {
            transaction_id: find(COL_TRANSACTION_ID)?,
            transaction_type: find(COL_TRANSACTION_TYPE)?,
            description: find(COL_DESCRIPTION)?,
            narrative: find(COL_NARRATIVE)?,
            amount: find(COL_AMOUNT)?,
            date: find(COL_DATE)?,
            profile_name: find(COL_PROFILE_NAME)?,
            wallet_reference: find(COL_WALLET_REFERENCE)?,
        })
    }

    fn to_record(
        self,
        row: &csv::StringRecord,
        source_label: &str,
    ) -> Result<TransactionRecord, String> {
        let field = |idx: usize, name: &'static str| {
            row.get(idx)
                .ok_or_else(|| format!("missing value for {name}"))
        };

        let amount_raw = field(self.amount, COL_AMOUNT)?;
        let amount = parse_amount(amount_raw)?;
        let date_raw = field(self.date, COL_DATE)?;
        let timestamp = parse_timestamp(date_raw)?;

        Ok(TransactionRecord {
            transaction_id: field(self.transaction_id, COL_TRANSACTION_ID)?.to_string(),
            transaction_type: field(self.transaction_type, COL_TRANSACTION_TYPE)?.to_string(),
            description: field(self.description, COL_DESCRIPTION)?.to_string(),
            narrative: field(self.narrative, COL_NARRATIVE)?.to_string(),
            amount,
            timestamp,
            profile_name: field(self.profile_name, COL_PROFILE_NAME)?.to_string(),
            wallet_reference: field(self.wallet_reference, COL_WALLET_REFERENCE)?.to_string(),
            source_label: source_label.to_string(),
            similarity_score: None,
            status: None,
        })
    }
}

fn parse_amount(s: &str) -> Result<i64, String> {
    s.parse::<i64>()
        .map_err(|e| format!("{COL_AMOUNT} {s:?}: {e}"))
}

fn parse_timestamp(s: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .map_err(|e| format!("{COL_DATE} {s:?}: {e}"))
}

/// Parses one batch into records, in row order.
///
/// The first failing row aborts the whole batch; no partial list is returned.
pub fn parse<R: Read>(
    reader: &mut csv::Reader<R>,
    source_label: &str,
) -> Result<Vec<TransactionRecord>, CsvError> {
    let mapping = ColumnMapping::from_headers(reader.headers()?)?;
    let mut records = Vec::new();

    for (idx, result) in reader.records().enumerate() {
        let row = idx as u64 + 1;
        let fail = |cause: String| CsvError::RecordParsing {
            source_label: source_label.to_string(),
            row,
            cause,
        };

        let raw = result.map_err(|e| fail(e.to_string()))?;
        let record = mapping.to_record(&raw, source_label).map_err(fail)?;
        records.push(record);
    }

    tracing::debug!(source = source_label, rows = records.len(), "parsed batch");

    Ok(records)
}

pub fn import_csv<R: Read>(data: R, source_label: &str) -> Result<Vec<TransactionRecord>, CsvError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(b',')
        .from_reader(data);

    parse(&mut reader, source_label)
}
