use chrono::{Days, NaiveDateTime};
use recon_core::TransactionRecord;

pub const WEIGHT_TRANSACTION_ID: u32 = 6;
pub const WEIGHT_EXACT_TIMESTAMP: u32 = 5;
pub const WEIGHT_SAME_DAY: u32 = 3;
pub const WEIGHT_ONE_DAY_APART: u32 = 2;
pub const WEIGHT_DESCRIPTION: u32 = 2;
pub const WEIGHT_AMOUNT: u32 = 4;
pub const WEIGHT_TRANSACTION_TYPE: u32 = 1;
pub const WEIGHT_WALLET_REFERENCE: u32 = 4;
pub const WEIGHT_NARRATIVE: u32 = 2;
pub const WEIGHT_PROFILE_NAME: u32 = 1;

pub const TOTAL_WEIGHT: u32 = 25;

/// Which tier of the date cascade fired, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateAgreement {
    Exact,
    SameDay,
    OneDayApart,
    None,
}

impl DateAgreement {
    /// Tiers are tried in order and the first hit wins. The middle tier only
    /// checks the calendar date, so two timestamps exactly 24h apart always
    /// fall through to the last tier.
    pub fn between(a: NaiveDateTime, b: NaiveDateTime) -> Self {
        let a_date = a.date();
        let b_date = b.date();

        if a == b {
            DateAgreement::Exact
        } else if a_date == b_date {
            DateAgreement::SameDay
        } else if Some(a) == b.checked_sub_days(Days::new(1))
            || Some(a) == b.checked_add_days(Days::new(1))
        {
            DateAgreement::OneDayApart
        } else {
            DateAgreement::None
        }
    }

    pub fn weight(self) -> u32 {
        match self {
            DateAgreement::Exact => WEIGHT_EXACT_TIMESTAMP,
            DateAgreement::SameDay => WEIGHT_SAME_DAY,
            DateAgreement::OneDayApart => WEIGHT_ONE_DAY_APART,
            DateAgreement::None => 0,
        }
    }
}

/// Per-field breakdown of one comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldAgreement {
    pub transaction_id: bool,
    pub date: DateAgreement,
    pub description: bool,
    pub amount: bool,
    pub transaction_type: bool,
    pub wallet_reference: bool,
    pub narrative: bool,
    pub profile_name: bool,
}

impl FieldAgreement {
    pub fn weight(&self) -> u32 {
        let flag = |hit: bool, weight: u32| if hit { weight } else { 0 };

        flag(self.transaction_id, WEIGHT_TRANSACTION_ID)
            + self.date.weight()
            + flag(self.description, WEIGHT_DESCRIPTION)
            + flag(self.amount, WEIGHT_AMOUNT)
            + flag(self.transaction_type, WEIGHT_TRANSACTION_TYPE)
            + flag(self.wallet_reference, WEIGHT_WALLET_REFERENCE)
            + flag(self.narrative, WEIGHT_NARRATIVE)
            + flag(self.profile_name, WEIGHT_PROFILE_NAME)
    }

    /// Multiplying first keeps every reachable score exact in `f64`.
    pub fn percentage(&self) -> f64 {
        (self.weight() as f64 * 100.0) / TOTAL_WEIGHT as f64
    }
}

pub fn score_breakdown(a: &TransactionRecord, b: &TransactionRecord) -> FieldAgreement {
    FieldAgreement {
        transaction_id: a.transaction_id == b.transaction_id,
        date: DateAgreement::between(a.timestamp, b.timestamp),
        description: a.description == b.description,
        amount: a.amount == b.amount,
        transaction_type: a.transaction_type == b.transaction_type,
        wallet_reference: a.wallet_reference == b.wallet_reference,
        narrative: a.narrative == b.narrative,
        profile_name: a.profile_name == b.profile_name,
    }
}

/// Weighted field agreement between two records, in `[0, 100]`.
pub fn similarity(a: &TransactionRecord, b: &TransactionRecord) -> f64 {
    score_breakdown(a, b).percentage()
}
