//! Chronological day book listing

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::Voucher;

/// One day-book line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayBookRow {
    pub id: String,
    pub date: NaiveDate,
    pub voucher_type: String,
    /// Party ledger, or "N/A" for vouchers without one
    pub party: String,
    pub amount: BigDecimal,
}

/// List vouchers inside the date window, preserving register order
/// (newest first). Either bound may be open.
pub fn day_book(vouchers: &[Voucher], start: Option<NaiveDate>, end: Option<NaiveDate>) -> Vec<DayBookRow> {
    vouchers
        .iter()
        .filter(|v| start.map_or(true, |s| v.date() >= s))
        .filter(|v| end.map_or(true, |e| v.date() <= e))
        .map(|v| DayBookRow {
            id: v.id().to_string(),
            date: v.date(),
            voucher_type: v.voucher_type().to_string(),
            party: v.party().unwrap_or("N/A").to_string(),
            amount: v.display_amount(),
        })
        .collect()
}
