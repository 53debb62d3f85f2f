//! Voucher intake from JSON exports and cell-parsed spreadsheets

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::books::vouchers::build;
use crate::books::Registry;
use crate::tax::gst::{self, RateFallback, TaxScope};
use crate::types::*;

/// Counts for a bulk intake run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub success: usize,
    pub failed: usize,
}

/// Parse a JSON array of voucher objects.
///
/// A payload that is not valid JSON, or not an array, counts as one failure
/// and yields nothing. Within an array, each element is deserialized on its
/// own, so one malformed voucher does not sink the rest.
pub fn vouchers_from_json(payload: &str) -> (Vec<Voucher>, ImportSummary) {
    let value: serde_json::Value = match serde_json::from_str(payload) {
        Ok(value) => value,
        Err(err) => {
            warn!(error = %err, "voucher import payload is not valid JSON");
            return (Vec::new(), ImportSummary { success: 0, failed: 1 });
        }
    };

    let items = match value {
        serde_json::Value::Array(items) => items,
        _ => {
            warn!("voucher import payload is not a JSON array");
            return (Vec::new(), ImportSummary { success: 0, failed: 1 });
        }
    };

    let mut vouchers = Vec::new();
    let mut summary = ImportSummary::default();
    for item in items {
        match serde_json::from_value::<Voucher>(item) {
            Ok(voucher) => {
                vouchers.push(voucher);
                summary.success += 1;
            }
            Err(err) => {
                warn!(error = %err, "skipping malformed voucher in import payload");
                summary.failed += 1;
            }
        }
    }

    debug!(
        success = summary.success,
        failed = summary.failed,
        "voucher JSON import parsed"
    );
    (vouchers, summary)
}

/// One row of the trades sheet; `items` holds the JSON cell text
#[derive(Debug, Clone)]
pub struct TradeRow {
    pub date: NaiveDate,
    pub kind: TradeKind,
    pub invoice_no: String,
    pub party: String,
    /// The sheet states the supply scope; party masters are not consulted
    pub inter_state: bool,
    pub items: String,
    pub narration: Option<String>,
}

/// One row of the payments/receipts sheet
#[derive(Debug, Clone)]
pub struct SettlementRow {
    pub date: NaiveDate,
    pub kind: SettlementKind,
    pub account: String,
    pub party: String,
    pub amount: BigDecimal,
    pub narration: Option<String>,
}

/// One row of the contra sheet
#[derive(Debug, Clone)]
pub struct ContraRow {
    pub date: NaiveDate,
    pub from_account: String,
    pub to_account: String,
    pub amount: BigDecimal,
    pub narration: Option<String>,
}

/// One row of the journals sheet; `entries` holds the JSON cell text
#[derive(Debug, Clone)]
pub struct JournalRow {
    pub date: NaiveDate,
    pub entries: String,
    pub narration: Option<String>,
}

/// Cell-parsed spreadsheet content, one list per voucher family
#[derive(Debug, Clone, Default)]
pub struct SheetImport {
    pub trades: Vec<TradeRow>,
    pub settlements: Vec<SettlementRow>,
    pub contras: Vec<ContraRow>,
    pub journals: Vec<JournalRow>,
}

#[derive(Debug, Deserialize)]
struct SheetLine {
    name: String,
    qty: BigDecimal,
    rate: BigDecimal,
}

/// Build vouchers from spreadsheet rows.
///
/// Trade rows are priced with registry GST rates (unknown items taxed at
/// zero) under the scope the sheet declares. Journal rows must balance.
/// Failed rows are counted and skipped; the rest come back ready for the
/// normal acceptance path.
pub fn vouchers_from_sheets(registry: &Registry, sheets: &SheetImport) -> (Vec<Voucher>, ImportSummary) {
    let mut vouchers = Vec::new();
    let mut summary = ImportSummary::default();

    for row in &sheets.trades {
        match serde_json::from_str::<Vec<SheetLine>>(&row.items) {
            Ok(lines) => {
                vouchers.push(trade_from_row(registry, row, lines));
                summary.success += 1;
            }
            Err(err) => {
                warn!(party = %row.party, error = %err, "skipping trade row with malformed items");
                summary.failed += 1;
            }
        }
    }

    for row in &sheets.settlements {
        vouchers.push(build::settlement(
            row.kind,
            row.date,
            row.account.clone(),
            row.party.clone(),
            row.amount.clone(),
            row.narration.clone(),
        ));
        summary.success += 1;
    }

    for row in &sheets.contras {
        vouchers.push(build::contra(
            row.date,
            row.from_account.clone(),
            row.to_account.clone(),
            row.amount.clone(),
            row.narration.clone(),
        ));
        summary.success += 1;
    }

    for row in &sheets.journals {
        let entries = match serde_json::from_str::<Vec<JournalEntry>>(&row.entries) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(error = %err, "skipping journal row with malformed entries");
                summary.failed += 1;
                continue;
            }
        };
        match build::journal(row.date, entries, row.narration.clone()) {
            Ok(voucher) => {
                vouchers.push(voucher);
                summary.success += 1;
            }
            Err(err) => {
                warn!(error = %err, "skipping unbalanced journal row");
                summary.failed += 1;
            }
        }
    }

    debug!(
        success = summary.success,
        failed = summary.failed,
        "spreadsheet import built"
    );
    (vouchers, summary)
}

fn trade_from_row(registry: &Registry, row: &TradeRow, lines: Vec<SheetLine>) -> Voucher {
    let scope = TaxScope::from_flag(row.inter_state);
    let items = lines
        .into_iter()
        .map(|line| {
            let rate = gst::resolve_item_rate(registry, &line.name, RateFallback::Zero);
            gst::price_line(line.name, line.qty, line.rate, &rate, scope)
        })
        .collect();

    let mut voucher = TradeVoucher {
        id: String::new(),
        date: row.date,
        is_inter_state: scope.is_inter_state(),
        invoice_no: row.invoice_no.clone(),
        due_date: None,
        party: row.party.clone(),
        items,
        total_taxable_amount: BigDecimal::from(0),
        total_cgst: BigDecimal::from(0),
        total_sgst: BigDecimal::from(0),
        total_igst: BigDecimal::from(0),
        total: BigDecimal::from(0),
        narration: row.narration.clone(),
    };
    voucher.recompute_totals();
    Voucher::trade(row.kind, voucher)
}
