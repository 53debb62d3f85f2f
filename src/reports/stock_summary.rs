//! Stock movement summary

use bigdecimal::BigDecimal;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::books::Registry;
use crate::types::Voucher;

/// Quantity movement for one stock item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockSummaryRow {
    pub name: String,
    pub opening: BigDecimal,
    pub inward: BigDecimal,
    pub outward: BigDecimal,
    pub closing: BigDecimal,
}

/// Fold purchase and sales quantities per stock item.
///
/// Only items registered as masters get a row; voucher lines naming unknown
/// items are ignored. Line names must match the master exactly. Opening
/// quantity comes from the item master, closing is opening + inward − outward.
pub fn stock_summary(registry: &Registry, vouchers: &[Voucher]) -> Vec<StockSummaryRow> {
    let mut summary: IndexMap<String, (BigDecimal, BigDecimal, BigDecimal)> = IndexMap::new();

    for item in registry.stock_items() {
        let opening = item.quantity.clone().unwrap_or_else(|| BigDecimal::from(0));
        summary.insert(
            item.name.clone(),
            (opening, BigDecimal::from(0), BigDecimal::from(0)),
        );
    }

    for voucher in vouchers {
        match voucher {
            Voucher::Purchase(v) => {
                for line in &v.items {
                    if let Some((_, inward, _)) = summary.get_mut(&line.name) {
                        *inward += &line.qty;
                    }
                }
            }
            Voucher::Sales(v) => {
                for line in &v.items {
                    if let Some((_, _, outward)) = summary.get_mut(&line.name) {
                        *outward += &line.qty;
                    }
                }
            }
            _ => {}
        }
    }

    summary
        .into_iter()
        .map(|(name, (opening, inward, outward))| {
            let closing = &opening + &inward - &outward;
            StockSummaryRow {
                name,
                opening,
                inward,
                outward,
                closing,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Company, StockItem, TradeVoucher, VoucherLine};
    use chrono::NaiveDate;

    fn line(name: &str, qty: i64) -> VoucherLine {
        VoucherLine {
            name: name.to_string(),
            qty: BigDecimal::from(qty),
            rate: BigDecimal::from(100),
            taxable_amount: BigDecimal::from(qty * 100),
            cgst_amount: BigDecimal::from(0),
            sgst_amount: BigDecimal::from(0),
            igst_amount: BigDecimal::from(0),
            total_amount: BigDecimal::from(qty * 100),
        }
    }

    fn trade(lines: Vec<VoucherLine>) -> TradeVoucher {
        let mut voucher = TradeVoucher {
            id: "t1".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            is_inter_state: false,
            invoice_no: "INV-1".to_string(),
            due_date: None,
            party: "Acme Traders".to_string(),
            items: lines,
            total_taxable_amount: BigDecimal::from(0),
            total_cgst: BigDecimal::from(0),
            total_sgst: BigDecimal::from(0),
            total_igst: BigDecimal::from(0),
            total: BigDecimal::from(0),
            narration: None,
        };
        voucher.recompute_totals();
        voucher
    }

    #[test]
    fn test_movement_folds_into_closing() {
        let mut registry = Registry::standard(Company::new("Test Co", "Karnataka"));
        registry
            .add_stock_item(StockItem::new("Widget", "Primary", "Nos"))
            .unwrap();

        let vouchers = vec![
            Voucher::Purchase(trade(vec![line("Widget", 10)])),
            Voucher::Sales(trade(vec![line("Widget", 4)])),
        ];

        let rows = stock_summary(&registry, &vouchers);
        let widget = rows.iter().find(|r| r.name == "Widget").unwrap();
        assert_eq!(widget.inward, BigDecimal::from(10));
        assert_eq!(widget.outward, BigDecimal::from(4));
        assert_eq!(widget.closing, BigDecimal::from(6));
    }

    #[test]
    fn test_unknown_item_lines_are_ignored() {
        let registry = Registry::standard(Company::new("Test Co", "Karnataka"));
        let vouchers = vec![Voucher::Purchase(trade(vec![line("Mystery Item", 5)]))];

        let rows = stock_summary(&registry, &vouchers);
        assert!(rows.iter().all(|r| r.name != "Mystery Item"));
    }

    #[test]
    fn test_opening_quantity_comes_from_master() {
        let mut registry = Registry::standard(Company::new("Test Co", "Karnataka"));
        let mut item = StockItem::new("Widget", "Primary", "Nos");
        item.quantity = Some(BigDecimal::from(25));
        registry.add_stock_item(item).unwrap();

        let rows = stock_summary(&registry, &[]);
        let widget = rows.iter().find(|r| r.name == "Widget").unwrap();
        assert_eq!(widget.opening, BigDecimal::from(25));
        assert_eq!(widget.closing, BigDecimal::from(25));
    }
}
