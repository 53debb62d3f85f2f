//! Ledger and group statements with running balances

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::books::Registry;
use crate::reports::impact::{selection_impact, voucher_touches};
use crate::types::Voucher;

/// What the statement is computed over
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatementScope {
    /// Every voucher, one row each, without balances
    AllLedgers,
    /// A single ledger, or a ledger group expanded to its direct members
    Named(String),
}

/// One statement line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementRow {
    pub id: String,
    pub date: NaiveDate,
    pub particulars: String,
    pub voucher_type: String,
    pub debit: BigDecimal,
    pub credit: BigDecimal,
    /// Running balance after this row; zero in the all-ledgers view
    pub balance: BigDecimal,
}

/// A rendered statement for a scope and date window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerStatement {
    pub opening_balance: BigDecimal,
    pub rows: Vec<StatementRow>,
    pub closing_balance: BigDecimal,
    pub all_ledgers_view: bool,
}

impl LedgerStatement {
    fn empty(all_ledgers_view: bool) -> Self {
        Self {
            opening_balance: BigDecimal::from(0),
            rows: Vec::new(),
            closing_balance: BigDecimal::from(0),
            all_ledgers_view,
        }
    }
}

/// Compute a statement over the voucher register.
///
/// A named scope that matches a group name reports on the group's direct
/// members together; otherwise it reports on the single ledger with that
/// name. Vouchers dated before `start` fold into the opening balance, and
/// rows with no impact on the selection are dropped.
pub fn ledger_statement(
    registry: &Registry,
    vouchers: &[Voucher],
    scope: &StatementScope,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> LedgerStatement {
    let in_window =
        |d: NaiveDate| start.map_or(true, |s| d >= s) && end.map_or(true, |e| d <= e);

    let name = match scope {
        StatementScope::AllLedgers => {
            let mut sorted: Vec<&Voucher> = vouchers.iter().collect();
            sorted.sort_by_key(|v| v.date());

            let rows = sorted
                .iter()
                .filter(|v| in_window(v.date()))
                .map(|v| {
                    let (debit, credit) = match v {
                        Voucher::Sales(t) | Voucher::Purchase(t) => {
                            (t.total.clone(), t.total.clone())
                        }
                        Voucher::Payment(s) | Voucher::Receipt(s) => {
                            (s.amount.clone(), s.amount.clone())
                        }
                        Voucher::Contra(c) => (c.amount.clone(), c.amount.clone()),
                        Voucher::Journal(j) => (j.total_debit.clone(), j.total_credit.clone()),
                    };
                    StatementRow {
                        id: v.id().to_string(),
                        date: v.date(),
                        particulars: v
                            .narration()
                            .filter(|n| !n.is_empty())
                            .map(str::to_string)
                            .unwrap_or_else(|| format!("Voucher Type: {}", v.voucher_type())),
                        voucher_type: v.voucher_type().to_string(),
                        debit,
                        credit,
                        balance: BigDecimal::from(0),
                    }
                })
                .collect();

            return LedgerStatement {
                opening_balance: BigDecimal::from(0),
                rows,
                closing_balance: BigDecimal::from(0),
                all_ledgers_view: true,
            };
        }
        StatementScope::Named(name) => name,
    };

    let group_selected = registry.is_group(name);
    let names: Vec<String> = if group_selected {
        registry.group_members(name)
    } else {
        vec![name.clone()]
    };

    if names.is_empty() {
        return LedgerStatement::empty(false);
    }

    let mut relevant: Vec<&Voucher> = vouchers
        .iter()
        .filter(|v| voucher_touches(v, &names))
        .collect();
    relevant.sort_by_key(|v| v.date());

    let mut opening_balance = BigDecimal::from(0);
    if let Some(start) = start {
        for voucher in relevant.iter().filter(|v| v.date() < start) {
            let impact = selection_impact(voucher, &names, group_selected);
            opening_balance += impact.debit - impact.credit;
        }
    }

    let mut running_balance = opening_balance.clone();
    let mut rows = Vec::new();
    for voucher in relevant.iter().filter(|v| in_window(v.date())) {
        let impact = selection_impact(voucher, &names, group_selected);
        if impact.is_blank() {
            continue;
        }
        running_balance += &impact.debit - &impact.credit;
        rows.push(StatementRow {
            id: voucher.id().to_string(),
            date: voucher.date(),
            particulars: impact.particulars,
            voucher_type: voucher.voucher_type().to_string(),
            debit: impact.debit,
            credit: impact.credit,
            balance: running_balance.clone(),
        });
    }

    LedgerStatement {
        opening_balance,
        rows,
        closing_balance: running_balance,
        all_ledgers_view: false,
    }
}

/// Render a signed balance as an absolute amount tagged Dr or Cr.
///
/// Positive balances are debit balances. A zero balance carries no suffix.
pub fn format_balance(balance: &BigDecimal) -> String {
    let zero = BigDecimal::from(0);
    let suffix = if *balance > zero {
        " Dr"
    } else if *balance < zero {
        " Cr"
    } else {
        ""
    };
    format!("{:.2}{}", balance.abs(), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        Company, JournalEntry, JournalVoucher, Ledger, SettlementVoucher, TradeVoucher,
        VoucherLine,
    };

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn registry_with_parties() -> Registry {
        let mut registry = Registry::standard(Company::new("Test Co", "Karnataka"));
        registry
            .add_ledger(Ledger::new("Acme Traders", "Sundry Debtors"))
            .unwrap();
        registry
            .add_ledger(Ledger::new("Globex", "Sundry Debtors"))
            .unwrap();
        registry
    }

    fn sale(id: &str, d: u32, party: &str, taxable: i64) -> Voucher {
        let tax = taxable * 18 / 100;
        let half = tax / 2;
        Voucher::Sales(TradeVoucher {
            id: id.to_string(),
            date: day(d),
            is_inter_state: false,
            invoice_no: format!("INV-{}", id),
            due_date: None,
            party: party.to_string(),
            items: vec![VoucherLine {
                name: "Widget".to_string(),
                qty: BigDecimal::from(1),
                rate: BigDecimal::from(taxable),
                taxable_amount: BigDecimal::from(taxable),
                cgst_amount: BigDecimal::from(half),
                sgst_amount: BigDecimal::from(half),
                igst_amount: BigDecimal::from(0),
                total_amount: BigDecimal::from(taxable + tax),
            }],
            total_taxable_amount: BigDecimal::from(taxable),
            total_cgst: BigDecimal::from(half),
            total_sgst: BigDecimal::from(half),
            total_igst: BigDecimal::from(0),
            total: BigDecimal::from(taxable + tax),
            narration: None,
        })
    }

    fn receipt(id: &str, d: u32, party: &str, amount: i64) -> Voucher {
        Voucher::Receipt(SettlementVoucher {
            id: id.to_string(),
            date: day(d),
            account: "Cash".to_string(),
            party: party.to_string(),
            amount: BigDecimal::from(amount),
            narration: None,
        })
    }

    #[test]
    fn test_single_ledger_running_balance() {
        let registry = registry_with_parties();
        let vouchers = vec![
            sale("s1", 1, "Acme Traders", 100000),
            receipt("r1", 5, "Acme Traders", 50000),
        ];

        let statement = ledger_statement(
            &registry,
            &vouchers,
            &StatementScope::Named("Acme Traders".to_string()),
            None,
            None,
        );

        assert_eq!(statement.opening_balance, BigDecimal::from(0));
        assert_eq!(statement.rows.len(), 2);
        assert_eq!(statement.rows[0].debit, BigDecimal::from(118000));
        assert_eq!(statement.rows[0].particulars, "Sales");
        assert_eq!(statement.rows[0].balance, BigDecimal::from(118000));
        assert_eq!(statement.rows[1].credit, BigDecimal::from(50000));
        assert_eq!(statement.rows[1].particulars, "Cash");
        assert_eq!(statement.closing_balance, BigDecimal::from(68000));
    }

    #[test]
    fn test_start_date_folds_into_opening_balance() {
        let registry = registry_with_parties();
        let vouchers = vec![
            sale("s1", 1, "Acme Traders", 100000),
            receipt("r1", 10, "Acme Traders", 30000),
        ];

        let statement = ledger_statement(
            &registry,
            &vouchers,
            &StatementScope::Named("Acme Traders".to_string()),
            Some(day(5)),
            None,
        );

        assert_eq!(statement.opening_balance, BigDecimal::from(118000));
        assert_eq!(statement.rows.len(), 1);
        assert_eq!(statement.rows[0].balance, BigDecimal::from(88000));
        assert_eq!(statement.closing_balance, BigDecimal::from(88000));
    }

    #[test]
    fn test_group_statement_spans_members() {
        let registry = registry_with_parties();
        let vouchers = vec![
            sale("s1", 1, "Acme Traders", 1000),
            sale("s2", 2, "Globex", 2000),
        ];

        let statement = ledger_statement(
            &registry,
            &vouchers,
            &StatementScope::Named("Sundry Debtors".to_string()),
            None,
            None,
        );

        assert_eq!(statement.rows.len(), 2);
        assert_eq!(statement.closing_balance, BigDecimal::from(1180 + 2360));
    }

    #[test]
    fn test_empty_group_yields_empty_statement() {
        let registry = registry_with_parties();
        let vouchers = vec![sale("s1", 1, "Acme Traders", 1000)];

        let statement = ledger_statement(
            &registry,
            &vouchers,
            &StatementScope::Named("Sundry Creditors".to_string()),
            None,
            None,
        );

        assert!(statement.rows.is_empty());
        assert_eq!(statement.closing_balance, BigDecimal::from(0));
    }

    #[test]
    fn test_internal_journal_row_label() {
        let registry = registry_with_parties();
        let vouchers = vec![Voucher::Journal(JournalVoucher {
            id: "j1".to_string(),
            date: day(3),
            entries: vec![
                JournalEntry::debit("Acme Traders", BigDecimal::from(500)),
                JournalEntry::credit("Globex", BigDecimal::from(500)),
            ],
            total_debit: BigDecimal::from(500),
            total_credit: BigDecimal::from(500),
            narration: None,
        })];

        let statement = ledger_statement(
            &registry,
            &vouchers,
            &StatementScope::Named("Sundry Debtors".to_string()),
            None,
            None,
        );

        assert_eq!(statement.rows.len(), 1);
        assert_eq!(statement.rows[0].particulars, "Journal (Internal Transfer)");
        // Debit and credit cancel across the group
        assert_eq!(statement.closing_balance, BigDecimal::from(0));
    }

    #[test]
    fn test_all_ledgers_view_lists_every_voucher() {
        let registry = registry_with_parties();
        let vouchers = vec![
            sale("s1", 2, "Acme Traders", 1000),
            receipt("r1", 1, "Acme Traders", 400),
        ];

        let statement =
            ledger_statement(&registry, &vouchers, &StatementScope::AllLedgers, None, None);

        assert!(statement.all_ledgers_view);
        assert_eq!(statement.rows.len(), 2);
        // Chronological, oldest first
        assert_eq!(statement.rows[0].id, "r1");
        assert_eq!(statement.rows[0].particulars, "Voucher Type: Receipt");
        assert_eq!(statement.rows[1].debit, BigDecimal::from(1180));
    }

    #[test]
    fn test_format_balance() {
        assert_eq!(format_balance(&BigDecimal::from(1500)), "1500.00 Dr");
        assert_eq!(format_balance(&BigDecimal::from(-250)), "250.00 Cr");
        assert_eq!(format_balance(&BigDecimal::from(0)), "0.00");
    }
}
