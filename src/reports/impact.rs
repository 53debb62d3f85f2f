//! Per-ledger debit/credit impact of a voucher
//!
//! Each voucher type posts to a fixed set of ledgers. `voucher_impact`
//! answers "what did this voucher do to this one ledger", and the selection
//! helpers aggregate that answer across a group of ledgers for statements.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::books::registry::SystemLedger;
use crate::types::Voucher;

/// What a single voucher did to a single ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerImpact {
    pub debit: BigDecimal,
    pub credit: BigDecimal,
    /// Counter-ledger name shown against the row
    pub particulars: String,
}

impl LedgerImpact {
    fn blank() -> Self {
        Self {
            debit: BigDecimal::from(0),
            credit: BigDecimal::from(0),
            particulars: String::new(),
        }
    }

    /// True when the voucher did not touch the ledger at all
    pub fn is_blank(&self) -> bool {
        self.debit == BigDecimal::from(0) && self.credit == BigDecimal::from(0)
    }
}

/// Resolve the debit/credit a voucher posts against one ledger name.
///
/// Ledger names match exactly. A voucher that does not touch the ledger
/// yields a blank impact. For trade vouchers the party row wins over the
/// system rows, so a party ledger named "Sales" sees the gross total.
pub fn voucher_impact(voucher: &Voucher, ledger_name: &str) -> LedgerImpact {
    let mut impact = LedgerImpact::blank();

    match voucher {
        Voucher::Sales(v) => {
            if v.party == ledger_name {
                impact.debit = v.total.clone();
                impact.particulars = SystemLedger::Sales.name().to_string();
            } else if ledger_name == SystemLedger::Sales.name() {
                impact.credit = v.total_taxable_amount.clone();
                impact.particulars = v.party.clone();
            } else if ledger_name == SystemLedger::Cgst.name() && !v.is_inter_state {
                impact.credit = v.total_cgst.clone();
                impact.particulars = v.party.clone();
            } else if ledger_name == SystemLedger::Sgst.name() && !v.is_inter_state {
                impact.credit = v.total_sgst.clone();
                impact.particulars = v.party.clone();
            } else if ledger_name == SystemLedger::Igst.name() && v.is_inter_state {
                impact.credit = v.total_igst.clone();
                impact.particulars = v.party.clone();
            }
        }
        Voucher::Purchase(v) => {
            if v.party == ledger_name {
                impact.credit = v.total.clone();
                impact.particulars = SystemLedger::Purchases.name().to_string();
            } else if ledger_name == SystemLedger::Purchases.name() {
                impact.debit = v.total_taxable_amount.clone();
                impact.particulars = v.party.clone();
            } else if ledger_name == SystemLedger::Cgst.name() && !v.is_inter_state {
                impact.debit = v.total_cgst.clone();
                impact.particulars = v.party.clone();
            } else if ledger_name == SystemLedger::Sgst.name() && !v.is_inter_state {
                impact.debit = v.total_sgst.clone();
                impact.particulars = v.party.clone();
            } else if ledger_name == SystemLedger::Igst.name() && v.is_inter_state {
                impact.debit = v.total_igst.clone();
                impact.particulars = v.party.clone();
            }
        }
        Voucher::Receipt(v) => {
            if v.party == ledger_name {
                impact.credit = v.amount.clone();
                impact.particulars = v.account.clone();
            }
            if v.account == ledger_name {
                impact.debit = v.amount.clone();
                impact.particulars = v.party.clone();
            }
        }
        Voucher::Payment(v) => {
            if v.party == ledger_name {
                impact.debit = v.amount.clone();
                impact.particulars = v.account.clone();
            }
            if v.account == ledger_name {
                impact.credit = v.amount.clone();
                impact.particulars = v.party.clone();
            }
        }
        Voucher::Contra(v) => {
            if v.to_account == ledger_name {
                impact.debit = v.amount.clone();
                impact.particulars = v.from_account.clone();
            }
            if v.from_account == ledger_name {
                impact.credit = v.amount.clone();
                impact.particulars = v.to_account.clone();
            }
        }
        Voucher::Journal(v) => {
            if let Some(entry) = v.entries.iter().find(|e| e.ledger == ledger_name) {
                impact.debit = entry.debit.clone();
                impact.credit = entry.credit.clone();
                impact.particulars = v
                    .entries
                    .iter()
                    .find(|e| e.ledger != ledger_name)
                    .map(|e| e.ledger.clone())
                    .unwrap_or_else(|| "Journal".to_string());
            }
        }
    }

    impact
}

/// Whether a voucher posts to any ledger in the selection.
///
/// Used as a pre-filter before computing statement rows. Trade vouchers are
/// relevant to the party and to the system ledgers their tax scope posts to.
pub fn voucher_touches(voucher: &Voucher, names: &[String]) -> bool {
    let contains = |candidate: &str| names.iter().any(|n| n == candidate);

    match voucher {
        Voucher::Sales(v) => {
            let mut tax_ledgers = vec![SystemLedger::Sales.name()];
            if v.is_inter_state {
                tax_ledgers.push(SystemLedger::Igst.name());
            } else {
                tax_ledgers.push(SystemLedger::Cgst.name());
                tax_ledgers.push(SystemLedger::Sgst.name());
            }
            contains(&v.party) || tax_ledgers.iter().any(|t| contains(t))
        }
        Voucher::Purchase(v) => {
            let mut tax_ledgers = vec![SystemLedger::Purchases.name()];
            if v.is_inter_state {
                tax_ledgers.push(SystemLedger::Igst.name());
            } else {
                tax_ledgers.push(SystemLedger::Cgst.name());
                tax_ledgers.push(SystemLedger::Sgst.name());
            }
            contains(&v.party) || tax_ledgers.iter().any(|t| contains(t))
        }
        Voucher::Payment(v) | Voucher::Receipt(v) => contains(&v.party) || contains(&v.account),
        Voucher::Contra(v) => contains(&v.from_account) || contains(&v.to_account),
        Voucher::Journal(v) => v
            .entries
            .iter()
            .any(|e| !e.ledger.is_empty() && contains(&e.ledger)),
    }
}

/// Aggregate a voucher's impact across a selection of ledgers.
///
/// Debits and credits sum over the selection; the particulars come from the
/// first ledger the voucher touched. Journals get a better label: the
/// ledgers outside the selection joined with a comma, or for a fully
/// internal journal either "Journal (Internal Transfer)" (group selection)
/// or the narration (single ledger).
pub fn selection_impact(voucher: &Voucher, names: &[String], group_selected: bool) -> LedgerImpact {
    let mut debit = BigDecimal::from(0);
    let mut credit = BigDecimal::from(0);
    let mut particulars = String::new();

    for name in names {
        let impact = voucher_impact(voucher, name);
        debit += impact.debit;
        credit += impact.credit;
        if particulars.is_empty() && !impact.particulars.is_empty() {
            particulars = impact.particulars;
        }
    }

    if let Voucher::Journal(v) = voucher {
        let zero = BigDecimal::from(0);
        if debit > zero || credit > zero {
            let outside: Vec<&str> = v
                .entries
                .iter()
                .filter(|e| !e.ledger.is_empty() && !names.iter().any(|n| n == &e.ledger))
                .map(|e| e.ledger.as_str())
                .collect();

            if !outside.is_empty() {
                particulars = outside.join(", ");
            } else if group_selected {
                particulars = "Journal (Internal Transfer)".to_string();
            } else {
                particulars = v
                    .narration
                    .clone()
                    .filter(|n| !n.is_empty())
                    .unwrap_or_else(|| "Journal".to_string());
            }
        }
    }

    LedgerImpact {
        debit,
        credit,
        particulars,
    }
}
