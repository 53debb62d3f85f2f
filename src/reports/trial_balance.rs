//! Trial balance over the full voucher register

use bigdecimal::BigDecimal;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::books::registry::SystemLedger;
use crate::books::Registry;
use crate::types::Voucher;

/// Net position of one ledger; only one side is ever non-zero
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialBalanceRow {
    pub ledger: String,
    pub debit: BigDecimal,
    pub credit: BigDecimal,
}

/// Netted per-ledger balances plus column totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialBalance {
    pub rows: Vec<TrialBalanceRow>,
    pub total_debit: BigDecimal,
    pub total_credit: BigDecimal,
}

impl TrialBalance {
    /// Debit and credit columns agree
    pub fn is_balanced(&self) -> bool {
        self.total_debit == self.total_credit
    }
}

/// Accumulate every voucher's postings per ledger, then net each ledger to
/// its heavier side. Ledgers that net to zero are dropped. Known ledgers
/// appear in registry order, ledgers seen only on vouchers follow in
/// first-use order.
pub fn trial_balance(registry: &Registry, vouchers: &[Voucher]) -> TrialBalance {
    let mut balances: IndexMap<String, (BigDecimal, BigDecimal)> = IndexMap::new();

    for ledger in registry.ledgers() {
        ensure(&mut balances, &ledger.name);
    }

    for voucher in vouchers {
        match voucher {
            Voucher::Purchase(v) => {
                credit(&mut balances, &v.party, &v.total);
                debit(
                    &mut balances,
                    SystemLedger::Purchases.name(),
                    &v.total_taxable_amount,
                );
                if v.is_inter_state {
                    debit(&mut balances, SystemLedger::Igst.name(), &v.total_igst);
                } else {
                    debit(&mut balances, SystemLedger::Cgst.name(), &v.total_cgst);
                    debit(&mut balances, SystemLedger::Sgst.name(), &v.total_sgst);
                }
            }
            Voucher::Sales(v) => {
                debit(&mut balances, &v.party, &v.total);
                credit(
                    &mut balances,
                    SystemLedger::Sales.name(),
                    &v.total_taxable_amount,
                );
                if v.is_inter_state {
                    credit(&mut balances, SystemLedger::Igst.name(), &v.total_igst);
                } else {
                    credit(&mut balances, SystemLedger::Cgst.name(), &v.total_cgst);
                    credit(&mut balances, SystemLedger::Sgst.name(), &v.total_sgst);
                }
            }
            Voucher::Payment(v) => {
                debit(&mut balances, &v.party, &v.amount);
                credit(&mut balances, &v.account, &v.amount);
            }
            Voucher::Receipt(v) => {
                credit(&mut balances, &v.party, &v.amount);
                debit(&mut balances, &v.account, &v.amount);
            }
            Voucher::Contra(v) => {
                credit(&mut balances, &v.from_account, &v.amount);
                debit(&mut balances, &v.to_account, &v.amount);
            }
            Voucher::Journal(v) => {
                for entry in &v.entries {
                    debit(&mut balances, &entry.ledger, &entry.debit);
                    credit(&mut balances, &entry.ledger, &entry.credit);
                }
            }
        }
    }

    let zero = BigDecimal::from(0);
    let mut rows = Vec::new();
    let mut total_debit = BigDecimal::from(0);
    let mut total_credit = BigDecimal::from(0);

    for (ledger, (debit, credit)) in balances {
        let row = if debit > credit {
            TrialBalanceRow {
                ledger,
                debit: &debit - &credit,
                credit: zero.clone(),
            }
        } else if credit > debit {
            TrialBalanceRow {
                ledger,
                debit: zero.clone(),
                credit: &credit - &debit,
            }
        } else {
            continue;
        };
        total_debit += &row.debit;
        total_credit += &row.credit;
        rows.push(row);
    }

    TrialBalance {
        rows,
        total_debit,
        total_credit,
    }
}

fn ensure(balances: &mut IndexMap<String, (BigDecimal, BigDecimal)>, name: &str) {
    if name.is_empty() {
        return;
    }
    if !balances.contains_key(name) {
        balances.insert(
            name.to_string(),
            (BigDecimal::from(0), BigDecimal::from(0)),
        );
    }
}

fn debit(balances: &mut IndexMap<String, (BigDecimal, BigDecimal)>, name: &str, amount: &BigDecimal) {
    if name.is_empty() {
        return;
    }
    ensure(balances, name);
    if let Some((d, _)) = balances.get_mut(name) {
        *d += amount;
    }
}

fn credit(balances: &mut IndexMap<String, (BigDecimal, BigDecimal)>, name: &str, amount: &BigDecimal) {
    if name.is_empty() {
        return;
    }
    ensure(balances, name);
    if let Some((_, c)) = balances.get_mut(name) {
        *c += amount;
    }
}
