//! Headline figures for the dashboard

use std::collections::{BTreeMap, HashMap};

use bigdecimal::BigDecimal;
use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::books::registry::groups;
use crate::books::Registry;
use crate::types::Voucher;

/// Sales and purchase turnover for one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyActivity {
    /// Month label such as "Jun 24"
    pub label: String,
    pub sales: BigDecimal,
    pub purchases: BigDecimal,
}

/// Aggregates shown on the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_sales: BigDecimal,
    pub total_purchases: BigDecimal,
    /// Outstanding debit balances across Sundry Debtors
    pub receivables: BigDecimal,
    /// Outstanding credit balances across Sundry Creditors
    pub payables: BigDecimal,
    /// Up to the last six months with trade activity, oldest first
    pub monthly: Vec<MonthlyActivity>,
}

/// Fold the register into dashboard figures.
///
/// Party balances follow the receivable convention: sales raise a party's
/// balance, receipts lower it, and the mirror holds for purchases and
/// payments. Only parties grouped under Sundry Debtors or Sundry Creditors
/// feed the receivable and payable totals.
pub fn dashboard(registry: &Registry, vouchers: &[Voucher]) -> DashboardSummary {
    let zero = BigDecimal::from(0);
    let mut total_sales = BigDecimal::from(0);
    let mut total_purchases = BigDecimal::from(0);
    let mut balances: HashMap<String, BigDecimal> = HashMap::new();
    let mut monthly: BTreeMap<(i32, u32), (BigDecimal, BigDecimal)> = BTreeMap::new();

    for ledger in registry.ledgers() {
        balances.insert(ledger.name.clone(), zero.clone());
    }

    for voucher in vouchers {
        match voucher {
            Voucher::Sales(v) => {
                total_sales += &v.total;
                *balances.entry(v.party.clone()).or_insert_with(|| zero.clone()) += &v.total;

                let bucket = monthly
                    .entry((v.date.year(), v.date.month()))
                    .or_insert_with(|| (zero.clone(), zero.clone()));
                bucket.0 += &v.total;
            }
            Voucher::Purchase(v) => {
                total_purchases += &v.total;
                *balances.entry(v.party.clone()).or_insert_with(|| zero.clone()) -= &v.total;

                let bucket = monthly
                    .entry((v.date.year(), v.date.month()))
                    .or_insert_with(|| (zero.clone(), zero.clone()));
                bucket.1 += &v.total;
            }
            Voucher::Receipt(v) => {
                *balances.entry(v.party.clone()).or_insert_with(|| zero.clone()) -= &v.amount;
            }
            Voucher::Payment(v) => {
                *balances.entry(v.party.clone()).or_insert_with(|| zero.clone()) += &v.amount;
            }
            _ => {}
        }
    }

    let mut receivables = BigDecimal::from(0);
    let mut payables = BigDecimal::from(0);
    for ledger in registry.ledgers() {
        if let Some(balance) = balances.get(&ledger.name) {
            if ledger.group == groups::SUNDRY_DEBTORS && *balance > zero {
                receivables += balance;
            }
            if ledger.group == groups::SUNDRY_CREDITORS && *balance < zero {
                payables += -balance;
            }
        }
    }

    let months: Vec<MonthlyActivity> = monthly
        .into_iter()
        .map(|((year, month), (sales, purchases))| {
            let label = chrono::NaiveDate::from_ymd_opt(year, month, 1)
                .map(|d| d.format("%b %y").to_string())
                .unwrap_or_default();
            MonthlyActivity {
                label,
                sales,
                purchases,
            }
        })
        .collect();
    let skip = months.len().saturating_sub(6);

    DashboardSummary {
        total_sales,
        total_purchases,
        receivables,
        payables,
        monthly: months.into_iter().skip(skip).collect(),
    }
}
