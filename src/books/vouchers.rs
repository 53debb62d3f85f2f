//! Voucher store and creation helpers
//!
//! The store is an ordered list: newest date first, insertion order preserved
//! among equal dates. Vouchers are appended or edited in place, never
//! deleted; every report derives from a full pass over this list.

use chrono::{SecondsFormat, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::types::*;

/// Generate a voucher id: UTC timestamp plus a random suffix
pub fn next_voucher_id() -> String {
    let stamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    let noise = Uuid::new_v4().simple().to_string();
    format!("{}-{}", stamp, &noise[..8])
}

/// The ordered voucher store
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VoucherStore {
    vouchers: Vec<Voucher>,
}

impl VoucherStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from a persisted list, restoring date order
    pub fn from_vouchers(mut vouchers: Vec<Voucher>) -> Self {
        vouchers.sort_by(|a, b| b.date().cmp(&a.date()));
        Self { vouchers }
    }

    /// Accept a voucher into the store
    ///
    /// Assigns an id when the voucher carries none, then re-sorts by date
    /// descending (the sort is stable, so vouchers sharing a date keep their
    /// arrival order). Returns the voucher's id.
    pub fn append(&mut self, mut voucher: Voucher) -> String {
        if voucher.id().is_empty() {
            voucher.set_id(next_voucher_id());
        }
        let id = voucher.id().to_string();
        debug!(id = %id, voucher_type = voucher.voucher_type(), "voucher appended");
        self.vouchers.push(voucher);
        self.vouchers.sort_by(|a, b| b.date().cmp(&a.date()));
        id
    }

    /// Replace a voucher in place, matched by id
    ///
    /// The voucher keeps its position in the list even when its date changed.
    pub fn update(&mut self, voucher: Voucher) -> BooksResult<()> {
        if voucher.id().is_empty() {
            return Err(BooksError::Validation(
                "Cannot update a voucher without an id".to_string(),
            ));
        }
        match self.vouchers.iter_mut().find(|v| v.id() == voucher.id()) {
            Some(slot) => {
                debug!(id = %voucher.id(), "voucher updated");
                *slot = voucher;
                Ok(())
            }
            None => Err(BooksError::VoucherNotFound(voucher.id().to_string())),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Voucher> {
        self.vouchers.iter().find(|v| v.id() == id)
    }

    pub fn as_slice(&self) -> &[Voucher] {
        &self.vouchers
    }

    pub fn iter(&self) -> impl Iterator<Item = &Voucher> {
        self.vouchers.iter()
    }

    pub fn len(&self) -> usize {
        self.vouchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vouchers.is_empty()
    }

    /// The most recently dated vouchers, up to `count`
    pub fn recent(&self, count: usize) -> &[Voucher] {
        &self.vouchers[..count.min(self.vouchers.len())]
    }
}

/// Voucher construction helpers
///
/// These mirror the entry forms: they derive everything the voucher persists
/// (supply scope, line taxes, totals) from the drafts and the registry, so a
/// voucher built here already satisfies the tax and totals invariants.
pub mod build {
    use bigdecimal::BigDecimal;
    use chrono::NaiveDate;

    use crate::books::Registry;
    use crate::tax::gst::{self, RateFallback};
    use crate::types::*;

    /// An unpriced trade line: item name, quantity, unit rate
    #[derive(Debug, Clone)]
    pub struct LineDraft {
        pub name: String,
        pub qty: BigDecimal,
        pub rate: BigDecimal,
    }

    impl LineDraft {
        pub fn new(name: impl Into<String>, qty: BigDecimal, rate: BigDecimal) -> Self {
            Self {
                name: name.into(),
                qty,
                rate,
            }
        }
    }

    /// Inputs for a purchase or sales voucher
    #[derive(Debug, Clone)]
    pub struct TradeDraft {
        pub date: NaiveDate,
        pub invoice_no: String,
        pub due_date: Option<NaiveDate>,
        pub party: String,
        pub lines: Vec<LineDraft>,
        pub narration: Option<String>,
    }

    /// Build a trade voucher
    ///
    /// The supply scope comes from the party's state against the company
    /// state; line GST rates come from the registry (unknown items are
    /// taxed at zero).
    pub fn trade_voucher(registry: &Registry, kind: TradeKind, draft: TradeDraft) -> Voucher {
        let scope = gst::scope_for_party(registry, &draft.party);
        let items = draft
            .lines
            .into_iter()
            .map(|line| {
                let rate = gst::resolve_item_rate(registry, &line.name, RateFallback::Zero);
                gst::price_line(line.name, line.qty, line.rate, &rate, scope)
            })
            .collect();
        let mut voucher = TradeVoucher {
            id: String::new(),
            date: draft.date,
            is_inter_state: scope.is_inter_state(),
            invoice_no: draft.invoice_no,
            due_date: draft.due_date,
            party: draft.party,
            items,
            total_taxable_amount: BigDecimal::from(0),
            total_cgst: BigDecimal::from(0),
            total_sgst: BigDecimal::from(0),
            total_igst: BigDecimal::from(0),
            total: BigDecimal::from(0),
            narration: draft.narration,
        };
        voucher.recompute_totals();
        Voucher::trade(kind, voucher)
    }

    /// Build a payment or receipt voucher
    pub fn settlement(
        kind: SettlementKind,
        date: NaiveDate,
        account: impl Into<String>,
        party: impl Into<String>,
        amount: BigDecimal,
        narration: Option<String>,
    ) -> Voucher {
        Voucher::settlement(
            kind,
            SettlementVoucher {
                id: String::new(),
                date,
                account: account.into(),
                party: party.into(),
                amount,
                narration,
            },
        )
    }

    /// Build a contra voucher moving money between two accounts
    pub fn contra(
        date: NaiveDate,
        from_account: impl Into<String>,
        to_account: impl Into<String>,
        amount: BigDecimal,
        narration: Option<String>,
    ) -> Voucher {
        Voucher::Contra(ContraVoucher {
            id: String::new(),
            date,
            from_account: from_account.into(),
            to_account: to_account.into(),
            amount,
            narration,
        })
    }

    /// Build a journal voucher
    ///
    /// Totals are computed from the entries; an unbalanced or zero journal is
    /// rejected here, before it can reach the store.
    pub fn journal(
        date: NaiveDate,
        entries: Vec<JournalEntry>,
        narration: Option<String>,
    ) -> BooksResult<Voucher> {
        let mut voucher = JournalVoucher {
            id: String::new(),
            date,
            entries,
            total_debit: BigDecimal::from(0),
            total_credit: BigDecimal::from(0),
            narration,
        };
        voucher.recompute_totals();
        if !voucher.is_balanced() {
            return Err(BooksError::InvalidVoucher(format!(
                "Journal voucher is not balanced: debits = {}, credits = {}",
                voucher.total_debit, voucher.total_credit
            )));
        }
        Ok(Voucher::Journal(voucher))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use chrono::NaiveDate;

    fn settlement_on(day: u32, id: &str) -> Voucher {
        Voucher::Payment(SettlementVoucher {
            id: id.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
            account: "Cash".to_string(),
            party: "Acme Suppliers".to_string(),
            amount: BigDecimal::from(1000),
            narration: None,
        })
    }

    #[test]
    fn test_store_keeps_newest_first() {
        let mut store = VoucherStore::new();
        store.append(settlement_on(10, "a"));
        store.append(settlement_on(20, "b"));
        store.append(settlement_on(15, "c"));

        let ids: Vec<&str> = store.iter().map(|v| v.id()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_equal_dates_keep_arrival_order() {
        let mut store = VoucherStore::new();
        store.append(settlement_on(10, "first"));
        store.append(settlement_on(10, "second"));
        store.append(settlement_on(10, "third"));

        let ids: Vec<&str> = store.iter().map(|v| v.id()).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_blank_ids_are_assigned() {
        let mut store = VoucherStore::new();
        let id = store.append(settlement_on(10, ""));
        assert!(!id.is_empty());
        assert!(store.get(&id).is_some());
    }

    #[test]
    fn test_update_replaces_in_place() {
        let mut store = VoucherStore::new();
        store.append(settlement_on(10, "a"));
        store.append(settlement_on(20, "b"));

        // Move "a" to the newest date; its position must not change
        let updated = settlement_on(25, "a");
        store.update(updated).unwrap();
        let ids: Vec<&str> = store.iter().map(|v| v.id()).collect();
        assert_eq!(ids, vec!["b", "a"]);

        let missing = settlement_on(1, "zzz");
        assert!(matches!(
            store.update(missing),
            Err(BooksError::VoucherNotFound(_))
        ));
    }

    #[test]
    fn test_journal_builder_rejects_unbalanced_entries() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let unbalanced = build::journal(
            date,
            vec![
                JournalEntry::debit("Rent Expense", BigDecimal::from(15000)),
                JournalEntry::credit("Cash", BigDecimal::from(14000)),
            ],
            None,
        );
        assert!(matches!(unbalanced, Err(BooksError::InvalidVoucher(_))));

        let empty = build::journal(date, vec![], None);
        assert!(empty.is_err());
    }
}
