//! GST (Goods and Services Tax) computation for Indian tax compliance
//!
//! Tax is computed once, at voucher-construction time, and persisted on the
//! voucher lines; reports only aggregate the persisted figures. The split
//! between the tax heads depends on the supply scope: intra-state supplies
//! split the tax equally between CGST and SGST, inter-state supplies carry
//! the whole tax as IGST.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::books::Registry;
use crate::types::{TradeVoucher, VoucherLine};

/// Supply scope of a trade, deciding the CGST/SGST vs IGST split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaxScope {
    /// Party and company are in the same state (or states are unknown)
    IntraState,
    /// Party and company are in different states
    InterState,
}

impl TaxScope {
    /// Determine the scope from the party's state and the company's state
    ///
    /// The comparison is case-insensitive. A missing or blank state on either
    /// side means the scope cannot be established and defaults to intra-state.
    pub fn between(party_state: Option<&str>, company_state: &str) -> Self {
        let party = party_state.map(str::trim).unwrap_or("");
        let company = company_state.trim();
        if party.is_empty() || company.is_empty() {
            return TaxScope::IntraState;
        }
        if party.eq_ignore_ascii_case(company) {
            TaxScope::IntraState
        } else {
            TaxScope::InterState
        }
    }

    /// Scope from a persisted inter-state flag
    pub fn from_flag(is_inter_state: bool) -> Self {
        if is_inter_state {
            TaxScope::InterState
        } else {
            TaxScope::IntraState
        }
    }

    pub fn is_inter_state(&self) -> bool {
        matches!(self, TaxScope::InterState)
    }
}

/// Rate to assume when a voucher line names an item the registry does not know
///
/// Manual entry, spreadsheet import, and party-driven repricing fall back to
/// zero; only the scanned-invoice intake assumes the standard 18% slab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateFallback {
    Zero,
    AssumeStandard,
}

impl RateFallback {
    /// The fallback rate percentage
    pub fn rate(&self) -> BigDecimal {
        match self {
            RateFallback::Zero => BigDecimal::from(0),
            RateFallback::AssumeStandard => GstSlab::Standard.rate(),
        }
    }
}

/// Conventional GST rate slabs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GstSlab {
    /// Essential items (food, medicines, etc.) - 0%
    Exempt,
    /// Reduced rate items - 5%
    Reduced,
    /// Merit rate items - 12%
    Merit,
    /// Standard rate items - 18%
    Standard,
    /// Luxury/sin goods - 28%
    Luxury,
}

impl GstSlab {
    /// Rate percentage for this slab
    pub fn rate(&self) -> BigDecimal {
        match self {
            GstSlab::Exempt => BigDecimal::from(0),
            GstSlab::Reduced => BigDecimal::from(5),
            GstSlab::Merit => BigDecimal::from(12),
            GstSlab::Standard => BigDecimal::from(18),
            GstSlab::Luxury => BigDecimal::from(28),
        }
    }
}

/// Price one voucher line
///
/// `taxable = qty × rate`, `tax = taxable × gst_rate / 100`, split per scope,
/// `total = taxable + tax`.
pub fn price_line(
    name: impl Into<String>,
    qty: BigDecimal,
    rate: BigDecimal,
    gst_rate: &BigDecimal,
    scope: TaxScope,
) -> VoucherLine {
    let taxable_amount = &qty * &rate;
    let tax = (&taxable_amount * gst_rate) / BigDecimal::from(100);
    let (cgst_amount, sgst_amount, igst_amount) = match scope {
        TaxScope::InterState => (BigDecimal::from(0), BigDecimal::from(0), tax.clone()),
        TaxScope::IntraState => {
            let half = &tax / BigDecimal::from(2);
            (half.clone(), half, BigDecimal::from(0))
        }
    };
    let total_amount = &taxable_amount + &tax;
    VoucherLine {
        name: name.into(),
        qty,
        rate,
        taxable_amount,
        cgst_amount,
        sgst_amount,
        igst_amount,
        total_amount,
    }
}

/// Look up the GST rate for an item name, case-insensitively
///
/// Returns the registry rate when the item is known and carries one, the
/// fallback rate otherwise.
pub fn resolve_item_rate(registry: &Registry, item_name: &str, fallback: RateFallback) -> BigDecimal {
    registry
        .match_stock_item(item_name)
        .and_then(|item| item.gst_rate.clone())
        .unwrap_or_else(|| fallback.rate())
}

/// Determine the supply scope for a party against the company profile
///
/// The party ledger is looked up case-insensitively; an unknown party (or
/// one without a state) yields intra-state.
pub fn scope_for_party(registry: &Registry, party: &str) -> TaxScope {
    let party_state = registry.match_ledger(party).and_then(|l| l.state.as_deref());
    TaxScope::between(party_state, &registry.company().state)
}

/// Re-price every line of a trade voucher under a scope
///
/// Rates are resolved from the registry per line name with the given
/// fallback; the inter-state flag and all totals are rewritten. Repricing is
/// idempotent: pricing twice under the same scope changes nothing.
pub fn reprice_trade(
    voucher: &mut TradeVoucher,
    registry: &Registry,
    scope: TaxScope,
    fallback: RateFallback,
) {
    voucher.is_inter_state = scope.is_inter_state();
    voucher.items = voucher
        .items
        .iter()
        .map(|line| {
            let rate = resolve_item_rate(registry, &line.name, fallback);
            price_line(
                line.name.clone(),
                line.qty.clone(),
                line.rate.clone(),
                &rate,
                scope,
            )
        })
        .collect();
    voucher.recompute_totals();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Company, Ledger, StockItem};

    fn dec(n: i64) -> BigDecimal {
        BigDecimal::from(n)
    }

    #[test]
    fn test_intra_state_line_splits_tax_evenly() {
        let line = price_line("Laptop", dec(2), dec(65000), &dec(18), TaxScope::IntraState);

        assert_eq!(line.taxable_amount, dec(130000));
        assert_eq!(line.cgst_amount, dec(11700));
        assert_eq!(line.sgst_amount, dec(11700));
        assert_eq!(line.igst_amount, dec(0));
        assert_eq!(line.total_amount, dec(153400));
    }

    #[test]
    fn test_inter_state_line_carries_igst_only() {
        let line = price_line("Server Rack", dec(5), dec(55000), &dec(18), TaxScope::InterState);

        assert_eq!(line.taxable_amount, dec(275000));
        assert_eq!(line.cgst_amount, dec(0));
        assert_eq!(line.sgst_amount, dec(0));
        assert_eq!(line.igst_amount, dec(49500));
        assert_eq!(line.total_amount, dec(324500));
    }

    #[test]
    fn test_scope_between_states() {
        assert_eq!(
            TaxScope::between(Some("Karnataka"), "Karnataka"),
            TaxScope::IntraState
        );
        assert_eq!(
            TaxScope::between(Some("karnataka"), "KARNATAKA"),
            TaxScope::IntraState
        );
        assert_eq!(
            TaxScope::between(Some("Maharashtra"), "Karnataka"),
            TaxScope::InterState
        );
        // Unknown on either side falls back to intra-state
        assert_eq!(TaxScope::between(None, "Karnataka"), TaxScope::IntraState);
        assert_eq!(TaxScope::between(Some(""), "Karnataka"), TaxScope::IntraState);
        assert_eq!(TaxScope::between(Some("Kerala"), ""), TaxScope::IntraState);
    }

    #[test]
    fn test_scope_for_party_matches_ledger_case_insensitively() {
        let mut registry = Registry::standard(Company::new("Acme", "Karnataka"));
        let mut party = Ledger::new("Chennai Retail", "Sundry Debtors");
        party.state = Some("Tamil Nadu".to_string());
        registry.add_ledger(party).unwrap();

        assert_eq!(
            scope_for_party(&registry, "chennai retail"),
            TaxScope::InterState
        );
        assert_eq!(
            scope_for_party(&registry, "CHENNAI RETAIL"),
            TaxScope::InterState
        );
        // Unknown party falls back to intra-state
        assert_eq!(scope_for_party(&registry, "Nobody"), TaxScope::IntraState);
    }

    #[test]
    fn test_rate_resolution_and_fallbacks() {
        let mut registry = Registry::standard(Company::new("Acme", "Karnataka"));
        let mut item = StockItem::new("Laptop", "Electronics", "Nos");
        item.gst_rate = Some(dec(28));
        registry.add_stock_item(item).unwrap();

        // Known item: registry rate wins, matched case-insensitively
        assert_eq!(
            resolve_item_rate(&registry, "laptop", RateFallback::Zero),
            dec(28)
        );
        // Unknown item: policy decides
        assert_eq!(
            resolve_item_rate(&registry, "Mouse", RateFallback::Zero),
            dec(0)
        );
        assert_eq!(
            resolve_item_rate(&registry, "Mouse", RateFallback::AssumeStandard),
            dec(18)
        );
    }

    #[test]
    fn test_reprice_is_idempotent() {
        let registry = Registry::standard(Company::new("Acme", "Karnataka"));
        let mut voucher = TradeVoucher {
            id: String::new(),
            date: chrono::NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            is_inter_state: false,
            invoice_no: "INV-1".to_string(),
            due_date: None,
            party: "Beta Traders".to_string(),
            items: vec![price_line("Widget", dec(3), dec(100), &dec(18), TaxScope::IntraState)],
            total_taxable_amount: dec(0),
            total_cgst: dec(0),
            total_sgst: dec(0),
            total_igst: dec(0),
            total: dec(0),
            narration: None,
        };
        voucher.recompute_totals();

        reprice_trade(&mut voucher, &registry, TaxScope::InterState, RateFallback::Zero);
        let once = voucher.clone();
        reprice_trade(&mut voucher, &registry, TaxScope::InterState, RateFallback::Zero);

        assert_eq!(voucher, once);
        assert!(voucher.is_inter_state);
        assert_eq!(voucher.total_cgst, dec(0));
        assert_eq!(voucher.total_sgst, dec(0));
    }

    #[test]
    fn test_slab_rates() {
        assert_eq!(GstSlab::Exempt.rate(), dec(0));
        assert_eq!(GstSlab::Reduced.rate(), dec(5));
        assert_eq!(GstSlab::Merit.rate(), dec(12));
        assert_eq!(GstSlab::Standard.rate(), dec(18));
        assert_eq!(GstSlab::Luxury.rate(), dec(28));
    }
}
