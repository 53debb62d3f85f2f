//! GST return preparation
//!
//! Covers the returns the register can actually answer: GSTR-1 (outward),
//! GSTR-2/2A/2B (inward from registered suppliers) and the GSTR-3B summary.
//! Every other form resolves to a placeholder so callers can enumerate the
//! full set.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::books::Registry;
use crate::types::{Ledger, RegistrationType, TradeVoucher, Voucher};

/// The GST return forms a filer can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GstrForm {
    Gstr1,
    Gstr2,
    Gstr2a,
    Gstr2b,
    Gstr3,
    Gstr3a,
    Gstr3b,
    Gstr4,
    Gstr5,
    Gstr5a,
    Gstr6,
    Gstr7,
    Gstr8,
    Gstr9,
    Gstr9a,
    Gstr9c,
    Gstr10,
    Gstr10a,
}

impl GstrForm {
    /// Every form, in filing-number order
    pub const ALL: [GstrForm; 18] = [
        GstrForm::Gstr1,
        GstrForm::Gstr2,
        GstrForm::Gstr2a,
        GstrForm::Gstr2b,
        GstrForm::Gstr3,
        GstrForm::Gstr3a,
        GstrForm::Gstr3b,
        GstrForm::Gstr4,
        GstrForm::Gstr5,
        GstrForm::Gstr5a,
        GstrForm::Gstr6,
        GstrForm::Gstr7,
        GstrForm::Gstr8,
        GstrForm::Gstr9,
        GstrForm::Gstr9a,
        GstrForm::Gstr9c,
        GstrForm::Gstr10,
        GstrForm::Gstr10a,
    ];

    /// Official form label, e.g. "GSTR-3B"
    pub fn label(&self) -> &'static str {
        match self {
            GstrForm::Gstr1 => "GSTR-1",
            GstrForm::Gstr2 => "GSTR-2",
            GstrForm::Gstr2a => "GSTR-2A",
            GstrForm::Gstr2b => "GSTR-2B",
            GstrForm::Gstr3 => "GSTR-3",
            GstrForm::Gstr3a => "GSTR-3A",
            GstrForm::Gstr3b => "GSTR-3B",
            GstrForm::Gstr4 => "GSTR-4",
            GstrForm::Gstr5 => "GSTR-5",
            GstrForm::Gstr5a => "GSTR-5A",
            GstrForm::Gstr6 => "GSTR-6",
            GstrForm::Gstr7 => "GSTR-7",
            GstrForm::Gstr8 => "GSTR-8",
            GstrForm::Gstr9 => "GSTR-9",
            GstrForm::Gstr9a => "GSTR-9A",
            GstrForm::Gstr9c => "GSTR-9C",
            GstrForm::Gstr10 => "GSTR-10",
            GstrForm::Gstr10a => "GSTR-10A",
        }
    }
}

/// One invoice line in a return's B2B or B2C table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GstInvoiceEntry {
    pub id: String,
    pub date: chrono::NaiveDate,
    pub invoice_no: String,
    pub party: String,
    /// The party's GSTIN where the master carries one
    pub gstin: Option<String>,
    pub taxable_value: BigDecimal,
    pub total_tax: BigDecimal,
    pub invoice_value: BigDecimal,
}

impl GstInvoiceEntry {
    fn from_trade(voucher: &TradeVoucher, ledger: Option<&Ledger>) -> Self {
        Self {
            id: voucher.id.clone(),
            date: voucher.date,
            invoice_no: voucher.invoice_no.clone(),
            party: voucher.party.clone(),
            gstin: ledger.and_then(|l| l.gstin.clone()),
            taxable_value: voucher.total_taxable_amount.clone(),
            total_tax: &voucher.total_cgst + &voucher.total_sgst + &voucher.total_igst,
            invoice_value: voucher.total.clone(),
        }
    }
}

/// GSTR-1: outward supplies split by counterparty registration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gstr1Report {
    /// Sales to registered dealers carrying a GSTIN
    pub b2b: Vec<GstInvoiceEntry>,
    /// Everything else, including sales to parties with no ledger master
    pub b2c: Vec<GstInvoiceEntry>,
}

/// GSTR-2/2A/2B: inward supplies from registered suppliers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gstr2Report {
    /// Which of the three inward forms this answers
    pub form: GstrForm,
    pub b2b_purchases: Vec<GstInvoiceEntry>,
}

/// Tax amounts per head
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxHeads {
    pub igst: BigDecimal,
    pub cgst: BigDecimal,
    pub sgst: BigDecimal,
}

impl TaxHeads {
    fn zero() -> Self {
        Self {
            igst: BigDecimal::from(0),
            cgst: BigDecimal::from(0),
            sgst: BigDecimal::from(0),
        }
    }

    /// Sum across the three heads
    pub fn total(&self) -> BigDecimal {
        &self.igst + &self.cgst + &self.sgst
    }
}

/// Section 3.1 of GSTR-3B: all outward supplies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutwardSupplies {
    pub taxable_value: BigDecimal,
    pub tax: TaxHeads,
}

/// GSTR-3B consolidated summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gstr3bReport {
    pub outward: OutwardSupplies,
    /// Input tax credit from purchases off registered suppliers
    pub itc: TaxHeads,
    /// Outward tax minus ITC, per head; may go negative when credit exceeds
    /// liability
    pub tax_payable: TaxHeads,
}

impl Gstr3bReport {
    /// Payable figures for presentation, floored at zero per head
    pub fn payable_for_display(&self) -> TaxHeads {
        let zero = BigDecimal::from(0);
        let floor = |v: &BigDecimal| if *v > zero { v.clone() } else { zero.clone() };
        TaxHeads {
            igst: floor(&self.tax_payable.igst),
            cgst: floor(&self.tax_payable.cgst),
            sgst: floor(&self.tax_payable.sgst),
        }
    }
}

/// The answer to a GST return request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GstReturn {
    Outward(Gstr1Report),
    Inward(Gstr2Report),
    Summary(Gstr3bReport),
    /// Forms the register has no data model for yet
    NotYetImplemented(GstrForm),
}

fn is_registered_with_gstin(ledger: Option<&Ledger>) -> bool {
    ledger.map_or(false, |l| {
        l.registration_type == Some(RegistrationType::Registered)
            && l.gstin.as_deref().map_or(false, |g| !g.is_empty())
    })
}

/// Prepare GSTR-1 over every sales voucher in the register.
pub fn gstr1(registry: &Registry, vouchers: &[Voucher]) -> Gstr1Report {
    let mut b2b = Vec::new();
    let mut b2c = Vec::new();

    for voucher in vouchers {
        if let Voucher::Sales(v) = voucher {
            let ledger = registry.ledger(&v.party);
            let entry = GstInvoiceEntry::from_trade(v, ledger);
            if is_registered_with_gstin(ledger) {
                b2b.push(entry);
            } else {
                b2c.push(entry);
            }
        }
    }

    Gstr1Report { b2b, b2c }
}

/// Prepare an inward-supplies return (GSTR-2, 2A or 2B share the shape).
pub fn gstr2(registry: &Registry, vouchers: &[Voucher], form: GstrForm) -> Gstr2Report {
    let mut b2b_purchases = Vec::new();

    for voucher in vouchers {
        if let Voucher::Purchase(v) = voucher {
            let ledger = registry.ledger(&v.party);
            if is_registered_with_gstin(ledger) {
                b2b_purchases.push(GstInvoiceEntry::from_trade(v, ledger));
            }
        }
    }

    Gstr2Report {
        form,
        b2b_purchases,
    }
}

/// Prepare the GSTR-3B summary.
///
/// Outward supplies cover every sales voucher. ITC covers purchases whose
/// party master is Registered; unlike the invoice-level returns this does
/// not insist on a GSTIN.
pub fn gstr3b(registry: &Registry, vouchers: &[Voucher]) -> Gstr3bReport {
    let mut outward = OutwardSupplies {
        taxable_value: BigDecimal::from(0),
        tax: TaxHeads::zero(),
    };
    let mut itc = TaxHeads::zero();

    for voucher in vouchers {
        match voucher {
            Voucher::Sales(v) => {
                outward.taxable_value += &v.total_taxable_amount;
                outward.tax.igst += &v.total_igst;
                outward.tax.cgst += &v.total_cgst;
                outward.tax.sgst += &v.total_sgst;
            }
            Voucher::Purchase(v) => {
                let registered = registry
                    .ledger(&v.party)
                    .map_or(false, |l| l.registration_type == Some(RegistrationType::Registered));
                if registered {
                    itc.igst += &v.total_igst;
                    itc.cgst += &v.total_cgst;
                    itc.sgst += &v.total_sgst;
                }
            }
            _ => {}
        }
    }

    let tax_payable = TaxHeads {
        igst: &outward.tax.igst - &itc.igst,
        cgst: &outward.tax.cgst - &itc.cgst,
        sgst: &outward.tax.sgst - &itc.sgst,
    };

    Gstr3bReport {
        outward,
        itc,
        tax_payable,
    }
}

/// Prepare whichever return `form` names.
pub fn gst_return(registry: &Registry, vouchers: &[Voucher], form: GstrForm) -> GstReturn {
    match form {
        GstrForm::Gstr1 => GstReturn::Outward(gstr1(registry, vouchers)),
        GstrForm::Gstr2 | GstrForm::Gstr2a | GstrForm::Gstr2b => {
            GstReturn::Inward(gstr2(registry, vouchers, form))
        }
        GstrForm::Gstr3b => GstReturn::Summary(gstr3b(registry, vouchers)),
        other => GstReturn::NotYetImplemented(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Company, TradeVoucher, VoucherLine};
    use chrono::NaiveDate;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn registry() -> Registry {
        let mut registry = Registry::standard(Company::new("Test Co", "Karnataka"));
        registry
            .add_ledger(Ledger::party(
                "Registered Buyer",
                "Sundry Debtors",
                Some("29AAAAA0000A1Z5".to_string()),
                Some(RegistrationType::Registered),
                Some("Karnataka".to_string()),
            ))
            .unwrap();
        registry
            .add_ledger(Ledger::party(
                "Walk-in Buyer",
                "Sundry Debtors",
                None,
                Some(RegistrationType::Unregistered),
                Some("Karnataka".to_string()),
            ))
            .unwrap();
        registry
            .add_ledger(Ledger::party(
                "Registered Vendor",
                "Sundry Creditors",
                Some("27BBBBB0000B1Z5".to_string()),
                Some(RegistrationType::Registered),
                Some("Maharashtra".to_string()),
            ))
            .unwrap();
        registry
    }

    fn trade(kind: &str, party: &str, taxable: i64, cgst: i64, sgst: i64, igst: i64) -> Voucher {
        let total = taxable + cgst + sgst + igst;
        let inner = TradeVoucher {
            id: format!("{}-{}", kind, party),
            date: date(),
            is_inter_state: igst > 0,
            invoice_no: "INV-1".to_string(),
            due_date: None,
            party: party.to_string(),
            items: vec![VoucherLine {
                name: "Widget".to_string(),
                qty: BigDecimal::from(1),
                rate: BigDecimal::from(taxable),
                taxable_amount: BigDecimal::from(taxable),
                cgst_amount: BigDecimal::from(cgst),
                sgst_amount: BigDecimal::from(sgst),
                igst_amount: BigDecimal::from(igst),
                total_amount: BigDecimal::from(total),
            }],
            total_taxable_amount: BigDecimal::from(taxable),
            total_cgst: BigDecimal::from(cgst),
            total_sgst: BigDecimal::from(sgst),
            total_igst: BigDecimal::from(igst),
            total: BigDecimal::from(total),
            narration: None,
        };
        if kind == "sale" {
            Voucher::Sales(inner)
        } else {
            Voucher::Purchase(inner)
        }
    }

    #[test]
    fn test_gstr1_splits_b2b_from_b2c() {
        let registry = registry();
        let vouchers = vec![
            trade("sale", "Registered Buyer", 1000, 90, 90, 0),
            trade("sale", "Walk-in Buyer", 500, 45, 45, 0),
            trade("sale", "Unknown Party", 200, 18, 18, 0),
        ];

        let report = gstr1(&registry, &vouchers);
        assert_eq!(report.b2b.len(), 1);
        assert_eq!(report.b2b[0].party, "Registered Buyer");
        assert_eq!(report.b2b[0].gstin.as_deref(), Some("29AAAAA0000A1Z5"));
        assert_eq!(report.b2b[0].total_tax, BigDecimal::from(180));
        // Unregistered and unknown parties both land in B2C
        assert_eq!(report.b2c.len(), 2);
    }

    #[test]
    fn test_gstr2_only_lists_registered_suppliers() {
        let registry = registry();
        let vouchers = vec![
            trade("purchase", "Registered Vendor", 2000, 0, 0, 360),
            trade("purchase", "Cash Vendor", 800, 72, 72, 0),
        ];

        let report = gstr2(&registry, &vouchers, GstrForm::Gstr2a);
        assert_eq!(report.form, GstrForm::Gstr2a);
        assert_eq!(report.b2b_purchases.len(), 1);
        assert_eq!(report.b2b_purchases[0].invoice_value, BigDecimal::from(2360));
    }

    #[test]
    fn test_gstr3b_summary_and_negative_payable() {
        let registry = registry();
        let vouchers = vec![
            trade("sale", "Walk-in Buyer", 1000, 90, 90, 0),
            trade("purchase", "Registered Vendor", 5000, 0, 0, 900),
        ];

        let report = gstr3b(&registry, &vouchers);
        assert_eq!(report.outward.taxable_value, BigDecimal::from(1000));
        assert_eq!(report.outward.tax.cgst, BigDecimal::from(90));
        assert_eq!(report.itc.igst, BigDecimal::from(900));
        // Raw payable keeps the sign
        assert_eq!(report.tax_payable.igst, BigDecimal::from(-900));
        // Display floors at zero
        let display = report.payable_for_display();
        assert_eq!(display.igst, BigDecimal::from(0));
        assert_eq!(display.cgst, BigDecimal::from(90));
    }

    #[test]
    fn test_itc_ignores_unregistered_purchases() {
        let registry = registry();
        let vouchers = vec![trade("purchase", "Cash Vendor", 800, 72, 72, 0)];

        let report = gstr3b(&registry, &vouchers);
        assert_eq!(report.itc.total(), BigDecimal::from(0));
    }

    #[test]
    fn test_unimplemented_forms_resolve_to_placeholder() {
        let registry = registry();
        match gst_return(&registry, &[], GstrForm::Gstr9) {
            GstReturn::NotYetImplemented(form) => assert_eq!(form.label(), "GSTR-9"),
            other => panic!("unexpected return: {:?}", other),
        }
        assert_eq!(GstrForm::ALL.len(), 18);
    }
}
