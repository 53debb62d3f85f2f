//! Validation utilities

use crate::traits::*;
use crate::types::*;
use bigdecimal::BigDecimal;

/// Validate that an amount is positive
pub fn validate_positive_amount(amount: &BigDecimal) -> BooksResult<()> {
    if *amount <= BigDecimal::from(0) {
        Err(BooksError::Validation(
            "Amount must be positive".to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Validate that an amount is not negative
pub fn validate_non_negative_amount(amount: &BigDecimal) -> BooksResult<()> {
    if *amount < BigDecimal::from(0) {
        Err(BooksError::Validation(
            "Amount cannot be negative".to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Validate that a master record name is usable
pub fn validate_master_name(kind: &str, name: &str) -> BooksResult<()> {
    if name.trim().is_empty() {
        return Err(BooksError::Validation(format!(
            "{} name cannot be empty",
            kind
        )));
    }

    if name.len() > 100 {
        return Err(BooksError::Validation(format!(
            "{} name cannot exceed 100 characters",
            kind
        )));
    }

    Ok(())
}

/// Validate that a GST rate is a sensible percentage
pub fn validate_gst_rate(rate: &BigDecimal) -> BooksResult<()> {
    if *rate < BigDecimal::from(0) || *rate > BigDecimal::from(100) {
        return Err(BooksError::Validation(
            "GST rate must be between 0 and 100".to_string(),
        ));
    }

    Ok(())
}

/// Strict voucher validator with per-line arithmetic checks
///
/// Goes beyond [`DefaultVoucherValidator`] by recomputing trade voucher
/// totals from their lines and rejecting negative amounts anywhere.
pub struct StrictVoucherValidator;

impl StrictVoucherValidator {
    fn validate_trade(&self, voucher: &TradeVoucher) -> BooksResult<()> {
        if voucher.party.trim().is_empty() {
            return Err(BooksError::Validation(
                "Trade voucher requires a party ledger".to_string(),
            ));
        }

        if voucher.items.is_empty() {
            return Err(BooksError::Validation(
                "Trade voucher requires at least one item line".to_string(),
            ));
        }

        for line in &voucher.items {
            validate_master_name("Item", &line.name)?;
            validate_non_negative_amount(&line.qty)?;
            validate_non_negative_amount(&line.rate)?;
            validate_non_negative_amount(&line.taxable_amount)?;
            validate_non_negative_amount(&line.cgst_amount)?;
            validate_non_negative_amount(&line.sgst_amount)?;
            validate_non_negative_amount(&line.igst_amount)?;
        }

        if !voucher.totals_consistent() {
            return Err(BooksError::Validation(
                "Trade voucher totals do not match its item lines".to_string(),
            ));
        }

        Ok(())
    }

    fn validate_settlement(&self, voucher: &SettlementVoucher) -> BooksResult<()> {
        if voucher.account.trim().is_empty() || voucher.party.trim().is_empty() {
            return Err(BooksError::Validation(
                "Settlement voucher requires both an account and a party".to_string(),
            ));
        }
        validate_positive_amount(&voucher.amount)
    }

    fn validate_contra(&self, voucher: &ContraVoucher) -> BooksResult<()> {
        if voucher.from_account.trim().is_empty() || voucher.to_account.trim().is_empty() {
            return Err(BooksError::Validation(
                "Contra voucher requires both accounts".to_string(),
            ));
        }
        validate_positive_amount(&voucher.amount)
    }

    fn validate_journal(&self, voucher: &JournalVoucher) -> BooksResult<()> {
        if voucher.entries.is_empty() {
            return Err(BooksError::Validation(
                "Journal voucher requires at least one entry".to_string(),
            ));
        }

        for entry in &voucher.entries {
            validate_master_name("Ledger", &entry.ledger)?;
            validate_non_negative_amount(&entry.debit)?;
            validate_non_negative_amount(&entry.credit)?;
        }

        if !voucher.is_balanced() {
            return Err(BooksError::Validation(
                "Journal voucher debits and credits must balance".to_string(),
            ));
        }

        Ok(())
    }
}

impl VoucherValidator for StrictVoucherValidator {
    fn validate_voucher(&self, voucher: &Voucher) -> BooksResult<()> {
        match voucher {
            Voucher::Purchase(v) | Voucher::Sales(v) => self.validate_trade(v),
            Voucher::Payment(v) | Voucher::Receipt(v) => self.validate_settlement(v),
            Voucher::Contra(v) => self.validate_contra(v),
            Voucher::Journal(v) => self.validate_journal(v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn test_master_name_validation() {
        assert!(validate_master_name("Ledger", "Cash").is_ok());
        assert!(validate_master_name("Ledger", "   ").is_err());
        assert!(validate_master_name("Unit", &"x".repeat(101)).is_err());
    }

    #[test]
    fn test_gst_rate_bounds() {
        assert!(validate_gst_rate(&BigDecimal::from(0)).is_ok());
        assert!(validate_gst_rate(&BigDecimal::from(28)).is_ok());
        assert!(validate_gst_rate(&BigDecimal::from(101)).is_err());
        assert!(validate_gst_rate(&BigDecimal::from(-1)).is_err());
    }

    #[test]
    fn test_strict_validator_rejects_mismatched_totals() {
        let validator = StrictVoucherValidator;

        let mut trade = TradeVoucher {
            id: "v1".to_string(),
            date: date(),
            is_inter_state: false,
            invoice_no: "INV-1".to_string(),
            due_date: None,
            party: "Acme".to_string(),
            items: vec![VoucherLine {
                name: "Widget".to_string(),
                qty: BigDecimal::from(2),
                rate: BigDecimal::from(100),
                taxable_amount: BigDecimal::from(200),
                cgst_amount: BigDecimal::from(18),
                sgst_amount: BigDecimal::from(18),
                igst_amount: BigDecimal::from(0),
                total_amount: BigDecimal::from(236),
            }],
            total_taxable_amount: BigDecimal::from(200),
            total_cgst: BigDecimal::from(18),
            total_sgst: BigDecimal::from(18),
            total_igst: BigDecimal::from(0),
            total: BigDecimal::from(236),
            narration: None,
        };

        assert!(validator
            .validate_voucher(&Voucher::Sales(trade.clone()))
            .is_ok());

        trade.total = BigDecimal::from(999);
        assert!(validator
            .validate_voucher(&Voucher::Sales(trade))
            .is_err());
    }

    #[test]
    fn test_strict_validator_rejects_negative_settlement() {
        let validator = StrictVoucherValidator;
        let voucher = Voucher::Payment(SettlementVoucher {
            id: "v2".to_string(),
            date: date(),
            account: "Cash".to_string(),
            party: "Acme".to_string(),
            amount: BigDecimal::from(-50),
            narration: None,
        });

        assert!(validator.validate_voucher(&voucher).is_err());
    }

    #[test]
    fn test_strict_validator_requires_journal_balance() {
        let validator = StrictVoucherValidator;
        let voucher = Voucher::Journal(JournalVoucher {
            id: "v3".to_string(),
            date: date(),
            entries: vec![
                JournalEntry::debit("Rent Expense", BigDecimal::from(100)),
                JournalEntry::credit("Cash", BigDecimal::from(90)),
            ],
            total_debit: BigDecimal::from(100),
            total_credit: BigDecimal::from(90),
            narration: None,
        });

        assert!(validator.validate_voucher(&voucher).is_err());
    }
}
