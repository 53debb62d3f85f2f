//! Traits for storage abstraction and external service boundaries

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::types::*;

/// Storage abstraction for the bookkeeping system
///
/// The books are kept in memory; each collection is persisted as a whole
/// (save replaces the stored collection with the given slice). This matches
/// backends that store one document per collection as well as key-value
/// stores, and lets any backend (IndexedDB bridge, SQLite, in-memory, etc.)
/// plug in by implementing these methods.
#[async_trait]
pub trait BooksStorage: Send + Sync {
    /// Persist the company profile
    async fn save_company(&mut self, company: &Company) -> BooksResult<()>;

    /// Load the company profile, if one was saved
    async fn load_company(&self) -> BooksResult<Option<Company>>;

    /// Replace the stored ledger collection
    async fn save_ledgers(&mut self, ledgers: &[Ledger]) -> BooksResult<()>;

    /// Load all ledgers
    async fn load_ledgers(&self) -> BooksResult<Vec<Ledger>>;

    /// Replace the stored ledger-group collection
    async fn save_ledger_groups(&mut self, groups: &[LedgerGroup]) -> BooksResult<()>;

    /// Load all ledger groups
    async fn load_ledger_groups(&self) -> BooksResult<Vec<LedgerGroup>>;

    /// Replace the stored unit collection
    async fn save_units(&mut self, units: &[Unit]) -> BooksResult<()>;

    /// Load all units
    async fn load_units(&self) -> BooksResult<Vec<Unit>>;

    /// Replace the stored stock-group collection
    async fn save_stock_groups(&mut self, groups: &[StockGroup]) -> BooksResult<()>;

    /// Load all stock groups
    async fn load_stock_groups(&self) -> BooksResult<Vec<StockGroup>>;

    /// Replace the stored stock-item collection
    async fn save_stock_items(&mut self, items: &[StockItem]) -> BooksResult<()>;

    /// Load all stock items
    async fn load_stock_items(&self) -> BooksResult<Vec<StockItem>>;

    /// Replace the stored voucher collection
    async fn save_vouchers(&mut self, vouchers: &[Voucher]) -> BooksResult<()>;

    /// Load all vouchers
    async fn load_vouchers(&self) -> BooksResult<Vec<Voucher>>;
}

/// Trait for implementing custom voucher validation rules
pub trait VoucherValidator: Send + Sync {
    /// Validate a voucher before it is accepted into the store
    fn validate_voucher(&self, voucher: &Voucher) -> BooksResult<()>;
}

/// Default voucher validator
///
/// Enforces the journal balance rule: a journal is accepted only when its
/// debit and credit columns agree and are non-zero. Other voucher types pass.
pub struct DefaultVoucherValidator;

impl VoucherValidator for DefaultVoucherValidator {
    fn validate_voucher(&self, voucher: &Voucher) -> BooksResult<()> {
        if let Voucher::Journal(journal) = voucher {
            if !journal.is_balanced() {
                return Err(BooksError::InvalidVoucher(format!(
                    "Journal voucher is not balanced: debits = {}, credits = {}",
                    journal.total_debit, journal.total_credit
                )));
            }
        }
        Ok(())
    }
}

/// Invoice data produced by an extraction service
///
/// Field names match the JSON schema the extraction service is asked to
/// produce. Dates arrive as raw strings and are parsed (with a fallback to
/// the current date) when the extraction is turned into a voucher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedInvoice {
    pub seller_name: String,
    pub invoice_number: String,
    pub invoice_date: String,
    #[serde(default)]
    pub due_date: Option<String>,
    pub subtotal: BigDecimal,
    pub cgst_amount: BigDecimal,
    pub sgst_amount: BigDecimal,
    pub total_amount: BigDecimal,
    pub line_items: Vec<ExtractedLine>,
}

/// One line item recognized on a scanned invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedLine {
    pub item_description: String,
    pub hsn_code: String,
    pub quantity: BigDecimal,
    pub rate: BigDecimal,
}

/// Extraction service boundary
///
/// Implementations call out to whatever document-understanding backend is in
/// use. Failures are transient from the caller's point of view; the batch
/// runner in [`crate::import::invoices`] retries with exponential backoff and
/// gives up after a bounded number of attempts.
#[async_trait]
pub trait InvoiceExtractor: Send + Sync {
    /// Extract structured invoice data from a document
    async fn extract_invoice(
        &self,
        bytes: &[u8],
        mime_type: &str,
    ) -> BooksResult<ExtractedInvoice>;
}

/// Outcome of validating an HSN code against a declared GST rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HsnStatus {
    /// Code known and the declared rate matches
    Valid,
    /// Code unknown
    Invalid,
    /// Code known but the declared rate differs from the directory rate
    Mismatch,
}

/// Result of an HSN code check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HsnValidation {
    pub status: HsnStatus,
    pub message: String,
    /// Directory rate, supplied whenever the code is known
    #[serde(default)]
    pub correct_rate: Option<BigDecimal>,
}

impl HsnValidation {
    /// Whether stock-item intake should accept an item with this result
    ///
    /// Valid and Mismatch pass (a mismatch is surfaced but not blocking);
    /// Invalid blocks.
    pub fn acceptable(&self) -> bool {
        matches!(self.status, HsnStatus::Valid | HsnStatus::Mismatch)
    }
}

/// HSN code validation boundary
#[async_trait]
pub trait HsnValidator: Send + Sync {
    /// Check an HSN code and the GST rate declared for it
    async fn validate_hsn(&self, code: &str, declared_rate: &BigDecimal) -> HsnValidation;
}
