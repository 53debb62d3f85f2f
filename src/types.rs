//! Core types and data structures for the bookkeeping system

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Company profile the books are kept for
///
/// The `state` field drives the intra-state vs inter-state decision when a
/// trade voucher is priced; blank means the company has no declared state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    /// Legal name of the business
    pub name: String,
    /// Registered address
    pub address: String,
    /// GST identification number
    pub gstin: String,
    /// State of registration
    pub state: String,
}

impl Company {
    /// Create a company profile
    pub fn new(name: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: String::new(),
            gstin: String::new(),
            state: state.into(),
        }
    }
}

/// GST registration status of a party ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegistrationType {
    Registered,
    Unregistered,
    Composition,
}

/// A ledger account in the registry
///
/// Ledgers are identified by name. The GST fields are only meaningful for
/// party ledgers (customers and suppliers).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ledger {
    /// Unique name (case-insensitive uniqueness is enforced by the registry)
    pub name: String,
    /// Ledger group this ledger belongs to
    pub group: String,
    /// GST identification number, if the party has one
    #[serde(default)]
    pub gstin: Option<String>,
    /// GST registration status, if known
    #[serde(default)]
    pub registration_type: Option<RegistrationType>,
    /// State the party operates from, used for the inter-state decision
    #[serde(default)]
    pub state: Option<String>,
}

impl Ledger {
    /// Create a plain ledger under a group
    pub fn new(name: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            group: group.into(),
            gstin: None,
            registration_type: None,
            state: None,
        }
    }

    /// Create a party ledger carrying GST details
    pub fn party(
        name: impl Into<String>,
        group: impl Into<String>,
        gstin: Option<String>,
        registration_type: Option<RegistrationType>,
        state: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            group: group.into(),
            gstin,
            registration_type,
            state,
        }
    }
}

/// A node in the ledger-group tree
///
/// Groups form a tree through `under`; the root is the reserved name
/// [`PRIMARY_GROUP`]. Group membership of ledgers is single-level: a ledger
/// belongs to exactly the group named in its `group` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerGroup {
    /// Unique group name
    pub name: String,
    /// Parent group name, or [`PRIMARY_GROUP`] for top-level groups
    pub under: String,
}

impl LedgerGroup {
    /// Create a group under a parent
    pub fn new(name: impl Into<String>, under: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            under: under.into(),
        }
    }
}

/// Reserved root of the ledger-group tree
pub const PRIMARY_GROUP: &str = "Primary";

/// Unit of measure for stock items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub name: String,
}

/// Grouping for stock items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockGroup {
    pub name: String,
}

/// An inventory item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockItem {
    /// Unique item name (case-insensitive uniqueness enforced by the registry)
    pub name: String,
    /// Stock group the item belongs to
    pub group: String,
    /// Unit of measure
    pub unit: String,
    /// HSN classification code
    #[serde(default)]
    pub hsn: Option<String>,
    /// GST rate percentage applied when the item is sold or purchased
    #[serde(default)]
    pub gst_rate: Option<BigDecimal>,
    /// Opening stock quantity
    #[serde(default)]
    pub quantity: Option<BigDecimal>,
}

impl StockItem {
    /// Create a stock item without GST details
    pub fn new(
        name: impl Into<String>,
        group: impl Into<String>,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            group: group.into(),
            unit: unit.into(),
            hsn: None,
            gst_rate: None,
            quantity: None,
        }
    }
}

/// One priced line on a trade voucher
///
/// The tax fields are computed at pricing time and persisted; reports only
/// aggregate them. An inter-state line carries IGST only, an intra-state line
/// splits the tax equally between CGST and SGST.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoucherLine {
    /// Stock item name (matched against the registry when pricing)
    pub name: String,
    /// Quantity traded
    pub qty: BigDecimal,
    /// Unit rate
    pub rate: BigDecimal,
    /// qty × rate
    pub taxable_amount: BigDecimal,
    pub cgst_amount: BigDecimal,
    pub sgst_amount: BigDecimal,
    pub igst_amount: BigDecimal,
    /// taxable + all tax heads
    pub total_amount: BigDecimal,
}

impl VoucherLine {
    /// Total tax across all heads on this line
    pub fn tax_amount(&self) -> BigDecimal {
        &self.cgst_amount + &self.sgst_amount + &self.igst_amount
    }
}

/// Whether a trade voucher records a purchase or a sale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeKind {
    Purchase,
    Sales,
}

impl TradeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeKind::Purchase => "Purchase",
            TradeKind::Sales => "Sales",
        }
    }
}

/// Whether a settlement voucher records a payment or a receipt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SettlementKind {
    Payment,
    Receipt,
}

impl SettlementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettlementKind::Payment => "Payment",
            SettlementKind::Receipt => "Receipt",
        }
    }
}

/// A purchase or sales invoice with priced lines and persisted tax totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeVoucher {
    /// Unique identifier, assigned by the store when empty
    #[serde(default)]
    pub id: String,
    pub date: NaiveDate,
    /// True when the party's state differs from the company's state
    pub is_inter_state: bool,
    pub invoice_no: String,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    /// Party ledger name (customer for sales, supplier for purchases)
    pub party: String,
    pub items: Vec<VoucherLine>,
    pub total_taxable_amount: BigDecimal,
    pub total_cgst: BigDecimal,
    pub total_sgst: BigDecimal,
    pub total_igst: BigDecimal,
    /// Invoice value: taxable total plus all tax heads
    pub total: BigDecimal,
    #[serde(default)]
    pub narration: Option<String>,
}

impl TradeVoucher {
    /// Recompute the persisted totals from the lines
    pub fn recompute_totals(&mut self) {
        self.total_taxable_amount = self.items.iter().map(|i| &i.taxable_amount).sum();
        self.total_cgst = self.items.iter().map(|i| &i.cgst_amount).sum();
        self.total_sgst = self.items.iter().map(|i| &i.sgst_amount).sum();
        self.total_igst = self.items.iter().map(|i| &i.igst_amount).sum();
        self.total = self.items.iter().map(|i| &i.total_amount).sum();
    }

    /// Check that the persisted totals agree with the lines
    pub fn totals_consistent(&self) -> bool {
        let taxable: BigDecimal = self.items.iter().map(|i| &i.taxable_amount).sum();
        let cgst: BigDecimal = self.items.iter().map(|i| &i.cgst_amount).sum();
        let sgst: BigDecimal = self.items.iter().map(|i| &i.sgst_amount).sum();
        let igst: BigDecimal = self.items.iter().map(|i| &i.igst_amount).sum();
        let total: BigDecimal = self.items.iter().map(|i| &i.total_amount).sum();
        self.total_taxable_amount == taxable
            && self.total_cgst == cgst
            && self.total_sgst == sgst
            && self.total_igst == igst
            && self.total == total
    }
}

/// A payment or receipt settling a party balance through a cash/bank account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementVoucher {
    #[serde(default)]
    pub id: String,
    pub date: NaiveDate,
    /// Cash or bank ledger the money moves through
    pub account: String,
    /// Party ledger being settled
    pub party: String,
    pub amount: BigDecimal,
    #[serde(default)]
    pub narration: Option<String>,
}

/// A transfer between two cash/bank accounts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContraVoucher {
    #[serde(default)]
    pub id: String,
    pub date: NaiveDate,
    pub from_account: String,
    pub to_account: String,
    pub amount: BigDecimal,
    #[serde(default)]
    pub narration: Option<String>,
}

/// One side of a journal posting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub ledger: String,
    pub debit: BigDecimal,
    pub credit: BigDecimal,
}

impl JournalEntry {
    /// Entry debiting a ledger
    pub fn debit(ledger: impl Into<String>, amount: BigDecimal) -> Self {
        Self {
            ledger: ledger.into(),
            debit: amount,
            credit: BigDecimal::from(0),
        }
    }

    /// Entry crediting a ledger
    pub fn credit(ledger: impl Into<String>, amount: BigDecimal) -> Self {
        Self {
            ledger: ledger.into(),
            debit: BigDecimal::from(0),
            credit: amount,
        }
    }
}

/// A free-form double-entry posting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalVoucher {
    #[serde(default)]
    pub id: String,
    pub date: NaiveDate,
    pub entries: Vec<JournalEntry>,
    pub total_debit: BigDecimal,
    pub total_credit: BigDecimal,
    #[serde(default)]
    pub narration: Option<String>,
}

impl JournalVoucher {
    /// Sum of the debit column across entries
    pub fn entry_debit_total(&self) -> BigDecimal {
        self.entries.iter().map(|e| &e.debit).sum()
    }

    /// Sum of the credit column across entries
    pub fn entry_credit_total(&self) -> BigDecimal {
        self.entries.iter().map(|e| &e.credit).sum()
    }

    /// Recompute the persisted totals from the entries
    pub fn recompute_totals(&mut self) {
        self.total_debit = self.entry_debit_total();
        self.total_credit = self.entry_credit_total();
    }

    /// A journal is balanced when both columns agree and are non-zero
    pub fn is_balanced(&self) -> bool {
        self.total_debit == self.total_credit && self.total_debit > BigDecimal::from(0)
    }
}

/// A voucher of any type
///
/// Serialized with an internal `type` tag so the JSON form matches the
/// interchange format used by imports and exports:
/// `{"type": "Sales", "date": "2024-06-01", ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Voucher {
    Purchase(TradeVoucher),
    Sales(TradeVoucher),
    Payment(SettlementVoucher),
    Receipt(SettlementVoucher),
    Contra(ContraVoucher),
    Journal(JournalVoucher),
}

impl Voucher {
    /// Wrap a trade voucher under the given kind
    pub fn trade(kind: TradeKind, voucher: TradeVoucher) -> Self {
        match kind {
            TradeKind::Purchase => Voucher::Purchase(voucher),
            TradeKind::Sales => Voucher::Sales(voucher),
        }
    }

    /// Wrap a settlement voucher under the given kind
    pub fn settlement(kind: SettlementKind, voucher: SettlementVoucher) -> Self {
        match kind {
            SettlementKind::Payment => Voucher::Payment(voucher),
            SettlementKind::Receipt => Voucher::Receipt(voucher),
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Voucher::Purchase(v) | Voucher::Sales(v) => &v.id,
            Voucher::Payment(v) | Voucher::Receipt(v) => &v.id,
            Voucher::Contra(v) => &v.id,
            Voucher::Journal(v) => &v.id,
        }
    }

    pub fn set_id(&mut self, id: String) {
        match self {
            Voucher::Purchase(v) | Voucher::Sales(v) => v.id = id,
            Voucher::Payment(v) | Voucher::Receipt(v) => v.id = id,
            Voucher::Contra(v) => v.id = id,
            Voucher::Journal(v) => v.id = id,
        }
    }

    pub fn date(&self) -> NaiveDate {
        match self {
            Voucher::Purchase(v) | Voucher::Sales(v) => v.date,
            Voucher::Payment(v) | Voucher::Receipt(v) => v.date,
            Voucher::Contra(v) => v.date,
            Voucher::Journal(v) => v.date,
        }
    }

    /// Display name of the voucher type, matching the serialized tag
    pub fn voucher_type(&self) -> &'static str {
        match self {
            Voucher::Purchase(_) => "Purchase",
            Voucher::Sales(_) => "Sales",
            Voucher::Payment(_) => "Payment",
            Voucher::Receipt(_) => "Receipt",
            Voucher::Contra(_) => "Contra",
            Voucher::Journal(_) => "Journal",
        }
    }

    /// Party ledger name, for the types that have one
    pub fn party(&self) -> Option<&str> {
        match self {
            Voucher::Purchase(v) | Voucher::Sales(v) => Some(&v.party),
            Voucher::Payment(v) | Voucher::Receipt(v) => Some(&v.party),
            Voucher::Contra(_) | Voucher::Journal(_) => None,
        }
    }

    pub fn narration(&self) -> Option<&str> {
        match self {
            Voucher::Purchase(v) | Voucher::Sales(v) => v.narration.as_deref(),
            Voucher::Payment(v) | Voucher::Receipt(v) => v.narration.as_deref(),
            Voucher::Contra(v) => v.narration.as_deref(),
            Voucher::Journal(v) => v.narration.as_deref(),
        }
    }

    /// Headline amount shown in listings: invoice total for trades, the moved
    /// amount for settlements and contras, zero for journals
    pub fn display_amount(&self) -> BigDecimal {
        match self {
            Voucher::Purchase(v) | Voucher::Sales(v) => v.total.clone(),
            Voucher::Payment(v) | Voucher::Receipt(v) => v.amount.clone(),
            Voucher::Contra(v) => v.amount.clone(),
            Voucher::Journal(_) => BigDecimal::from(0),
        }
    }
}

/// Errors that can occur in the bookkeeping system
#[derive(Debug, thiserror::Error)]
pub enum BooksError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Invalid voucher: {0}")]
    InvalidVoucher(String),
    #[error("Voucher not found: {0}")]
    VoucherNotFound(String),
    #[error("Ledger not found: {0}")]
    LedgerNotFound(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Invoice extraction failed: {0}")]
    Extraction(String),
}

/// Result type for bookkeeping operations
pub type BooksResult<T> = Result<T, BooksError>;
