//! Main books orchestrator that coordinates masters, vouchers, and reports

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::books::vouchers::VoucherStore;
use crate::books::Registry;
use crate::import::invoices::InvoiceBatch;
use crate::import::vouchers::{self as voucher_import, ImportSummary, SheetImport};
use crate::reports;
use crate::reports::{
    DashboardSummary, DayBookRow, GstReturn, Gstr1Report, Gstr2Report, Gstr3bReport, GstrForm,
    LedgerStatement, StatementScope, StockSummaryRow, TrialBalance,
};
use crate::tax::gst::{self, RateFallback};
use crate::traits::*;
use crate::types::*;

/// Main bookkeeping system that orchestrates masters, vouchers, and reports
pub struct Books<S: BooksStorage> {
    storage: S,
    registry: Registry,
    vouchers: VoucherStore,
    validator: Box<dyn VoucherValidator>,
}

impl<S: BooksStorage> Books<S> {
    /// Create new books with the given storage backend and company profile
    ///
    /// The registry starts from the standard group chart and system ledgers.
    pub fn new(storage: S, company: Company) -> Self {
        Self {
            storage,
            registry: Registry::standard(company),
            vouchers: VoucherStore::new(),
            validator: Box::new(DefaultVoucherValidator),
        }
    }

    /// Create new books with a custom voucher validator
    pub fn with_validator(
        storage: S,
        company: Company,
        validator: Box<dyn VoucherValidator>,
    ) -> Self {
        Self {
            storage,
            registry: Registry::standard(company),
            vouchers: VoucherStore::new(),
            validator,
        }
    }

    /// Open books from storage.
    ///
    /// All seven collections are loaded. A backend with no saved company
    /// falls back to the given profile, and a backend with no ledgers is
    /// seeded with the standard registry, which is persisted right away.
    pub async fn load(storage: S, fallback_company: Company) -> BooksResult<Self> {
        let company = storage.load_company().await?.unwrap_or(fallback_company);
        let ledgers = storage.load_ledgers().await?;
        let ledger_groups = storage.load_ledger_groups().await?;
        let units = storage.load_units().await?;
        let stock_groups = storage.load_stock_groups().await?;
        let stock_items = storage.load_stock_items().await?;
        let vouchers = storage.load_vouchers().await?;

        let seed = ledgers.is_empty();
        let registry = if seed {
            Registry::standard(company)
        } else {
            Registry::from_collections(
                company,
                ledgers,
                ledger_groups,
                units,
                stock_groups,
                stock_items,
            )
        };

        let mut books = Self {
            storage,
            registry,
            vouchers: VoucherStore::from_vouchers(vouchers),
            validator: Box::new(DefaultVoucherValidator),
        };
        if seed {
            debug!("storage had no ledgers, seeding the standard registry");
            books.persist_masters().await?;
        }
        Ok(books)
    }

    /// The master registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The company profile
    pub fn company(&self) -> &Company {
        self.registry.company()
    }

    /// All vouchers, most recent date first
    pub fn vouchers(&self) -> &[Voucher] {
        self.vouchers.as_slice()
    }

    /// Look up a voucher by id
    pub fn voucher(&self, id: &str) -> Option<&Voucher> {
        self.vouchers.get(id)
    }

    /// The most recently dated vouchers, up to `count`
    pub fn recent_vouchers(&self, count: usize) -> &[Voucher] {
        self.vouchers.recent(count)
    }

    // Master operations
    /// Replace the company profile
    pub async fn update_company(&mut self, company: Company) -> BooksResult<()> {
        self.registry.set_company(company);
        self.storage.save_company(self.registry.company()).await
    }

    /// Add a ledger
    pub async fn add_ledger(&mut self, ledger: Ledger) -> BooksResult<()> {
        self.registry.add_ledger(ledger)?;
        self.storage.save_ledgers(self.registry.ledgers()).await
    }

    /// Add a ledger group
    pub async fn add_ledger_group(&mut self, group: LedgerGroup) -> BooksResult<()> {
        self.registry.add_ledger_group(group)?;
        self.storage
            .save_ledger_groups(self.registry.ledger_groups())
            .await
    }

    /// Add a unit of measure
    pub async fn add_unit(&mut self, unit: Unit) -> BooksResult<()> {
        self.registry.add_unit(unit)?;
        self.storage.save_units(self.registry.units()).await
    }

    /// Add a stock group
    pub async fn add_stock_group(&mut self, group: StockGroup) -> BooksResult<()> {
        self.registry.add_stock_group(group)?;
        self.storage
            .save_stock_groups(self.registry.stock_groups())
            .await
    }

    /// Add a stock item
    pub async fn add_stock_item(&mut self, item: StockItem) -> BooksResult<()> {
        self.registry.add_stock_item(item)?;
        self.storage
            .save_stock_items(self.registry.stock_items())
            .await
    }

    /// Add a batch of stock items, skipping the ones that fail validation
    ///
    /// Returns how many were added.
    pub async fn add_stock_items(&mut self, items: Vec<StockItem>) -> BooksResult<usize> {
        let added = self.registry.add_stock_items(items);
        self.storage
            .save_stock_items(self.registry.stock_items())
            .await?;
        Ok(added)
    }

    // Voucher operations
    /// Record a voucher; assigns an id when the voucher carries none
    pub async fn add_voucher(&mut self, voucher: Voucher) -> BooksResult<String> {
        self.validator.validate_voucher(&voucher)?;
        let id = self.vouchers.append(voucher);
        debug!(id = %id, "voucher recorded");
        self.persist_vouchers().await?;
        Ok(id)
    }

    /// Record a batch of vouchers.
    ///
    /// The whole batch is validated before anything is appended, so a bad
    /// voucher rejects the batch without partial writes.
    pub async fn add_vouchers(&mut self, vouchers: Vec<Voucher>) -> BooksResult<Vec<String>> {
        for voucher in &vouchers {
            self.validator.validate_voucher(voucher)?;
        }
        let ids = vouchers
            .into_iter()
            .map(|voucher| self.vouchers.append(voucher))
            .collect();
        self.persist_vouchers().await?;
        Ok(ids)
    }

    /// Replace a voucher in place, matched by id
    pub async fn update_voucher(&mut self, voucher: Voucher) -> BooksResult<()> {
        self.validator.validate_voucher(&voucher)?;
        self.vouchers.update(voucher)?;
        self.persist_vouchers().await
    }

    /// Move a voucher to a different party.
    ///
    /// Trade vouchers rederive the supply scope from the new party ledger's
    /// state and are repriced only when the scope actually flips; a same-scope
    /// change keeps the persisted line taxes untouched. Settlements keep
    /// their amount and only change the party field.
    pub async fn set_voucher_party(&mut self, voucher_id: &str, party: &str) -> BooksResult<()> {
        let mut voucher = self
            .vouchers
            .get(voucher_id)
            .cloned()
            .ok_or_else(|| BooksError::VoucherNotFound(voucher_id.to_string()))?;

        match &mut voucher {
            Voucher::Sales(trade) | Voucher::Purchase(trade) => {
                trade.party = party.to_string();
                let scope = gst::scope_for_party(&self.registry, party);
                if scope.is_inter_state() != trade.is_inter_state {
                    gst::reprice_trade(trade, &self.registry, scope, RateFallback::Zero);
                }
            }
            Voucher::Payment(settlement) | Voucher::Receipt(settlement) => {
                settlement.party = party.to_string();
            }
            Voucher::Contra(_) | Voucher::Journal(_) => {
                return Err(BooksError::Validation(
                    "Only trade and settlement vouchers carry a party".to_string(),
                ));
            }
        }

        self.validator.validate_voucher(&voucher)?;
        self.vouchers.update(voucher)?;
        self.persist_vouchers().await
    }

    // Import operations
    /// Import a JSON array of voucher objects.
    ///
    /// Elements that deserialize are pushed through the normal acceptance
    /// path; validation failures move them to the failed count.
    pub async fn import_vouchers_json(&mut self, payload: &str) -> BooksResult<ImportSummary> {
        let (vouchers, parsed) = voucher_import::vouchers_from_json(payload);
        let mut summary = ImportSummary {
            success: 0,
            failed: parsed.failed,
        };
        for voucher in vouchers {
            match self.validator.validate_voucher(&voucher) {
                Ok(()) => {
                    self.vouchers.append(voucher);
                    summary.success += 1;
                }
                Err(err) => {
                    warn!(error = %err, "imported voucher failed validation");
                    summary.failed += 1;
                }
            }
        }
        self.persist_vouchers().await?;
        Ok(summary)
    }

    /// Import cell-parsed spreadsheet rows
    pub async fn import_voucher_sheets(&mut self, sheets: &SheetImport) -> BooksResult<ImportSummary> {
        let (vouchers, parsed) = voucher_import::vouchers_from_sheets(&self.registry, sheets);
        let mut summary = ImportSummary {
            success: 0,
            failed: parsed.failed,
        };
        for voucher in vouchers {
            match self.validator.validate_voucher(&voucher) {
                Ok(()) => {
                    self.vouchers.append(voucher);
                    summary.success += 1;
                }
                Err(err) => {
                    warn!(error = %err, "sheet voucher failed validation");
                    summary.failed += 1;
                }
            }
        }
        self.persist_vouchers().await?;
        Ok(summary)
    }

    /// Record purchase vouchers from a processed invoice batch.
    ///
    /// Every successful extraction in the batch becomes one purchase voucher.
    pub async fn accept_invoice_batch(&mut self, batch: &InvoiceBatch) -> BooksResult<Vec<String>> {
        let vouchers = batch.build_vouchers(&self.registry);
        self.add_vouchers(vouchers).await
    }

    // Reports
    /// Chronological voucher listing within an inclusive date window
    pub fn day_book(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Vec<DayBookRow> {
        reports::day_book(self.vouchers.as_slice(), start, end)
    }

    /// Running statement for a ledger, a group, or every ledger at once
    pub fn ledger_statement(
        &self,
        scope: &StatementScope,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> LedgerStatement {
        reports::ledger_statement(&self.registry, self.vouchers.as_slice(), scope, start, end)
    }

    /// Trial balance over all vouchers
    pub fn trial_balance(&self) -> TrialBalance {
        reports::trial_balance(&self.registry, self.vouchers.as_slice())
    }

    /// Stock movement summary over all vouchers
    pub fn stock_summary(&self) -> Vec<StockSummaryRow> {
        reports::stock_summary(&self.registry, self.vouchers.as_slice())
    }

    /// GSTR-1 outward supplies
    pub fn gstr1(&self) -> Gstr1Report {
        reports::gstr1(&self.registry, self.vouchers.as_slice())
    }

    /// GSTR-2/2A/2B inward supplies
    pub fn gstr2(&self, form: GstrForm) -> Gstr2Report {
        reports::gstr2(&self.registry, self.vouchers.as_slice(), form)
    }

    /// GSTR-3B summary
    pub fn gstr3b(&self) -> Gstr3bReport {
        reports::gstr3b(&self.registry, self.vouchers.as_slice())
    }

    /// Any GSTR form by name
    pub fn gst_return(&self, form: GstrForm) -> GstReturn {
        reports::gst_return(&self.registry, self.vouchers.as_slice(), form)
    }

    /// Dashboard totals, receivables/payables, and monthly activity
    pub fn dashboard(&self) -> DashboardSummary {
        reports::dashboard(&self.registry, self.vouchers.as_slice())
    }

    /// Validate the integrity of the books
    ///
    /// Checks trial-balance closure and that every voucher's persisted totals
    /// agree with its own lines or entries.
    pub fn validate_integrity(&self) -> BooksIntegrityReport {
        let trial_balance = self.trial_balance();
        let mut issues = Vec::new();

        if !trial_balance.is_balanced() {
            issues.push(format!(
                "Trial balance is not balanced: debits = {}, credits = {}",
                trial_balance.total_debit, trial_balance.total_credit
            ));
        }

        for voucher in self.vouchers.iter() {
            match voucher {
                Voucher::Sales(v) | Voucher::Purchase(v) => {
                    if !v.totals_consistent() {
                        issues.push(format!(
                            "Voucher {} totals disagree with its lines",
                            voucher.id()
                        ));
                    }
                }
                Voucher::Journal(v) => {
                    if !v.is_balanced() {
                        issues.push(format!("Journal voucher {} is not balanced", voucher.id()));
                    }
                }
                _ => {}
            }
        }

        if !issues.is_empty() {
            warn!(count = issues.len(), "integrity check found issues");
        }

        BooksIntegrityReport {
            is_valid: issues.is_empty(),
            issues,
            trial_balance_total_debit: trial_balance.total_debit,
            trial_balance_total_credit: trial_balance.total_credit,
        }
    }

    async fn persist_masters(&mut self) -> BooksResult<()> {
        self.storage.save_company(self.registry.company()).await?;
        self.storage.save_ledgers(self.registry.ledgers()).await?;
        self.storage
            .save_ledger_groups(self.registry.ledger_groups())
            .await?;
        self.storage.save_units(self.registry.units()).await?;
        self.storage
            .save_stock_groups(self.registry.stock_groups())
            .await?;
        self.storage
            .save_stock_items(self.registry.stock_items())
            .await?;
        Ok(())
    }

    async fn persist_vouchers(&mut self) -> BooksResult<()> {
        self.storage.save_vouchers(self.vouchers.as_slice()).await
    }
}

/// Report on the health of the books
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BooksIntegrityReport {
    pub is_valid: bool,
    pub issues: Vec<String>,
    pub trial_balance_total_debit: BigDecimal,
    pub trial_balance_total_credit: BigDecimal,
}
