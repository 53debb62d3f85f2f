//! In-memory storage implementation for testing and development

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::traits::BooksStorage;
use crate::types::*;

/// In-memory storage backend
///
/// Clones share the same underlying data, so a handle can be kept around for
/// inspection while the books own another.
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    company: Arc<RwLock<Option<Company>>>,
    ledgers: Arc<RwLock<Vec<Ledger>>>,
    ledger_groups: Arc<RwLock<Vec<LedgerGroup>>>,
    units: Arc<RwLock<Vec<Unit>>>,
    stock_groups: Arc<RwLock<Vec<StockGroup>>>,
    stock_items: Arc<RwLock<Vec<StockItem>>>,
    vouchers: Arc<RwLock<Vec<Voucher>>>,
}

impl MemoryStorage {
    /// Create a new memory storage instance
    pub fn new() -> Self {
        Self {
            company: Arc::new(RwLock::new(None)),
            ledgers: Arc::new(RwLock::new(Vec::new())),
            ledger_groups: Arc::new(RwLock::new(Vec::new())),
            units: Arc::new(RwLock::new(Vec::new())),
            stock_groups: Arc::new(RwLock::new(Vec::new())),
            stock_items: Arc::new(RwLock::new(Vec::new())),
            vouchers: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) {
        *self.company.write().unwrap() = None;
        self.ledgers.write().unwrap().clear();
        self.ledger_groups.write().unwrap().clear();
        self.units.write().unwrap().clear();
        self.stock_groups.write().unwrap().clear();
        self.stock_items.write().unwrap().clear();
        self.vouchers.write().unwrap().clear();
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BooksStorage for MemoryStorage {
    async fn save_company(&mut self, company: &Company) -> BooksResult<()> {
        *self.company.write().unwrap() = Some(company.clone());
        Ok(())
    }

    async fn load_company(&self) -> BooksResult<Option<Company>> {
        Ok(self.company.read().unwrap().clone())
    }

    async fn save_ledgers(&mut self, ledgers: &[Ledger]) -> BooksResult<()> {
        *self.ledgers.write().unwrap() = ledgers.to_vec();
        Ok(())
    }

    async fn load_ledgers(&self) -> BooksResult<Vec<Ledger>> {
        Ok(self.ledgers.read().unwrap().clone())
    }

    async fn save_ledger_groups(&mut self, groups: &[LedgerGroup]) -> BooksResult<()> {
        *self.ledger_groups.write().unwrap() = groups.to_vec();
        Ok(())
    }

    async fn load_ledger_groups(&self) -> BooksResult<Vec<LedgerGroup>> {
        Ok(self.ledger_groups.read().unwrap().clone())
    }

    async fn save_units(&mut self, units: &[Unit]) -> BooksResult<()> {
        *self.units.write().unwrap() = units.to_vec();
        Ok(())
    }

    async fn load_units(&self) -> BooksResult<Vec<Unit>> {
        Ok(self.units.read().unwrap().clone())
    }

    async fn save_stock_groups(&mut self, groups: &[StockGroup]) -> BooksResult<()> {
        *self.stock_groups.write().unwrap() = groups.to_vec();
        Ok(())
    }

    async fn load_stock_groups(&self) -> BooksResult<Vec<StockGroup>> {
        Ok(self.stock_groups.read().unwrap().clone())
    }

    async fn save_stock_items(&mut self, items: &[StockItem]) -> BooksResult<()> {
        *self.stock_items.write().unwrap() = items.to_vec();
        Ok(())
    }

    async fn load_stock_items(&self) -> BooksResult<Vec<StockItem>> {
        Ok(self.stock_items.read().unwrap().clone())
    }

    async fn save_vouchers(&mut self, vouchers: &[Voucher]) -> BooksResult<()> {
        *self.vouchers.write().unwrap() = vouchers.to_vec();
        Ok(())
    }

    async fn load_vouchers(&self) -> BooksResult<Vec<Voucher>> {
        Ok(self.vouchers.read().unwrap().clone())
    }
}
