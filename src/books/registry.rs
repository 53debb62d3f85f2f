//! Master entity registry
//!
//! Holds the company profile and every master collection: ledgers, ledger
//! groups, units, stock groups, and stock items. Names are the identity of a
//! master; uniqueness is case-insensitive within each collection and every
//! collection stays sorted by name. The registry is deliberately tolerant of
//! dangling references: a ledger may name a group that was never created and
//! vouchers may post to ledgers the registry has never seen.

use tracing::debug;

use crate::types::*;
use crate::utils::validation::validate_master_name;

/// Names of the conventional ledger groups the reports care about
pub mod groups {
    pub const SUNDRY_DEBTORS: &str = "Sundry Debtors";
    pub const SUNDRY_CREDITORS: &str = "Sundry Creditors";
    pub const BANK_ACCOUNTS: &str = "Bank Accounts";
    pub const CASH_IN_HAND: &str = "Cash-in-Hand";
    pub const DUTIES_AND_TAXES: &str = "Duties & Taxes";
    pub const SALES_ACCOUNTS: &str = "Sales Accounts";
    pub const PURCHASE_ACCOUNTS: &str = "Purchase Accounts";
}

/// Synthetic ledgers the posting rules target
///
/// Trade vouchers post against these by name; keeping them in one table means
/// the resolver, the tax engine, and the reports agree on the spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemLedger {
    Sales,
    Purchases,
    Cgst,
    Sgst,
    Igst,
}

impl SystemLedger {
    pub const ALL: [SystemLedger; 5] = [
        SystemLedger::Sales,
        SystemLedger::Purchases,
        SystemLedger::Cgst,
        SystemLedger::Sgst,
        SystemLedger::Igst,
    ];

    /// Ledger name used in postings and reports
    pub fn name(&self) -> &'static str {
        match self {
            SystemLedger::Sales => "Sales",
            SystemLedger::Purchases => "Purchases",
            SystemLedger::Cgst => "CGST",
            SystemLedger::Sgst => "SGST",
            SystemLedger::Igst => "IGST",
        }
    }

    /// Group the ledger is seeded under
    pub fn home_group(&self) -> &'static str {
        match self {
            SystemLedger::Sales => groups::SALES_ACCOUNTS,
            SystemLedger::Purchases => groups::PURCHASE_ACCOUNTS,
            SystemLedger::Cgst | SystemLedger::Sgst | SystemLedger::Igst => {
                groups::DUTIES_AND_TAXES
            }
        }
    }

    /// Seedable ledger record
    pub fn ledger(&self) -> Ledger {
        Ledger::new(self.name(), self.home_group())
    }
}

/// The master entity registry
#[derive(Debug, Clone, PartialEq)]
pub struct Registry {
    company: Company,
    ledgers: Vec<Ledger>,
    ledger_groups: Vec<LedgerGroup>,
    units: Vec<Unit>,
    stock_groups: Vec<StockGroup>,
    stock_items: Vec<StockItem>,
}

impl Registry {
    /// Create an empty registry for a company
    pub fn new(company: Company) -> Self {
        Self {
            company,
            ledgers: Vec::new(),
            ledger_groups: Vec::new(),
            units: Vec::new(),
            stock_groups: Vec::new(),
            stock_items: Vec::new(),
        }
    }

    /// Create a registry seeded with the conventional group tree, the
    /// system ledgers, a Cash ledger, and the common units of measure
    pub fn standard(company: Company) -> Self {
        let mut registry = Self::new(company);

        let standard_groups: [(&str, &str); 26] = [
            ("Branch / Divisions", PRIMARY_GROUP),
            ("Capital Account", PRIMARY_GROUP),
            ("Current Assets", PRIMARY_GROUP),
            ("Current Liabilities", PRIMARY_GROUP),
            ("Direct Expenses", PRIMARY_GROUP),
            ("Direct Incomes", PRIMARY_GROUP),
            ("Fixed Assets", PRIMARY_GROUP),
            ("Indirect Expenses", PRIMARY_GROUP),
            ("Indirect Incomes", PRIMARY_GROUP),
            ("Investments", PRIMARY_GROUP),
            ("Loans (Liability)", PRIMARY_GROUP),
            ("Misc. Expenses (ASSET)", PRIMARY_GROUP),
            (groups::PURCHASE_ACCOUNTS, PRIMARY_GROUP),
            (groups::SALES_ACCOUNTS, PRIMARY_GROUP),
            ("Suspense A/c", PRIMARY_GROUP),
            (groups::BANK_ACCOUNTS, "Current Assets"),
            (groups::CASH_IN_HAND, "Current Assets"),
            (groups::DUTIES_AND_TAXES, "Current Liabilities"),
            ("Provisions", "Current Liabilities"),
            ("Reserves & Surplus", "Capital Account"),
            ("Secured Loans", "Loans (Liability)"),
            (groups::SUNDRY_CREDITORS, "Current Liabilities"),
            (groups::SUNDRY_DEBTORS, "Current Assets"),
            ("Unsecured Loans", "Loans (Liability)"),
            ("Stock-in-Hand", "Current Assets"),
            ("Bank OD A/c", "Loans (Liability)"),
        ];
        for (name, under) in standard_groups {
            registry.ledger_groups.push(LedgerGroup::new(name, under));
        }
        registry.sort_ledger_groups();

        registry.ledgers.push(Ledger::new("Cash", groups::CASH_IN_HAND));
        for system in SystemLedger::ALL {
            registry.ledgers.push(system.ledger());
        }
        registry.sort_ledgers();

        for unit in ["Nos", "Pcs", "Kgs", "Ltrs", "Box"] {
            registry.units.push(Unit {
                name: unit.to_string(),
            });
        }
        registry.sort_units();

        registry
    }

    /// Rebuild a registry from persisted collections
    pub fn from_collections(
        company: Company,
        ledgers: Vec<Ledger>,
        ledger_groups: Vec<LedgerGroup>,
        units: Vec<Unit>,
        stock_groups: Vec<StockGroup>,
        stock_items: Vec<StockItem>,
    ) -> Self {
        Self {
            company,
            ledgers,
            ledger_groups,
            units,
            stock_groups,
            stock_items,
        }
    }

    pub fn company(&self) -> &Company {
        &self.company
    }

    pub fn set_company(&mut self, company: Company) {
        self.company = company;
    }

    pub fn ledgers(&self) -> &[Ledger] {
        &self.ledgers
    }

    pub fn ledger_groups(&self) -> &[LedgerGroup] {
        &self.ledger_groups
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn stock_groups(&self) -> &[StockGroup] {
        &self.stock_groups
    }

    pub fn stock_items(&self) -> &[StockItem] {
        &self.stock_items
    }

    /// Add a ledger; blank or duplicate names (case-insensitive) are rejected
    pub fn add_ledger(&mut self, mut ledger: Ledger) -> BooksResult<()> {
        validate_master_name("Ledger", &ledger.name)?;
        ledger.name = ledger.name.trim().to_string();
        if self.has_name(self.ledgers.iter().map(|l| l.name.as_str()), &ledger.name) {
            return Err(BooksError::Validation(format!(
                "Ledger '{}' already exists",
                ledger.name
            )));
        }
        debug!(name = %ledger.name, group = %ledger.group, "ledger created");
        self.ledgers.push(ledger);
        self.sort_ledgers();
        Ok(())
    }

    /// Add a ledger group
    ///
    /// Rejects blank and duplicate names, and rejects groups whose `under`
    /// chain would loop back to the new group.
    pub fn add_ledger_group(&mut self, mut group: LedgerGroup) -> BooksResult<()> {
        validate_master_name("Ledger group", &group.name)?;
        group.name = group.name.trim().to_string();
        if self.has_name(
            self.ledger_groups.iter().map(|g| g.name.as_str()),
            &group.name,
        ) {
            return Err(BooksError::Validation(format!(
                "Ledger group '{}' already exists",
                group.name
            )));
        }
        if self.ancestry_reaches(&group.under, &group.name) {
            return Err(BooksError::Validation(format!(
                "Ledger group '{}' would create a cycle under '{}'",
                group.name, group.under
            )));
        }
        debug!(name = %group.name, under = %group.under, "ledger group created");
        self.ledger_groups.push(group);
        self.sort_ledger_groups();
        Ok(())
    }

    /// Add a unit of measure
    pub fn add_unit(&mut self, mut unit: Unit) -> BooksResult<()> {
        validate_master_name("Unit", &unit.name)?;
        unit.name = unit.name.trim().to_string();
        if self.has_name(self.units.iter().map(|u| u.name.as_str()), &unit.name) {
            return Err(BooksError::Validation(format!(
                "Unit '{}' already exists",
                unit.name
            )));
        }
        self.units.push(unit);
        self.sort_units();
        Ok(())
    }

    /// Add a stock group
    pub fn add_stock_group(&mut self, mut group: StockGroup) -> BooksResult<()> {
        validate_master_name("Stock group", &group.name)?;
        group.name = group.name.trim().to_string();
        if self.has_name(
            self.stock_groups.iter().map(|g| g.name.as_str()),
            &group.name,
        ) {
            return Err(BooksError::Validation(format!(
                "Stock group '{}' already exists",
                group.name
            )));
        }
        self.stock_groups.push(group);
        self.stock_groups
            .sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(())
    }

    /// Add a stock item; the GST rate, when given, must lie in 0..=100
    pub fn add_stock_item(&mut self, mut item: StockItem) -> BooksResult<()> {
        validate_master_name("Stock item", &item.name)?;
        item.name = item.name.trim().to_string();
        if let Some(rate) = &item.gst_rate {
            crate::utils::validation::validate_gst_rate(rate)?;
        }
        if self.has_name(
            self.stock_items.iter().map(|i| i.name.as_str()),
            &item.name,
        ) {
            return Err(BooksError::Validation(format!(
                "Stock item '{}' already exists",
                item.name
            )));
        }
        debug!(name = %item.name, "stock item created");
        self.stock_items.push(item);
        self.stock_items
            .sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(())
    }

    /// Add a batch of stock items, skipping invalid and duplicate ones
    ///
    /// Returns how many were added.
    pub fn add_stock_items(&mut self, items: Vec<StockItem>) -> usize {
        let mut added = 0;
        for item in items {
            if self.add_stock_item(item).is_ok() {
                added += 1;
            }
        }
        added
    }

    /// Exact-name ledger lookup
    pub fn ledger(&self, name: &str) -> Option<&Ledger> {
        self.ledgers.iter().find(|l| l.name == name)
    }

    /// Case-insensitive ledger lookup
    pub fn match_ledger(&self, name: &str) -> Option<&Ledger> {
        let needle = name.to_lowercase();
        self.ledgers
            .iter()
            .find(|l| l.name.to_lowercase() == needle)
    }

    /// Exact-name stock item lookup
    pub fn stock_item(&self, name: &str) -> Option<&StockItem> {
        self.stock_items.iter().find(|i| i.name == name)
    }

    /// Case-insensitive stock item lookup
    pub fn match_stock_item(&self, name: &str) -> Option<&StockItem> {
        let needle = name.to_lowercase();
        self.stock_items
            .iter()
            .find(|i| i.name.to_lowercase() == needle)
    }

    /// Whether a name is a ledger group (exact match)
    pub fn is_group(&self, name: &str) -> bool {
        self.ledger_groups.iter().any(|g| g.name == name)
    }

    /// Direct member ledgers of a group
    ///
    /// Membership is single-level: only ledgers whose `group` field equals
    /// the group name exactly.
    pub fn group_members(&self, group_name: &str) -> Vec<String> {
        self.ledgers
            .iter()
            .filter(|l| l.group == group_name)
            .map(|l| l.name.clone())
            .collect()
    }

    /// Walk a group's ancestry up to the primary root
    ///
    /// Returns the chain starting at the group itself. Unknown parents end
    /// the walk; cycles cannot occur because creation rejects them.
    pub fn group_ancestry(&self, group_name: &str) -> Vec<String> {
        let mut chain = Vec::new();
        let mut current = Some(group_name.to_string());
        while let Some(name) = current {
            if chain.iter().any(|seen: &String| seen == &name) {
                break;
            }
            chain.push(name.clone());
            if name == PRIMARY_GROUP {
                break;
            }
            current = self
                .ledger_groups
                .iter()
                .find(|g| g.name == name)
                .map(|g| g.under.clone());
        }
        chain
    }

    /// Party ledgers: members of Sundry Debtors or Sundry Creditors
    pub fn party_ledgers(&self) -> Vec<&Ledger> {
        self.ledgers
            .iter()
            .filter(|l| l.group == groups::SUNDRY_DEBTORS || l.group == groups::SUNDRY_CREDITORS)
            .collect()
    }

    /// Ledgers money can settle through: bank and cash members
    pub fn settlement_accounts(&self) -> Vec<&Ledger> {
        self.ledgers
            .iter()
            .filter(|l| l.group == groups::BANK_ACCOUNTS || l.group == groups::CASH_IN_HAND)
            .collect()
    }

    fn has_name<'a>(&self, mut names: impl Iterator<Item = &'a str>, candidate: &str) -> bool {
        let needle = candidate.to_lowercase();
        names.any(|n| n.to_lowercase() == needle)
    }

    /// Whether walking `under` links from `start` reaches `target`
    fn ancestry_reaches(&self, start: &str, target: &str) -> bool {
        let target = target.to_lowercase();
        let mut current = start.to_string();
        for _ in 0..=self.ledger_groups.len() {
            if current.to_lowercase() == target {
                return true;
            }
            if current == PRIMARY_GROUP {
                return false;
            }
            match self.ledger_groups.iter().find(|g| g.name == current) {
                Some(group) => current = group.under.clone(),
                None => return false,
            }
        }
        false
    }

    fn sort_ledgers(&mut self) {
        self.ledgers
            .sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    }

    fn sort_ledger_groups(&mut self) {
        self.ledger_groups
            .sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    }

    fn sort_units(&mut self) {
        self.units
            .sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    }
}
