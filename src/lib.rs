//! # Bookkeeping Core
//!
//! A voucher-based bookkeeping engine for small-business accounting in the
//! Indian GST regime.
//!
//! ## Features
//!
//! - **Master registry**: ledgers, ledger groups, stock items, units, and the
//!   company profile, with case-insensitive name uniqueness
//! - **Voucher register**: Purchase, Sales, Payment, Receipt, Contra, and
//!   Journal vouchers, appended or edited in place, never deleted
//! - **GST computation**: CGST/SGST vs IGST split derived from the supply
//!   scope, persisted on the voucher at pricing time
//! - **Derived reports**: day book, ledger/group statements with running
//!   balances, trial balance, stock summary, GSTR-1/2/3B returns, and a
//!   dashboard aggregation, each a pure fold over the register
//! - **Bulk intake**: JSON voucher arrays, spreadsheet rows, and scanned
//!   invoices via a pluggable extraction service with retry
//! - **Storage abstraction**: trait-based persistence of the seven collections
//!
//! ## Quick Start
//!
//! ```rust
//! use bookkeeping_core::{Books, Company, utils::MemoryStorage};
//!
//! # async fn open() -> bookkeeping_core::BooksResult<()> {
//! let storage = MemoryStorage::new();
//! let books = Books::load(storage, Company::new("Acme Traders", "Karnataka")).await?;
//! let trial = books.trial_balance();
//! assert!(trial.is_balanced());
//! # Ok(())
//! # }
//! ```

pub mod books;
pub mod import;
pub mod reports;
pub mod tax;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use books::*;
pub use reports::*;
pub use tax::gst::*;
pub use traits::*;
pub use types::*;

// Re-export voucher construction helpers for convenience
pub use books::vouchers::build;
