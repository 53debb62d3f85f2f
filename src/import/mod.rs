//! Bulk intake: JSON exports, spreadsheet rows and extracted invoices

pub mod invoices;
pub mod vouchers;

pub use invoices::*;
pub use vouchers::*;
