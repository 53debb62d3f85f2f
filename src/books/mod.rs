//! Books module containing master records, voucher storage and the orchestrator

pub mod core;
pub mod registry;
pub mod vouchers;

pub use core::*;
pub use registry::*;
pub use vouchers::*;
