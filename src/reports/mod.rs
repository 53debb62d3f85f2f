//! Reports derived from the voucher register
//!
//! Every report here is a pure fold over the master records and the voucher
//! list. Nothing is cached or persisted, so a report is always consistent
//! with the data it was handed.

pub mod dashboard;
pub mod day_book;
pub mod gst_returns;
pub mod impact;
pub mod statement;
pub mod stock_summary;
pub mod trial_balance;

pub use dashboard::*;
pub use day_book::*;
pub use gst_returns::*;
pub use impact::*;
pub use statement::*;
pub use stock_summary::*;
pub use trial_balance::*;
