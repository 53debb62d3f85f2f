//! Utility modules

pub mod hsn_directory;
pub mod memory_storage;
pub mod validation;

pub use hsn_directory::*;
pub use memory_storage::*;
pub use validation::*;
