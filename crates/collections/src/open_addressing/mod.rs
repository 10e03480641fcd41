use thiserror::Error;

mod table;

/// Every failure leaves the table exactly as it was before the call
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TableError {
    #[error("Invalid key")]
    InvalidKey,
    #[error("Hash table full, capacity: {capacity}")]
    TableFull { capacity: usize },
    #[error("Key already exists: {0}")]
    DuplicateKey(String),
    #[error("Cannot remove from an empty hash table")]
    EmptyTable,
    #[error("Key not found: {0}")]
    KeyNotFound(String),
}

pub use table::{DEFAULT_CAPACITY, Dump, Iter, ProbingTable, Slot};
