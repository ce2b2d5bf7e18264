//! Entity store implementations

pub mod in_memory;

pub use in_memory::{
    InMemoryDataStore, InMemoryOrderRepository, InMemoryTable, InMemoryUserRepository,
};

use thiserror::Error;

/// Failures raised by entity store implementations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to acquire {access} lock on {table} table")]
    LockPoisoned {
        table: &'static str,
        access: &'static str,
    },

    #[error("{table} table has no ids left to assign")]
    IdsExhausted { table: &'static str },

    #[error("{table} id {id} is not a positive id")]
    InvalidId { table: &'static str, id: i64 },

    #[error("{table} with id {id} does not exist")]
    RowNotFound { table: &'static str, id: i64 },

    #[error("{table} {id} references missing {referenced} {referenced_id}")]
    ForeignKeyViolation {
        table: &'static str,
        id: i64,
        referenced: &'static str,
        referenced_id: i64,
    },

    #[error("{table} with {column} '{value}' already exists")]
    UniqueViolation {
        table: &'static str,
        column: &'static str,
        value: String,
    },
}
