//! Unified error type for the ledger, its persistence layer and bootstrap code.

use rust_decimal::Decimal;
use thiserror::Error;

/// Every failure the crate can report.
#[derive(Debug, Error)]
pub enum Error {
    /// The backing store rejected a read or write.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Configuration could not be read or parsed.
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// File system failure during bootstrap.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Transaction amounts are magnitudes and may not be negative.
    #[error("Invalid amount: {amount} (amounts must not be negative)")]
    InvalidAmount {
        /// The rejected amount
        amount: Decimal,
    },

    /// A name failed validation (empty or whitespace only).
    #[error("Invalid name: {message}")]
    InvalidName {
        /// Why the name was rejected
        message: String,
    },

    /// The category does not exist for this user.
    #[error("Category not found: {id}")]
    CategoryNotFound {
        /// Requested category id
        id: i64,
    },

    /// The user already has a category with this name.
    #[error("Category '{name}' already exists")]
    DuplicateCategory {
        /// Conflicting name
        name: String,
    },

    /// The transaction does not exist for this user.
    #[error("Transaction not found: {id}")]
    TransactionNotFound {
        /// Requested transaction id
        id: i64,
    },

    /// No totals row has been created for this user.
    #[error("No balance record for user '{user_id}'")]
    BalanceNotFound {
        /// Owner of the missing row
        user_id: String,
    },

    /// The totals row changed since it was last read.
    #[error("Balance for user '{user_id}' was modified elsewhere; reload and retry")]
    ConcurrentModification {
        /// Owner of the contended row
        user_id: String,
    },
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
