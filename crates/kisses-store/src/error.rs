//! Error types for the kisses ledger store.

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The consumer has no balance row.
    #[error("account not found: {account}")]
    AccountNotFound {
        /// The storage key of the missing account.
        account: String,
    },

    /// The debit would take the balance below zero.
    #[error("insufficient kisses: balance={balance}, required={required}")]
    InsufficientKisses {
        /// Current balance.
        balance: i64,
        /// Required amount.
        required: i64,
    },

    /// A stored account key did not decode; only possible if the table was
    /// written by something other than this store.
    #[error("corrupt account key in ledger: {key}")]
    CorruptKey {
        /// The undecodable key.
        key: String,
    },

    /// Database operation failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}
