//! SQLite storage layer for the kisses ledger.
//!
//! One relational table maps account keys to integer kiss balances. All
//! balance movement happens through the [`Ledger`] trait, whose only
//! mutating operations are the lazily-initializing balance read and the
//! atomic generation transfer (plus its compensating refund).
//!
//! # Example
//!
//! ```no_run
//! use kisses_core::{AccountId, KissAmounts};
//! use kisses_store::{Ledger, SqliteLedger};
//!
//! # async fn example() -> Result<(), kisses_store::StoreError> {
//! let ledger = SqliteLedger::open("/tmp/kisses.db", KissAmounts::default()).await?;
//!
//! let consumer = AccountId::consumer("0xabc").unwrap();
//! let balance = ledger.get_or_init_balance(&consumer).await?;
//! assert_eq!(balance, 10);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod schema;
pub mod sqlite;

pub use error::{Result, StoreError};
pub use sqlite::SqliteLedger;

use kisses_core::AccountId;

/// The ledger trait defining all balance operations.
///
/// Abstracts the storage layer so the service can be handed any
/// implementation (SQLite in production, and it keeps the handlers honest
/// about which mutations exist at all).
#[async_trait::async_trait]
pub trait Ledger: Send + Sync {
    /// Read an account's balance, creating the row with the welcome grant
    /// if it does not exist yet.
    ///
    /// Concurrent first reads of the same absent account race on the
    /// insert; the primary-key constraint rejects the loser and both
    /// callers observe the same single row.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn get_or_init_balance(&self, account: &AccountId) -> Result<i64>;

    /// Read an account's balance without initializing it.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn balance(&self, account: &AccountId) -> Result<Option<i64>>;

    /// List every creator/model account with its balance, highest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails or a stored key
    /// does not decode as an account id.
    async fn list_attributed_balances(&self) -> Result<Vec<(AccountId, i64)>>;

    /// Atomically charge one generation: debit the consumer by the
    /// generation cost and credit the creator/model account by the reward,
    /// creating the creator row if needed.
    ///
    /// Either both movements commit or neither does. The debit is a
    /// conditional update, so concurrent transfers against one consumer
    /// serialize on the row and can never double-spend.
    ///
    /// # Errors
    ///
    /// - [`StoreError::AccountNotFound`] if the consumer has no row
    /// - [`StoreError::InsufficientKisses`] if the debit would go negative
    /// - [`StoreError::Database`] on storage failure
    async fn transfer_on_generation(&self, consumer: &AccountId, creator: &AccountId)
        -> Result<()>;

    /// Compensate a charge whose generation later failed: credit the
    /// consumer back the generation cost and claw the reward back from the
    /// creator (never below zero), atomically.
    ///
    /// # Errors
    ///
    /// - [`StoreError::AccountNotFound`] if the consumer has no row
    /// - [`StoreError::Database`] on storage failure
    async fn refund_generation(&self, consumer: &AccountId, creator: &AccountId) -> Result<()>;
}
