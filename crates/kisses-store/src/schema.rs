//! Ledger schema.
//!
//! A single table holds both account namespaces; consumer wallet addresses
//! and `creator/model` composite keys share the `account_id` column (the
//! encoding is defined by `kisses_core::AccountId`).

use sqlx::SqlitePool;

use crate::error::Result;

/// The balances table.
pub const CREATE_KISSES_TABLE: &str = "
CREATE TABLE IF NOT EXISTS kisses (
    account_id TEXT PRIMARY KEY,
    kisses     INTEGER NOT NULL DEFAULT 0
)
";

/// Apply the schema to a fresh or existing database.
///
/// Idempotent; safe to run at every process start.
///
/// # Errors
///
/// Returns an error if the DDL fails.
pub async fn migrate(pool: &SqlitePool) -> Result<()> {
    sqlx::query(CREATE_KISSES_TABLE).execute(pool).await?;
    Ok(())
}
