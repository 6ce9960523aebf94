//! SQLite implementation of the [`Ledger`] trait.

use std::path::Path;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;

use kisses_core::{AccountId, KissAmounts};

use crate::error::{Result, StoreError};
use crate::schema;
use crate::Ledger;

/// How long a caller waits for a pool connection before failing.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// How long SQLite waits on a locked database before erroring.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Maximum pool size.
const MAX_CONNECTIONS: u32 = 8;

/// A kisses ledger backed by a SQLite database file.
///
/// Constructed explicitly at process start and passed into the service
/// state; there is no module-level pool. Dropping the ledger (or calling
/// [`SqliteLedger::close`]) releases every connection.
#[derive(Debug, Clone)]
pub struct SqliteLedger {
    pool: SqlitePool,
    amounts: KissAmounts,
}

impl SqliteLedger {
    /// Open (creating if missing) the ledger database at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrated.
    pub async fn open(path: impl AsRef<Path>, amounts: KissAmounts) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT);

        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_with(options)
            .await?;

        schema::migrate(&pool).await?;

        Ok(Self { pool, amounts })
    }

    /// The amounts this ledger moves per operation.
    #[must_use]
    pub const fn amounts(&self) -> &KissAmounts {
        &self.amounts
    }

    /// Close the pool, waiting for in-flight operations to finish.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait::async_trait]
impl Ledger for SqliteLedger {
    async fn get_or_init_balance(&self, account: &AccountId) -> Result<i64> {
        let key = account.storage_key();

        // A losing concurrent insert hits the primary key and is a no-op;
        // both callers then read the one surviving row.
        sqlx::query(
            "INSERT INTO kisses (account_id, kisses) VALUES (?, ?) \
             ON CONFLICT(account_id) DO NOTHING",
        )
        .bind(&key)
        .bind(self.amounts.welcome_grant)
        .execute(&self.pool)
        .await?;

        let balance: i64 = sqlx::query_scalar("SELECT kisses FROM kisses WHERE account_id = ?")
            .bind(&key)
            .fetch_one(&self.pool)
            .await?;

        Ok(balance)
    }

    async fn balance(&self, account: &AccountId) -> Result<Option<i64>> {
        let balance = sqlx::query_scalar("SELECT kisses FROM kisses WHERE account_id = ?")
            .bind(account.storage_key())
            .fetch_optional(&self.pool)
            .await?;
        Ok(balance)
    }

    async fn list_attributed_balances(&self) -> Result<Vec<(AccountId, i64)>> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT account_id, kisses FROM kisses \
             WHERE account_id LIKE '%/%' ORDER BY kisses DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut out = Vec::with_capacity(rows.len());
        for (key, kisses) in rows {
            let account = key
                .parse::<AccountId>()
                .map_err(|_| StoreError::CorruptKey { key: key.clone() })?;
            out.push((account, kisses));
        }
        Ok(out)
    }

    async fn transfer_on_generation(
        &self,
        consumer: &AccountId,
        creator: &AccountId,
    ) -> Result<()> {
        let cost = self.amounts.generation_cost;
        let reward = self.amounts.creator_reward;
        let consumer_key = consumer.storage_key();
        let creator_key = creator.storage_key();

        let mut tx = self.pool.begin().await?;

        // Conditional debit first: the row write lock is the serialization
        // point, so contending transfers can never both pass the balance
        // check against the same funds.
        let debited = sqlx::query(
            "UPDATE kisses SET kisses = kisses - ?1 \
             WHERE account_id = ?2 AND kisses >= ?1",
        )
        .bind(cost)
        .bind(&consumer_key)
        .execute(&mut *tx)
        .await?;

        if debited.rows_affected() == 0 {
            let balance: Option<i64> =
                sqlx::query_scalar("SELECT kisses FROM kisses WHERE account_id = ?")
                    .bind(&consumer_key)
                    .fetch_optional(&mut *tx)
                    .await?;
            tx.rollback().await?;
            return Err(match balance {
                None => StoreError::AccountNotFound {
                    account: consumer_key,
                },
                Some(balance) => StoreError::InsufficientKisses {
                    balance,
                    required: cost,
                },
            });
        }

        // Creator row is lazily created at the reward amount.
        sqlx::query(
            "INSERT INTO kisses (account_id, kisses) VALUES (?, ?) \
             ON CONFLICT(account_id) DO UPDATE SET kisses = kisses + excluded.kisses",
        )
        .bind(&creator_key)
        .bind(reward)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!(
            consumer = %consumer_key,
            creator = %creator_key,
            cost,
            reward,
            "generation charge committed"
        );
        Ok(())
    }

    async fn refund_generation(&self, consumer: &AccountId, creator: &AccountId) -> Result<()> {
        let cost = self.amounts.generation_cost;
        let reward = self.amounts.creator_reward;
        let consumer_key = consumer.storage_key();
        let creator_key = creator.storage_key();

        let mut tx = self.pool.begin().await?;

        let credited = sqlx::query("UPDATE kisses SET kisses = kisses + ? WHERE account_id = ?")
            .bind(cost)
            .bind(&consumer_key)
            .execute(&mut *tx)
            .await?;

        if credited.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(StoreError::AccountNotFound {
                account: consumer_key,
            });
        }

        // Claw the reward back without ever driving the creator negative;
        // a missing creator row means there is nothing to claw back.
        sqlx::query("UPDATE kisses SET kisses = MAX(kisses - ?, 0) WHERE account_id = ?")
            .bind(reward)
            .bind(&creator_key)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!(
            consumer = %consumer_key,
            creator = %creator_key,
            cost,
            reward,
            "generation charge refunded"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::TempDir;

    async fn open_temp(amounts: KissAmounts) -> (TempDir, SqliteLedger) {
        let dir = TempDir::new().expect("temp dir");
        let ledger = SqliteLedger::open(dir.path().join("kisses.db"), amounts)
            .await
            .expect("open ledger");
        (dir, ledger)
    }

    fn consumer(address: &str) -> AccountId {
        AccountId::consumer(address).unwrap()
    }

    fn creator(creator: &str, model: &str) -> AccountId {
        AccountId::creator_model(creator, model).unwrap()
    }

    #[tokio::test]
    async fn first_read_grants_welcome_kisses() {
        let (_dir, ledger) = open_temp(KissAmounts::default()).await;
        let account = consumer("0xabc");

        assert_eq!(ledger.get_or_init_balance(&account).await.unwrap(), 10);
        // Second read returns the stored balance, no second grant.
        assert_eq!(ledger.get_or_init_balance(&account).await.unwrap(), 10);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn concurrent_first_reads_create_one_row() {
        let (_dir, ledger) = open_temp(KissAmounts::default()).await;
        let ledger = Arc::new(ledger);
        let account = consumer("0xfresh");

        let a = tokio::spawn({
            let ledger = Arc::clone(&ledger);
            let account = account.clone();
            async move { ledger.get_or_init_balance(&account).await }
        });
        let b = tokio::spawn({
            let ledger = Arc::clone(&ledger);
            let account = account.clone();
            async move { ledger.get_or_init_balance(&account).await }
        });

        let (a, b) = (a.await.unwrap(), b.await.unwrap());
        assert_eq!(a.unwrap(), 10);
        assert_eq!(b.unwrap(), 10);

        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM kisses")
            .fetch_one(&ledger.pool)
            .await
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[tokio::test]
    async fn transfer_conserves_amounts() {
        let amounts = KissAmounts {
            welcome_grant: 30,
            ..KissAmounts::default()
        };
        let (_dir, ledger) = open_temp(amounts).await;
        let user = consumer("0xabc");
        let reward = creator("alice", "modelX");

        assert_eq!(ledger.get_or_init_balance(&user).await.unwrap(), 30);

        ledger.transfer_on_generation(&user, &reward).await.unwrap();
        assert_eq!(ledger.balance(&user).await.unwrap(), Some(20));
        // Creator row is created at the reward amount.
        assert_eq!(ledger.balance(&reward).await.unwrap(), Some(2));

        ledger.transfer_on_generation(&user, &reward).await.unwrap();
        assert_eq!(ledger.balance(&user).await.unwrap(), Some(10));
        assert_eq!(ledger.balance(&reward).await.unwrap(), Some(4));
    }

    #[tokio::test]
    async fn transfer_unknown_consumer_mutates_nothing() {
        let (_dir, ledger) = open_temp(KissAmounts::default()).await;
        let user = consumer("0xnobody");
        let reward = creator("alice", "modelX");

        let err = ledger
            .transfer_on_generation(&user, &reward)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::AccountNotFound { .. }));
        assert_eq!(ledger.balance(&reward).await.unwrap(), None);
    }

    #[tokio::test]
    async fn transfer_insufficient_rolls_back() {
        let (_dir, ledger) = open_temp(KissAmounts::default()).await;
        let user = consumer("0xabc");
        let reward = creator("alice", "modelX");

        ledger.get_or_init_balance(&user).await.unwrap();
        ledger.transfer_on_generation(&user, &reward).await.unwrap();

        let err = ledger
            .transfer_on_generation(&user, &reward)
            .await
            .unwrap_err();
        match err {
            StoreError::InsufficientKisses { balance, required } => {
                assert_eq!(balance, 0);
                assert_eq!(required, 10);
            }
            other => panic!("unexpected error: {other}"),
        }

        // The failed transfer left both sides untouched.
        assert_eq!(ledger.balance(&user).await.unwrap(), Some(0));
        assert_eq!(ledger.balance(&reward).await.unwrap(), Some(2));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn contending_transfers_spend_exactly_once() {
        let (_dir, ledger) = open_temp(KissAmounts::default()).await;
        let ledger = Arc::new(ledger);
        let user = consumer("0xabc");
        let reward = creator("alice", "modelX");

        // Balance is exactly one generation's worth.
        assert_eq!(ledger.get_or_init_balance(&user).await.unwrap(), 10);

        let a = tokio::spawn({
            let ledger = Arc::clone(&ledger);
            let (user, reward) = (user.clone(), reward.clone());
            async move { ledger.transfer_on_generation(&user, &reward).await }
        });
        let b = tokio::spawn({
            let ledger = Arc::clone(&ledger);
            let (user, reward) = (user.clone(), reward.clone());
            async move { ledger.transfer_on_generation(&user, &reward).await }
        });

        let results = [a.await.unwrap(), b.await.unwrap()];
        let successes = results.iter().filter(|r| r.is_ok()).count();
        let insufficient = results
            .iter()
            .filter(|r| matches!(r, Err(StoreError::InsufficientKisses { .. })))
            .count();

        assert_eq!(successes, 1);
        assert_eq!(insufficient, 1);
        assert_eq!(ledger.balance(&user).await.unwrap(), Some(0));
        assert_eq!(ledger.balance(&reward).await.unwrap(), Some(2));
    }

    #[tokio::test]
    async fn listing_filters_and_orders() {
        let (_dir, ledger) = open_temp(KissAmounts::default()).await;

        for (key, kisses) in [("0xabc", 10_i64), ("alice/modelX", 4), ("bob/modelY", 12)] {
            sqlx::query("INSERT INTO kisses (account_id, kisses) VALUES (?, ?)")
                .bind(key)
                .bind(kisses)
                .execute(&ledger.pool)
                .await
                .unwrap();
        }

        let listed = ledger.list_attributed_balances().await.unwrap();
        let listed: Vec<(String, i64)> = listed
            .into_iter()
            .map(|(a, k)| (a.storage_key(), k))
            .collect();
        assert_eq!(
            listed,
            vec![("bob/modelY".into(), 12), ("alice/modelX".into(), 4)]
        );
    }

    #[tokio::test]
    async fn refund_reverses_a_charge() {
        let (_dir, ledger) = open_temp(KissAmounts::default()).await;
        let user = consumer("0xabc");
        let reward = creator("alice", "modelX");

        ledger.get_or_init_balance(&user).await.unwrap();
        ledger.transfer_on_generation(&user, &reward).await.unwrap();
        ledger.refund_generation(&user, &reward).await.unwrap();

        assert_eq!(ledger.balance(&user).await.unwrap(), Some(10));
        assert_eq!(ledger.balance(&reward).await.unwrap(), Some(0));
    }

    #[tokio::test]
    async fn refund_unknown_consumer_fails() {
        let (_dir, ledger) = open_temp(KissAmounts::default()).await;
        let user = consumer("0xnobody");
        let reward = creator("alice", "modelX");

        let err = ledger.refund_generation(&user, &reward).await.unwrap_err();
        assert!(matches!(err, StoreError::AccountNotFound { .. }));
    }

    #[tokio::test]
    async fn refund_never_drives_creator_negative() {
        let (_dir, ledger) = open_temp(KissAmounts::default()).await;
        let user = consumer("0xabc");
        let reward = creator("alice", "modelX");

        ledger.get_or_init_balance(&user).await.unwrap();
        // Creator has no row at all; refund still restores the consumer.
        ledger.refund_generation(&user, &reward).await.unwrap();
        assert_eq!(ledger.balance(&user).await.unwrap(), Some(20));
        assert_eq!(ledger.balance(&reward).await.unwrap(), None);
    }
}
