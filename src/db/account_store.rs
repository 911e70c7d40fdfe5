/// SQLite-backed account storage.
/// The UNIQUE constraint on `username` is the final word on duplicates;
/// a violating insert comes back as `StoreError::Conflict`.
use async_trait::async_trait;
use rusqlite::{params, OptionalExtension, Row};

use super::models::{Account, NewAccount};
use super::{AccountRepository, DbPool, Repository};
use crate::error::{StoreError, StoreResult};

const ACCOUNT_COLUMNS: &str = "account_id, username, password";

fn account_from_row(row: &Row<'_>) -> rusqlite::Result<Account> {
    Ok(Account {
        account_id: row.get(0)?,
        username: row.get(1)?,
        password: row.get(2)?,
    })
}

#[derive(Clone)]
pub struct SqliteAccountRepository {
    pool: DbPool,
}

impl SqliteAccountRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Account, i64> for SqliteAccountRepository {
    type Draft = NewAccount;

    async fn create(&self, draft: &NewAccount) -> StoreResult<Account> {
        let conn = self.pool.lock().await;

        conn.execute(
            "INSERT INTO account (username, password) VALUES (?1, ?2)",
            params![draft.username, draft.password],
        )
        .map_err(StoreError::from_write)?;

        Ok(Account {
            account_id: conn.last_insert_rowid(),
            username: draft.username.clone(),
            password: draft.password.clone(),
        })
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Account>> {
        let conn = self.pool.lock().await;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM account WHERE account_id = ?1",
            ACCOUNT_COLUMNS
        ))?;
        let account = stmt
            .query_row(params![id], account_from_row)
            .optional()?;

        Ok(account)
    }

    async fn exists_by_id(&self, id: i64) -> StoreResult<bool> {
        let conn = self.pool.lock().await;

        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM account WHERE account_id = ?1)",
            params![id],
            |row| row.get(0),
        )?;

        Ok(exists)
    }

    async fn update(&self, record: &Account) -> StoreResult<bool> {
        let conn = self.pool.lock().await;

        let changed = conn
            .execute(
                "UPDATE account SET username = ?1, password = ?2 WHERE account_id = ?3",
                params![record.username, record.password, record.account_id],
            )
            .map_err(StoreError::from_write)?;

        Ok(changed > 0)
    }

    async fn delete_by_id(&self, id: i64) -> StoreResult<bool> {
        let conn = self.pool.lock().await;

        let deleted = conn.execute("DELETE FROM account WHERE account_id = ?1", params![id])?;

        Ok(deleted > 0)
    }

    async fn find_all(&self) -> StoreResult<Vec<Account>> {
        let conn = self.pool.lock().await;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM account ORDER BY account_id",
            ACCOUNT_COLUMNS
        ))?;
        let accounts = stmt
            .query_map([], account_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(accounts)
    }
}

#[async_trait]
impl AccountRepository for SqliteAccountRepository {
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<Account>> {
        let conn = self.pool.lock().await;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM account WHERE username = ?1",
            ACCOUNT_COLUMNS
        ))?;
        let account = stmt
            .query_row(params![username], account_from_row)
            .optional()?;

        Ok(account)
    }
}
