/// Database layer for persistent storage.
/// Exposes the shared connection pool and the repository traits the services
/// are written against, with SQLite implementations for accounts and messages.

pub mod account_store;
pub mod init;
pub mod message_store;
pub mod models;

pub use account_store::SqliteAccountRepository;
pub use message_store::SqliteMessageRepository;

use crate::error::StoreResult;
use async_trait::async_trait;
use models::{Account, Message, NewAccount, NewMessage};
use rusqlite::{Connection, Result as SqliteResult};
use std::sync::Arc;
use tokio::sync::Mutex;

pub type DbPool = Arc<Mutex<Connection>>;

/// Create a connection pool (simplified for single-threaded SQLite)
pub fn create_pool(db_path: &str) -> SqliteResult<DbPool> {
    let conn = Connection::open(db_path)?;
    init::initialize_database(&conn)?;
    Ok(Arc::new(Mutex::new(conn)))
}

/// Create an in-memory database for testing
pub fn create_test_pool() -> DbPool {
    let conn = Connection::open_in_memory().expect("Failed to create in-memory DB");
    init::initialize_database(&conn).expect("Failed to initialize DB");
    Arc::new(Mutex::new(conn))
}

/// Keyed storage for one record type.
///
/// `T` is the stored record, `K` its store-generated identifier and `Draft`
/// the shape of a record before it has been assigned an id.
#[async_trait]
pub trait Repository<T, K>: Send + Sync
where
    T: Send + 'static,
    K: Send + 'static,
{
    type Draft: Sync;

    /// Insert a record. Uniqueness violations are reported as `StoreError::Conflict`.
    async fn create(&self, draft: &Self::Draft) -> StoreResult<T>;

    async fn find_by_id(&self, id: K) -> StoreResult<Option<T>>;

    async fn exists_by_id(&self, id: K) -> StoreResult<bool>;

    /// Overwrite the stored row with the same id; false if none matched.
    async fn update(&self, record: &T) -> StoreResult<bool>;

    /// Returns true if a row was deleted.
    async fn delete_by_id(&self, id: K) -> StoreResult<bool>;

    /// All records in id order.
    async fn find_all(&self) -> StoreResult<Vec<T>>;
}

#[async_trait]
pub trait AccountRepository: Repository<Account, i64, Draft = NewAccount> {
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<Account>>;
}

#[async_trait]
pub trait MessageRepository: Repository<Message, i64, Draft = NewMessage> {
    /// All messages whose `posted_by` equals `account_id`, in id order.
    async fn find_by_posted_by(&self, account_id: i64) -> StoreResult<Vec<Message>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_file_pool_persists_across_reopen() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("social.db");
        let path = path.to_str().expect("Non UTF-8 temp path");

        {
            let pool = create_pool(path).expect("Failed to create pool");
            let accounts = SqliteAccountRepository::new(pool);
            accounts
                .create(&NewAccount {
                    username: "alice".to_string(),
                    password: "pass1234".to_string(),
                })
                .await
                .expect("Failed to create account");
        }

        let pool = create_pool(path).expect("Failed to reopen pool");
        let accounts = SqliteAccountRepository::new(pool);
        let alice = accounts
            .find_by_username("alice")
            .await
            .expect("Query failed")
            .expect("Account not found");
        assert_eq!(alice.password, "pass1234");
    }

    #[tokio::test]
    async fn test_repositories_share_pool() {
        let pool = create_test_pool();
        let accounts = SqliteAccountRepository::new(pool.clone());
        let messages = SqliteMessageRepository::new(pool);

        let alice = accounts
            .create(&NewAccount {
                username: "alice".to_string(),
                password: "pass1234".to_string(),
            })
            .await
            .expect("Failed to create account");
        messages
            .create(&NewMessage {
                posted_by: alice.account_id,
                message_text: "hello".to_string(),
                time_posted_epoch: 0,
            })
            .await
            .expect("Failed to create message");

        let by_alice = messages
            .find_by_posted_by(alice.account_id)
            .await
            .expect("Query failed");
        assert_eq!(by_alice.len(), 1);
    }
}
