/// SQLite-backed message storage.
use async_trait::async_trait;
use rusqlite::{params, OptionalExtension, Row};

use super::models::{Message, NewMessage};
use super::{DbPool, MessageRepository, Repository};
use crate::error::{StoreError, StoreResult};

const MESSAGE_COLUMNS: &str = "message_id, posted_by, message_text, time_posted_epoch";

fn message_from_row(row: &Row<'_>) -> rusqlite::Result<Message> {
    Ok(Message {
        message_id: row.get(0)?,
        posted_by: row.get(1)?,
        message_text: row.get(2)?,
        time_posted_epoch: row.get(3)?,
    })
}

#[derive(Clone)]
pub struct SqliteMessageRepository {
    pool: DbPool,
}

impl SqliteMessageRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Message, i64> for SqliteMessageRepository {
    type Draft = NewMessage;

    async fn create(&self, draft: &NewMessage) -> StoreResult<Message> {
        let conn = self.pool.lock().await;

        conn.execute(
            "INSERT INTO message (posted_by, message_text, time_posted_epoch) VALUES (?1, ?2, ?3)",
            params![draft.posted_by, draft.message_text, draft.time_posted_epoch],
        )
        .map_err(StoreError::from_write)?;

        Ok(Message {
            message_id: conn.last_insert_rowid(),
            posted_by: draft.posted_by,
            message_text: draft.message_text.clone(),
            time_posted_epoch: draft.time_posted_epoch,
        })
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Message>> {
        let conn = self.pool.lock().await;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM message WHERE message_id = ?1",
            MESSAGE_COLUMNS
        ))?;
        let message = stmt
            .query_row(params![id], message_from_row)
            .optional()?;

        Ok(message)
    }

    async fn exists_by_id(&self, id: i64) -> StoreResult<bool> {
        let conn = self.pool.lock().await;

        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM message WHERE message_id = ?1)",
            params![id],
            |row| row.get(0),
        )?;

        Ok(exists)
    }

    async fn update(&self, record: &Message) -> StoreResult<bool> {
        let conn = self.pool.lock().await;

        let changed = conn
            .execute(
                "UPDATE message SET posted_by = ?1, message_text = ?2, time_posted_epoch = ?3 \
                 WHERE message_id = ?4",
                params![
                    record.posted_by,
                    record.message_text,
                    record.time_posted_epoch,
                    record.message_id
                ],
            )
            .map_err(StoreError::from_write)?;

        Ok(changed > 0)
    }

    async fn delete_by_id(&self, id: i64) -> StoreResult<bool> {
        let conn = self.pool.lock().await;

        let deleted = conn.execute("DELETE FROM message WHERE message_id = ?1", params![id])?;

        Ok(deleted > 0)
    }

    async fn find_all(&self) -> StoreResult<Vec<Message>> {
        let conn = self.pool.lock().await;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM message ORDER BY message_id",
            MESSAGE_COLUMNS
        ))?;
        let messages = stmt
            .query_map([], message_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(messages)
    }
}

#[async_trait]
impl MessageRepository for SqliteMessageRepository {
    async fn find_by_posted_by(&self, account_id: i64) -> StoreResult<Vec<Message>> {
        let conn = self.pool.lock().await;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM message WHERE posted_by = ?1 ORDER BY message_id",
            MESSAGE_COLUMNS
        ))?;
        let messages = stmt
            .query_map(params![account_id], message_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(messages)
    }
}
