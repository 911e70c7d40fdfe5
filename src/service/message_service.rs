/// Message creation, lookup, text edits, and deletion.
use std::sync::Arc;

use chrono::Utc;

use crate::db::models::{CreateMessageRequest, Message, NewMessage};
use crate::db::{AccountRepository, MessageRepository};
use crate::error::{ServiceError, ServiceResult};

pub const MAX_MESSAGE_LEN: usize = 255;

/// Text must be non-blank and at most 255 UTF-16 code units long. The length
/// is measured on the text as given, surrounding whitespace included.
pub fn validate_message_text(text: Option<&str>) -> ServiceResult<&str> {
    match text {
        Some(t) if t.trim().is_empty() => {
            Err(ServiceError::InvalidInput("message text is blank".to_string()))
        }
        Some(t) if t.encode_utf16().count() > MAX_MESSAGE_LEN => Err(ServiceError::InvalidInput(
            format!("message text exceeds {} characters", MAX_MESSAGE_LEN),
        )),
        Some(t) => Ok(t),
        None => Err(ServiceError::InvalidInput("message text is missing".to_string())),
    }
}

#[derive(Clone)]
pub struct MessageService {
    messages: Arc<dyn MessageRepository>,
    accounts: Arc<dyn AccountRepository>,
}

impl MessageService {
    pub fn new(messages: Arc<dyn MessageRepository>, accounts: Arc<dyn AccountRepository>) -> Self {
        Self { messages, accounts }
    }

    /// Create a message for an existing account.
    ///
    /// Blank text, over-long text, and an unknown author are all reported as
    /// the same `InvalidInput`.
    pub async fn create_message(&self, candidate: &CreateMessageRequest) -> ServiceResult<Message> {
        let text = validate_message_text(candidate.message_text.as_deref())?;
        let posted_by = candidate
            .posted_by
            .ok_or_else(|| ServiceError::InvalidInput("postedBy is missing".to_string()))?;
        if !self.accounts.exists_by_id(posted_by).await? {
            log::debug!("Rejected message from unknown account {}", posted_by);
            return Err(ServiceError::InvalidInput(format!(
                "account {} does not exist",
                posted_by
            )));
        }

        let draft = NewMessage {
            posted_by,
            message_text: text.to_string(),
            time_posted_epoch: candidate
                .time_posted_epoch
                .unwrap_or_else(|| Utc::now().timestamp()),
        };
        let message = self.messages.create(&draft).await?;
        log::info!("Account {} posted message {}", posted_by, message.message_id);

        Ok(message)
    }

    pub async fn get_all_messages(&self) -> ServiceResult<Vec<Message>> {
        Ok(self.messages.find_all().await?)
    }

    pub async fn get_message_by_id(&self, id: i64) -> ServiceResult<Option<Message>> {
        Ok(self.messages.find_by_id(id).await?)
    }

    /// Returns false when there was nothing to delete.
    pub async fn delete_message(&self, id: i64) -> ServiceResult<bool> {
        let deleted = self.messages.delete_by_id(id).await?;
        if deleted {
            log::info!("Deleted message {}", id);
        }
        Ok(deleted)
    }

    /// Replace the text of a message, leaving every other field alone.
    ///
    /// Invalid text and a missing message both yield `Ok(false)`; storage is
    /// not touched for invalid text.
    pub async fn update_message_text(&self, id: i64, new_text: Option<&str>) -> ServiceResult<bool> {
        let text = match validate_message_text(new_text) {
            Ok(text) => text,
            Err(e) => {
                log::debug!("Rejected update of message {}: {}", id, e);
                return Ok(false);
            }
        };

        let Some(mut message) = self.messages.find_by_id(id).await? else {
            return Ok(false);
        };
        message.message_text = text.to_string();

        Ok(self.messages.update(&message).await?)
    }

    /// Messages posted by `account_id`; empty if the account does not exist.
    pub async fn get_messages_by_account(&self, account_id: i64) -> ServiceResult<Vec<Message>> {
        if !self.accounts.exists_by_id(account_id).await? {
            return Ok(Vec::new());
        }
        Ok(self.messages.find_by_posted_by(account_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::NewAccount;
    use crate::db::{create_test_pool, Repository, SqliteAccountRepository, SqliteMessageRepository};

    struct Fixture {
        service: MessageService,
        accounts: Arc<SqliteAccountRepository>,
        messages: Arc<SqliteMessageRepository>,
    }

    fn fixture() -> Fixture {
        let pool = create_test_pool();
        let accounts = Arc::new(SqliteAccountRepository::new(pool.clone()));
        let messages = Arc::new(SqliteMessageRepository::new(pool));
        Fixture {
            service: MessageService::new(messages.clone(), accounts.clone()),
            accounts,
            messages,
        }
    }

    async fn add_account(fx: &Fixture, username: &str) -> i64 {
        fx.accounts
            .create(&NewAccount {
                username: username.to_string(),
                password: "pass1234".to_string(),
            })
            .await
            .expect("Failed to create account")
            .account_id
    }

    fn candidate(text: Option<&str>, posted_by: Option<i64>) -> CreateMessageRequest {
        CreateMessageRequest {
            message_text: text.map(str::to_string),
            posted_by,
            time_posted_epoch: Some(1669947792),
        }
    }

    #[test]
    fn test_validate_message_text() {
        assert!(validate_message_text(Some("hi")).is_ok());
        assert!(validate_message_text(None).is_err());
        assert!(validate_message_text(Some("")).is_err());
        assert!(validate_message_text(Some("   ")).is_err());
        assert!(validate_message_text(Some("a".repeat(255).as_str())).is_ok());
        assert!(validate_message_text(Some("a".repeat(256).as_str())).is_err());
    }

    #[test]
    fn test_length_counts_surrounding_whitespace() {
        let padded = format!(" {} ", "a".repeat(254));
        assert_eq!(padded.chars().count(), 256);
        assert!(validate_message_text(Some(padded.as_str())).is_err());
    }

    #[test]
    fn test_length_counts_utf16_units() {
        // each emoji is one char but two UTF-16 units
        let at_limit = format!("{}a", "\u{1F600}".repeat(127));
        assert_eq!(at_limit.encode_utf16().count(), 255);
        assert!(validate_message_text(Some(at_limit.as_str())).is_ok());

        let over = "\u{1F600}".repeat(128);
        assert_eq!(over.chars().count(), 128);
        assert!(validate_message_text(Some(over.as_str())).is_err());

        // accented letters are a single unit each
        assert!(validate_message_text(Some("\u{e9}".repeat(255).as_str())).is_ok());
    }

    #[tokio::test]
    async fn test_create_message() {
        let fx = fixture();
        let author = add_account(&fx, "alice").await;

        let message = fx
            .service
            .create_message(&candidate(Some("hello"), Some(author)))
            .await
            .expect("Create failed");

        assert!(message.message_id > 0);
        assert_eq!(message.posted_by, author);
        assert_eq!(message.message_text, "hello");
        assert_eq!(message.time_posted_epoch, 1669947792);
    }

    #[tokio::test]
    async fn test_create_message_stamps_time_when_absent() {
        let fx = fixture();
        let author = add_account(&fx, "alice").await;
        let before = Utc::now().timestamp();

        let message = fx
            .service
            .create_message(&CreateMessageRequest {
                message_text: Some("now".to_string()),
                posted_by: Some(author),
                time_posted_epoch: None,
            })
            .await
            .expect("Create failed");

        assert!(message.time_posted_epoch >= before);
    }

    #[tokio::test]
    async fn test_create_message_rejections_persist_nothing() {
        let fx = fixture();
        let author = add_account(&fx, "alice").await;
        let too_long = "x".repeat(256);

        for bad in [
            candidate(None, Some(author)),
            candidate(Some(" "), Some(author)),
            candidate(Some(too_long.as_str()), Some(author)),
            candidate(Some("hello"), None),
            candidate(Some("hello"), Some(author + 1000)),
        ] {
            let result = fx.service.create_message(&bad).await;
            assert!(matches!(result, Err(ServiceError::InvalidInput(_))));
        }
        assert!(fx.messages.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_all_and_by_id() {
        let fx = fixture();
        let author = add_account(&fx, "alice").await;
        assert!(fx.service.get_all_messages().await.unwrap().is_empty());

        let m1 = fx
            .service
            .create_message(&candidate(Some("one"), Some(author)))
            .await
            .unwrap();
        let m2 = fx
            .service
            .create_message(&candidate(Some("two"), Some(author)))
            .await
            .unwrap();

        let all = fx.service.get_all_messages().await.unwrap();
        assert_eq!(all, vec![m1.clone(), m2]);
        assert_eq!(
            fx.service.get_message_by_id(m1.message_id).await.unwrap(),
            Some(m1)
        );
        assert_eq!(fx.service.get_message_by_id(4040).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_message_is_idempotent() {
        let fx = fixture();
        let author = add_account(&fx, "alice").await;
        let message = fx
            .service
            .create_message(&candidate(Some("bye"), Some(author)))
            .await
            .unwrap();

        assert!(fx.service.delete_message(message.message_id).await.unwrap());
        assert!(!fx.service.delete_message(message.message_id).await.unwrap());
        assert!(!fx.service.delete_message(message.message_id).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_message_text() {
        let fx = fixture();
        let author = add_account(&fx, "alice").await;
        let message = fx
            .service
            .create_message(&candidate(Some("before"), Some(author)))
            .await
            .unwrap();

        assert!(fx
            .service
            .update_message_text(message.message_id, Some("after"))
            .await
            .unwrap());

        let stored = fx
            .service
            .get_message_by_id(message.message_id)
            .await
            .unwrap()
            .expect("Message missing");
        assert_eq!(stored.message_text, "after");
        assert_eq!(stored.posted_by, message.posted_by);
        assert_eq!(stored.time_posted_epoch, message.time_posted_epoch);
    }

    #[tokio::test]
    async fn test_update_rejections_leave_text_unchanged() {
        let fx = fixture();
        let author = add_account(&fx, "alice").await;
        let message = fx
            .service
            .create_message(&candidate(Some("original"), Some(author)))
            .await
            .unwrap();
        let too_long = "y".repeat(256);

        for bad in [None, Some(""), Some("  "), Some(too_long.as_str())] {
            assert!(!fx
                .service
                .update_message_text(message.message_id, bad)
                .await
                .unwrap());
        }
        assert!(!fx
            .service
            .update_message_text(message.message_id + 1, Some("valid"))
            .await
            .unwrap());

        let stored = fx
            .service
            .get_message_by_id(message.message_id)
            .await
            .unwrap()
            .expect("Message missing");
        assert_eq!(stored.message_text, "original");
    }

    #[tokio::test]
    async fn test_get_messages_by_account() {
        let fx = fixture();
        let alice = add_account(&fx, "alice").await;
        let bob = add_account(&fx, "bob").await;

        let a1 = fx
            .service
            .create_message(&candidate(Some("a1"), Some(alice)))
            .await
            .unwrap();
        fx.service
            .create_message(&candidate(Some("b1"), Some(bob)))
            .await
            .unwrap();

        assert_eq!(
            fx.service.get_messages_by_account(alice).await.unwrap(),
            vec![a1]
        );
        assert!(fx
            .service
            .get_messages_by_account(bob + 1000)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_messages_of_deleted_account_are_hidden_but_kept() {
        let fx = fixture();
        let alice = add_account(&fx, "alice").await;
        fx.service
            .create_message(&candidate(Some("orphan"), Some(alice)))
            .await
            .unwrap();

        assert!(fx.accounts.delete_by_id(alice).await.unwrap());

        assert!(fx
            .service
            .get_messages_by_account(alice)
            .await
            .unwrap()
            .is_empty());
        assert_eq!(fx.service.get_all_messages().await.unwrap().len(), 1);
    }
}
