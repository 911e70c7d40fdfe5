/// Data models for accounts and messages.
/// Stored records serialize with the camelCase field names clients send.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[serde(alias = "id")]
    pub account_id: i64,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(alias = "id")]
    pub message_id: i64,
    pub posted_by: i64,
    pub message_text: String,
    pub time_posted_epoch: i64,
}

/// An account that has passed validation but has no id yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub username: String,
    pub password: String,
}

/// A message that has passed validation but has no id yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub posted_by: i64,
    pub message_text: String,
    pub time_posted_epoch: i64,
}

// Request DTOs. Every field is optional so that missing or null values reach
// validation instead of failing deserialization.

/// Body of POST /register and POST /login
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Body of POST /messages
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMessageRequest {
    pub message_text: Option<String>,
    pub posted_by: Option<i64>,
    pub time_posted_epoch: Option<i64>,
}

/// Body of PATCH /messages/{id}
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMessageRequest {
    pub message_text: Option<String>,
}
