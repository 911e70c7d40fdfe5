/// HTTP handlers module
/// Provides the REST endpoints and the shared application state they run against

pub mod rest;

pub use rest::{
    create_message, delete_message, get_all_messages, get_message_by_id,
    get_messages_by_account, health, login, register, update_message,
};

use crate::db::{DbPool, SqliteAccountRepository, SqliteMessageRepository};
use crate::service::{AccountService, MessageService};
use actix_web::error::InternalError;
use actix_web::{web, HttpResponse};
use std::sync::Arc;

/// Services shared by all workers
#[derive(Clone)]
pub struct AppState {
    pub accounts: AccountService,
    pub messages: MessageService,
}

impl AppState {
    pub fn new(accounts: AccountService, messages: MessageService) -> Self {
        AppState { accounts, messages }
    }

    /// Wire SQLite repositories over one pool into both services
    pub fn from_pool(pool: DbPool) -> Self {
        let account_repo = Arc::new(SqliteAccountRepository::new(pool.clone()));
        let message_repo = Arc::new(SqliteMessageRepository::new(pool));

        AppState::new(
            AccountService::new(account_repo.clone()),
            MessageService::new(message_repo, account_repo),
        )
    }
}

/// JSON extractor config: undecodable bodies become an empty 400
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        log::debug!("Rejected request body: {}", err);
        InternalError::from_response(err, HttpResponse::BadRequest().finish()).into()
    })
}

/// Path extractor config: non-numeric ids become an empty 400
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| {
        log::debug!("Rejected path: {}", err);
        InternalError::from_response(err, HttpResponse::BadRequest().finish()).into()
    })
}
