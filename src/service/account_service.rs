/// Account registration, login, and maintenance.
///
/// Passwords are kept and compared as plain text.
use std::sync::Arc;

use crate::db::models::{Account, AccountRequest, NewAccount};
use crate::db::AccountRepository;
use crate::error::{ServiceError, ServiceResult};

/// Minimum password length in UTF-16 code units.
pub const MIN_PASSWORD_LEN: usize = 4;

/// Check a registration payload and turn it into a storable account.
pub fn validate_registration(candidate: &AccountRequest) -> ServiceResult<NewAccount> {
    let username = match candidate.username.as_deref() {
        Some(name) if !name.trim().is_empty() => name,
        _ => return Err(ServiceError::InvalidInput("username is blank".to_string())),
    };
    let password = match candidate.password.as_deref() {
        Some(pw) if pw.encode_utf16().count() >= MIN_PASSWORD_LEN => pw,
        _ => {
            return Err(ServiceError::InvalidInput(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LEN
            )))
        }
    };

    Ok(NewAccount {
        username: username.to_string(),
        password: password.to_string(),
    })
}

#[derive(Clone)]
pub struct AccountService {
    accounts: Arc<dyn AccountRepository>,
}

impl AccountService {
    pub fn new(accounts: Arc<dyn AccountRepository>) -> Self {
        Self { accounts }
    }

    /// Register a new account.
    ///
    /// The username lookup only short-circuits the common duplicate case; two
    /// racing registrations are settled by the store's UNIQUE constraint.
    pub async fn register(&self, candidate: &AccountRequest) -> ServiceResult<Account> {
        let draft = validate_registration(candidate).map_err(|e| {
            log::debug!("Rejected registration: {}", e);
            e
        })?;

        if self.accounts.find_by_username(&draft.username).await?.is_some() {
            log::debug!("Username {:?} already taken", draft.username);
            return Err(ServiceError::Conflict(format!(
                "username {} already exists",
                draft.username
            )));
        }

        let account = self
            .accounts
            .create(&draft)
            .await
            .map_err(ServiceError::from_store)?;
        log::info!(
            "Registered account {} ({})",
            account.account_id,
            account.username
        );

        Ok(account)
    }

    /// Return the stored account when username and password both match.
    pub async fn login(&self, attempt: &AccountRequest) -> ServiceResult<Account> {
        let username = attempt
            .username
            .as_deref()
            .ok_or(ServiceError::Unauthorized)?;

        match self.accounts.find_by_username(username).await? {
            Some(account) if attempt.password.as_deref() == Some(account.password.as_str()) => {
                Ok(account)
            }
            _ => {
                log::debug!("Failed login for {:?}", username);
                Err(ServiceError::Unauthorized)
            }
        }
    }

    pub async fn get_account_by_id(&self, id: i64) -> ServiceResult<Option<Account>> {
        Ok(self.accounts.find_by_id(id).await?)
    }

    /// Replace username and password of an existing account.
    ///
    /// Returns `Ok(None)` when no account has this id. Taking another
    /// account's username is a `Conflict`.
    pub async fn update_account(
        &self,
        id: i64,
        replacement: &AccountRequest,
    ) -> ServiceResult<Option<Account>> {
        let Some(mut account) = self.accounts.find_by_id(id).await? else {
            return Ok(None);
        };
        let draft = validate_registration(replacement)?;
        account.username = draft.username;
        account.password = draft.password;

        let updated = self
            .accounts
            .update(&account)
            .await
            .map_err(ServiceError::from_store)?;

        Ok(updated.then_some(account))
    }

    /// Delete an account. Its messages are left in place.
    pub async fn delete_account(&self, id: i64) -> ServiceResult<bool> {
        let deleted = self.accounts.delete_by_id(id).await?;
        if deleted {
            log::info!("Deleted account {}", id);
        }
        Ok(deleted)
    }
}
