/// Error types for the social media server.
/// Storage errors come from the repositories, service errors from validation.
use rusqlite::ffi;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Unique constraint violated: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl StoreError {
    /// Classify a write error, turning UNIQUE violations into `Conflict`.
    pub fn from_write(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, msg)
                if e.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                StoreError::Conflict(msg.clone().unwrap_or_else(|| e.to_string()))
            }
            _ => StoreError::Database(err),
        }
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

impl ServiceError {
    /// Storage conflicts become service conflicts; everything else is internal.
    pub fn from_store(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(msg) => ServiceError::Conflict(msg),
            other => ServiceError::Store(other),
        }
    }
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
