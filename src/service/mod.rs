/// Service layer.
/// Validation rules and orchestration between the HTTP handlers and the
/// repositories. Services hold no state of their own beyond repository handles.

pub mod account_service;
pub mod message_service;

pub use account_service::AccountService;
pub use message_service::MessageService;
