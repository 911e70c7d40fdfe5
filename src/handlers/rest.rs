/// REST API handlers for HTTP endpoints.
/// Handles registration, login, and message CRUD. Every failure response
/// carries an empty body; the status code is the whole answer.

use crate::db::models::{AccountRequest, CreateMessageRequest, UpdateMessageRequest};
use crate::error::ServiceError;
use crate::handlers::AppState;
use actix_web::{web, HttpResponse, Result as ActixResult};
use serde_json::json;

/// Map a service failure onto its status code
fn failure(err: ServiceError) -> HttpResponse {
    match err {
        ServiceError::InvalidInput(_) => HttpResponse::BadRequest().finish(),
        ServiceError::Conflict(_) => HttpResponse::Conflict().finish(),
        ServiceError::Unauthorized => HttpResponse::Unauthorized().finish(),
        ServiceError::Store(e) => {
            log::error!("Database error: {}", e);
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Register a new account
/// POST /register
pub async fn register(
    state: web::Data<AppState>,
    req: web::Json<AccountRequest>,
) -> ActixResult<HttpResponse> {
    match state.accounts.register(&req).await {
        Ok(account) => Ok(HttpResponse::Ok().json(account)),
        Err(e) => Ok(failure(e)),
    }
}

/// Log in with username and password
/// POST /login
pub async fn login(
    state: web::Data<AppState>,
    req: web::Json<AccountRequest>,
) -> ActixResult<HttpResponse> {
    match state.accounts.login(&req).await {
        Ok(account) => Ok(HttpResponse::Ok().json(account)),
        Err(e) => Ok(failure(e)),
    }
}

/// Create a message
/// POST /messages
pub async fn create_message(
    state: web::Data<AppState>,
    req: web::Json<CreateMessageRequest>,
) -> ActixResult<HttpResponse> {
    match state.messages.create_message(&req).await {
        Ok(message) => Ok(HttpResponse::Ok().json(message)),
        Err(e) => Ok(failure(e)),
    }
}

/// List every message
/// GET /messages
pub async fn get_all_messages(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    match state.messages.get_all_messages().await {
        Ok(messages) => Ok(HttpResponse::Ok().json(messages)),
        Err(e) => Ok(failure(e)),
    }
}

/// Fetch one message; an unknown id is a 200 with an empty body
/// GET /messages/:id
pub async fn get_message_by_id(
    state: web::Data<AppState>,
    message_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    match state.messages.get_message_by_id(*message_id).await {
        Ok(Some(message)) => Ok(HttpResponse::Ok().json(message)),
        Ok(None) => Ok(HttpResponse::Ok().finish()),
        Err(e) => Ok(failure(e)),
    }
}

/// Delete a message; body is `1` when a row went away, empty otherwise
/// DELETE /messages/:id
pub async fn delete_message(
    state: web::Data<AppState>,
    message_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    match state.messages.delete_message(*message_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(1)),
        Ok(false) => Ok(HttpResponse::Ok().finish()),
        Err(e) => Ok(failure(e)),
    }
}

/// Replace a message's text
/// PATCH /messages/:id
pub async fn update_message(
    state: web::Data<AppState>,
    message_id: web::Path<i64>,
    req: web::Json<UpdateMessageRequest>,
) -> ActixResult<HttpResponse> {
    match state
        .messages
        .update_message_text(*message_id, req.message_text.as_deref())
        .await
    {
        Ok(true) => Ok(HttpResponse::Ok().json(1)),
        // invalid text and unknown id share the 400
        Ok(false) => Ok(HttpResponse::BadRequest().finish()),
        Err(e) => Ok(failure(e)),
    }
}

/// List the messages of one account; unknown accounts get `[]`
/// GET /accounts/:id/messages
pub async fn get_messages_by_account(
    state: web::Data<AppState>,
    account_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    match state.messages.get_messages_by_account(*account_id).await {
        Ok(messages) => Ok(HttpResponse::Ok().json(messages)),
        Err(e) => Ok(failure(e)),
    }
}

/// Health check endpoint
/// GET /health
pub async fn health() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(json!({
        "status": "ok"
    })))
}
