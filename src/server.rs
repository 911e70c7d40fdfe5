/// HTTP server factory and configuration.
/// Provides a reusable function to create and configure the HTTP server
/// for use in both the main binary and tests.

use crate::db::DbPool;
use crate::handlers::{
    create_message, delete_message, get_all_messages, get_message_by_id,
    get_messages_by_account, health, json_config, login, path_config, register, update_message,
    AppState,
};
use actix_web::{middleware, web, App, HttpServer};

/// Register the route table and extractor configs on an app
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(path_config())
        .route("/health", web::get().to(health))
        .route("/register", web::post().to(register))
        .route("/login", web::post().to(login))
        .route("/messages", web::post().to(create_message))
        .route("/messages", web::get().to(get_all_messages))
        .route("/messages/{message_id}", web::get().to(get_message_by_id))
        .route("/messages/{message_id}", web::delete().to(delete_message))
        .route("/messages/{message_id}", web::patch().to(update_message))
        .route(
            "/accounts/{account_id}/messages",
            web::get().to(get_messages_by_account),
        );
}

/// Create a configured HTTP server
///
/// Takes a database pool and bind address, then returns a fully configured
/// `HttpServer` ready to be awaited.
///
/// # Example
/// ```ignore
/// let pool = db::create_pool("socialmedia.db")?;
/// let server = server::create_http_server(pool, "127.0.0.1:8080")?;
/// server.await?;
/// ```
pub fn create_http_server(
    pool: DbPool,
    bind_addr: &str,
) -> std::io::Result<actix_web::dev::Server> {
    let state = web::Data::new(AppState::from_pool(pool));

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind(bind_addr)?
    .run();

    Ok(server)
}
