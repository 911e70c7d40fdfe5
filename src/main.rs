/// Social Media Server
///
/// Main server entry point. Handles:
/// - Command-line argument parsing
/// - Database initialization
/// - HTTP server startup
use anyhow::Context;
use social_media_server::{config::Config, db, server};
use std::fs;
use std::process;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_default_env()
        .format_timestamp_millis()
        .init();

    let config = Config::from_args();

    log::info!("Starting Social Media Server");
    log::info!("Database: {:?}", config.database);
    log::info!("Port: {}", config.port);

    if let Some(pidfile) = &config.pidfile {
        let pid = process::id().to_string();
        fs::write(pidfile, pid)
            .with_context(|| format!("Failed to write PID file {:?}", pidfile))?;
        log::info!("PID file written to: {:?}", pidfile);
    }

    let db_path = config
        .database
        .to_str()
        .context("Database path is not valid UTF-8")?;
    let pool = db::create_pool(db_path)
        .with_context(|| format!("Failed to open database {}", db_path))?;

    log::info!("Database initialized");

    let bind_addr = config.bind_addr();
    log::info!("Starting HTTP server on {}", bind_addr);

    let http_server = server::create_http_server(pool, &bind_addr)
        .with_context(|| format!("Failed to bind {}", bind_addr))?;
    http_server.await.context("HTTP server failed")?;

    Ok(())
}
