//! Social media server library.
//! Account registration/login and message CRUD over SQLite, served by actix-web.
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod server;
pub mod service;
