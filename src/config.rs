/// Configuration management for the social media server.
/// Handles command-line argument parsing and config structure.
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "Social Media Server")]
#[command(about = "Account and message REST backend", long_about = None)]
pub struct Config {
    /// Address to bind (default: 127.0.0.1)
    #[arg(long, env = "SOCIAL_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Server port (default: 8080)
    #[arg(long, env = "SOCIAL_PORT", default_value = "8080")]
    pub port: u16,

    /// SQLite database file path (default: socialmedia.db)
    #[arg(long, env = "SOCIAL_DATABASE", default_value = "socialmedia.db")]
    pub database: PathBuf,

    /// PID file path (optional) - write server PID to this file on startup
    #[arg(long)]
    pub pidfile: Option<PathBuf>,
}

impl Config {
    /// Parse command-line arguments into Config
    pub fn from_args() -> Self {
        Config::parse()
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
