//! Environment configuration for the round service.

use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub api_key: String,
    pub bind: String,
    /// Optional JSON catalog that replaces the stored one at boot.
    pub game_config: Option<PathBuf>,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://raspadinha.db?mode=rwc".to_string()),
            api_key: env::var("API_KEY").unwrap_or_else(|_| "dev-key".into()),
            bind: env::var("BIND").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            game_config: env::var_os("GAME_CONFIG").map(PathBuf::from),
        }
    }
}
