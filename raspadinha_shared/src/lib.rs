use chrono::{DateTime, Utc};
use raspadinha_core::GameCatalog;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RoundRequest {
    pub client_seed: String,
    /// Account type as stored by the backend, e.g. "blogger".
    #[serde(default)]
    pub user_type: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RoundResponse {
    pub server_seed_hash: String,
    pub nonce: u64,
    pub segment: String,
    /// Catalog the round was played against; needed to replay it later.
    pub catalog_version: u32,
    pub is_win: bool,
    pub prize_value: f64,
    pub grid: Vec<String>, // cell labels in display order
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct VerifyResponse {
    pub server_seed_hash: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AdminSetCatalogRequest {
    /// Validated by the server before it is stored.
    pub catalog: GameCatalog,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RoundLogEntry {
    pub id: i64,
    pub ts: DateTime<Utc>,
    pub client_seed: String,
    pub nonce: i64,
    pub server_seed_hash: String,
    pub segment: String,
    pub catalog_version: u32,
    pub is_win: bool,
    pub prize_value: f64,
    pub grid: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("invalid request: {0}")]
    Invalid(String),
    #[error("invalid game configuration: {0}")]
    Configuration(String),
    #[error("unauthorized")]
    Unauthorized,
    #[error("internal server error")]
    Internal,
}

pub type ApiResult<T> = Result<T, ApiError>;
