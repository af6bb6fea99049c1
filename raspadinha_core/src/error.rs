use thiserror::Error;

/// The only failure a round can produce. It always points at bad
/// configuration data, so callers surface it to the operator instead of
/// retrying.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GameError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl GameError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        GameError::InvalidConfiguration(reason.into())
    }
}

pub type GameResult<T> = Result<T, GameError>;
