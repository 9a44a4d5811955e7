use thiserror::Error;

#[derive(Error, Debug)]
pub enum BalanceError {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Insufficient players: need at least 2 to form two teams, found {found}")]
    InsufficientPlayers { found: usize },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Schema version mismatch: found {found}, expected {expected}")]
    SchemaVersionMismatch { found: u8, expected: u8 },
}

impl From<serde_json::Error> for BalanceError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() {
            BalanceError::Deserialization(err.to_string())
        } else {
            BalanceError::Serialization(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, BalanceError>;
