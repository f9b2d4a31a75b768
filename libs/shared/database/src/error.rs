use thiserror::Error;

use shared_models::error::AppError;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Unique constraint violated: {0}")]
    Conflict(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid document: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for DatabaseError {
    fn from(err: reqwest::Error) -> Self {
        DatabaseError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for DatabaseError {
    fn from(err: serde_json::Error) -> Self {
        DatabaseError::Decode(err.to_string())
    }
}

impl From<DatabaseError> for AppError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::Conflict(msg) => AppError::Conflict(msg),
            DatabaseError::NotFound(msg) => AppError::NotFound(msg),
            other => AppError::Database(other.to_string()),
        }
    }
}
