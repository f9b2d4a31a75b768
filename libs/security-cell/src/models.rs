// =====================================================================================
// SECURITY CELL MODELS
// =====================================================================================

use thiserror::Error;

use shared_models::error::AppError;

/// A rejected input field. The message is safe to show to end users.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::ValidationError(err.message)
    }
}

#[derive(Error, Debug)]
pub enum SecurityError {
    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Stored password hash is malformed")]
    MalformedHash,
}

impl From<SecurityError> for AppError {
    fn from(err: SecurityError) -> Self {
        AppError::Internal(err.to_string())
    }
}
