// =====================================================================================
// AUTH CELL MODELS
// =====================================================================================

use serde::{Deserialize, Serialize};
use thiserror::Error;

use security_cell::{SecurityError, ValidationError};
use shared_database::DatabaseError;
use shared_models::error::AppError;
use shared_utils::jwt::TokenError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Stored account row, enough to check a login.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountCredentials {
    pub id: String,
    pub email: String,
    pub password: String,
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("An account with this email already exists")]
    EmailTaken,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Security(#[from] SecurityError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => AppError::Auth(err.to_string()),
            AuthError::EmailTaken => AppError::Conflict(err.to_string()),
            AuthError::Validation(e) => e.into(),
            AuthError::Token(e) => e.into(),
            AuthError::Security(e) => e.into(),
            AuthError::Database(e) => e.into(),
        }
    }
}
