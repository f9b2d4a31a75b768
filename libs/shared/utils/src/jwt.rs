use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use shared_models::auth::{JwtClaims, Role, User};
use shared_models::error::AppError;

#[derive(Error, Debug, PartialEq)]
pub enum TokenError {
    #[error("JWT secret is not set")]
    MissingSecret,

    #[error("Token expired")]
    Expired,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Invalid token format")]
    Malformed,

    #[error("Failed to sign token: {0}")]
    Signing(String),
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::MissingSecret | TokenError::Signing(_) => AppError::Internal(err.to_string()),
            other => AppError::Auth(other.to_string()),
        }
    }
}

/// A freshly signed bearer token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub token_id: String,
    pub expires_at: DateTime<Utc>,
}

pub fn sign_claims(claims: &JwtClaims, jwt_secret: &str) -> Result<String, TokenError> {
    if jwt_secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }

    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .map_err(|e| TokenError::Signing(e.to_string()))
}

pub fn issue_token(
    account_id: &str,
    email: &str,
    role: Role,
    jwt_secret: &str,
    ttl_hours: i64,
) -> Result<IssuedToken, TokenError> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(ttl_hours);

    let claims = JwtClaims {
        sub: account_id.to_string(),
        role,
        email: email.to_string(),
        iat: now.timestamp(),
        exp: expires_at.timestamp(),
        jti: Uuid::new_v4().to_string(),
    };

    let token = sign_claims(&claims, jwt_secret)?;
    debug!("Issued {} token for account {}", role, account_id);

    Ok(IssuedToken {
        token,
        token_id: claims.jti,
        expires_at,
    })
}

pub fn validate_token(token: &str, jwt_secret: &str) -> Result<User, TokenError> {
    if jwt_secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }

    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    let data = decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        debug!("Token rejected: {}", e);
        match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            _ => TokenError::Malformed,
        }
    })?;

    let claims = data.claims;
    let expires_at = Utc
        .timestamp_opt(claims.exp, 0)
        .single()
        .ok_or(TokenError::Malformed)?;

    let user = User {
        id: claims.sub,
        email: claims.email,
        role: claims.role,
        token_id: claims.jti,
        expires_at,
    };

    debug!("Token validated successfully for user: {}", user.id);
    Ok(user)
}
