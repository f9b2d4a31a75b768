// =====================================================================================
// PASSWORD SECURITY SERVICE - SECURE PASSWORD HANDLING
// =====================================================================================

use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use tracing::{debug, instrument};

use crate::models::{SecurityError, ValidationError};

const SPECIAL_CHARACTERS: &str = "@$#!%*?&";
const MIN_PASSWORD_LENGTH: usize = 8;

pub struct PasswordSecurityService;

impl PasswordSecurityService {
    #[instrument(skip(password))]
    pub fn hash_password(password: &str) -> Result<String, SecurityError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        let password_hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| SecurityError::Hashing(e.to_string()))?;
        Ok(password_hash.to_string())
    }

    #[instrument(skip(password, hash))]
    pub fn verify_password(password: &str, hash: &str) -> Result<bool, SecurityError> {
        let parsed_hash = PasswordHash::new(hash).map_err(|_| SecurityError::MalformedHash)?;
        let argon2 = Argon2::default();

        match argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => {
                debug!("Password verification failed unexpectedly: {}", e);
                Err(SecurityError::MalformedHash)
            }
        }
    }

    /// At least 8 characters drawn from letters, digits and `@$#!%*?&`, with
    /// at least one of each class.
    pub fn validate_password_policy(password: &str) -> Result<(), ValidationError> {
        let reject = |message: &str| Err(ValidationError::new("password", message));

        if password.chars().any(char::is_whitespace) {
            return reject("Password cannot contain spaces");
        }
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return reject("Password must be at least 8 characters long");
        }
        if !password.chars().any(|c| c.is_ascii_lowercase()) {
            return reject("Password must contain a lowercase letter");
        }
        if !password.chars().any(|c| c.is_ascii_uppercase()) {
            return reject("Password must contain an uppercase letter");
        }
        if !password.chars().any(|c| c.is_ascii_digit()) {
            return reject("Password must contain a number");
        }
        if !password.chars().any(|c| SPECIAL_CHARACTERS.contains(c)) {
            return reject("Password must contain one of @$#!%*?&");
        }
        if !password
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || SPECIAL_CHARACTERS.contains(c))
        {
            return reject("Password may only contain letters, numbers and @$#!%*?&");
        }

        Ok(())
    }
}
