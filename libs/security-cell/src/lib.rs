// =====================================================================================
// SECURITY CELL - PASSWORD HANDLING & INPUT VALIDATION
// =====================================================================================
//
// Shared by the account-owning cells:
// - argon2 password hashing and verification
// - password policy enforcement
// - server-side validation of names, emails, phones, addresses and profile fields
//
// =====================================================================================

pub mod models;
pub mod services;

pub use models::{SecurityError, ValidationError};
pub use services::{PasswordSecurityService, ValidationService, NOT_SELECTED};
