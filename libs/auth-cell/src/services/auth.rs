use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use security_cell::{PasswordSecurityService, ValidationService};
use shared_config::AppConfig;
use shared_database::{collections, decode, DatabaseError, DocumentStore, Filter};
use shared_models::auth::{Role, User};
use shared_utils::jwt::{issue_token, IssuedToken};
use shared_utils::revocation::RevokedTokens;
use shared_utils::AppState;

use crate::models::{AccountCredentials, AuthError, RegisterRequest};

pub struct AuthService {
    config: Arc<AppConfig>,
    store: Arc<dyn DocumentStore>,
    revoked_tokens: Arc<RevokedTokens>,
}

impl AuthService {
    pub fn new(state: &AppState) -> Self {
        Self {
            config: state.config.clone(),
            store: state.store.clone(),
            revoked_tokens: state.revoked_tokens.clone(),
        }
    }

    /// Creates a patient account and signs the caller in.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register_patient(&self, request: RegisterRequest) -> Result<IssuedToken, AuthError> {
        let validator = ValidationService::new();
        let name = request.name.trim();
        validator.validate_name(name)?;
        let email = validator.validate_email(request.email.trim())?;
        PasswordSecurityService::validate_password_policy(&request.password)?;

        let existing = self
            .store
            .find(collections::PATIENTS, &[Filter::eq("email", email.as_str())])
            .await?;
        if !existing.is_empty() {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = PasswordSecurityService::hash_password(&request.password)?;
        let patient = json!({
            "id": Uuid::new_v4().to_string(),
            "name": name,
            "email": email,
            "password": password_hash,
            "image": null,
            "phone": "",
            "address": { "line1": "", "line2": "" },
            "gender": "Not Selected",
            "dob": "Not Selected",
            "created_at": Utc::now().to_rfc3339(),
        });

        // The unique index still has the final word if two registrations race.
        let stored = match self.store.insert(collections::PATIENTS, patient).await {
            Ok(doc) => doc,
            Err(DatabaseError::Conflict(_)) => return Err(AuthError::EmailTaken),
            Err(e) => return Err(e.into()),
        };
        let account: AccountCredentials = decode(stored)?;

        info!("Registered patient {}", account.id);
        self.issue(&account, Role::Patient)
    }

    /// Unknown email and wrong password are indistinguishable to the caller.
    #[instrument(skip(self, password))]
    pub async fn login(&self, role: Role, email: &str, password: &str) -> Result<IssuedToken, AuthError> {
        let email = email.trim().to_lowercase();

        let account = self
            .store
            .find(role.collection(), &[Filter::eq("email", email.as_str())])
            .await?
            .into_iter()
            .next();

        let Some(account) = account else {
            debug!("No {} account for login attempt", role);
            return Err(AuthError::InvalidCredentials);
        };
        let account: AccountCredentials = decode(account)?;

        if !PasswordSecurityService::verify_password(password, &account.password)? {
            warn!("Failed {} login for account {}", role, account.id);
            return Err(AuthError::InvalidCredentials);
        }

        info!("{} {} signed in", role, account.id);
        self.issue(&account, role)
    }

    pub async fn logout(&self, user: &User) {
        self.revoked_tokens.revoke(&user.token_id, user.expires_at).await;
        info!("{} {} signed out", user.role, user.id);
    }

    /// Creates the admin account from configuration if it does not exist yet.
    /// Returns whether an account was created.
    pub async fn seed_admin(&self) -> Result<bool, AuthError> {
        if !self.config.is_admin_bootstrap_configured() {
            warn!("ADMIN_EMAIL/ADMIN_PASSWORD not set, skipping admin bootstrap");
            return Ok(false);
        }

        let email = self.config.admin_email.trim().to_lowercase();
        let existing = self
            .store
            .find(collections::ADMINS, &[Filter::eq("email", email.as_str())])
            .await?;
        if !existing.is_empty() {
            debug!("Admin account already present");
            return Ok(false);
        }

        let admin = json!({
            "id": Uuid::new_v4().to_string(),
            "name": self.config.admin_name,
            "email": email,
            "password": PasswordSecurityService::hash_password(&self.config.admin_password)?,
            "created_at": Utc::now().to_rfc3339(),
        });

        match self.store.insert(collections::ADMINS, admin).await {
            Ok(_) => {
                info!("Seeded admin account {}", email);
                Ok(true)
            }
            // Another instance seeded it first.
            Err(DatabaseError::Conflict(_)) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn issue(&self, account: &AccountCredentials, role: Role) -> Result<IssuedToken, AuthError> {
        let token = issue_token(
            &account.id,
            &account.email,
            role,
            &self.config.jwt_secret,
            self.config.jwt_ttl_hours,
        )?;
        Ok(token)
    }
}
