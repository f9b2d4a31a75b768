use std::sync::Arc;

use base64::{engine::general_purpose, Engine as _};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::MemoryStore;
use shared_models::auth::{JwtClaims, Role, User};

use crate::jwt::sign_claims;
use crate::state::AppState;

pub struct TestConfig {
    pub jwt_secret: String,
    pub supabase_url: String,
    pub supabase_service_key: String,
    pub stripe_base_url: String,
    pub stripe_secret_key: String,
    pub stripe_webhook_secret: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            supabase_url: String::new(),
            supabase_service_key: String::new(),
            stripe_base_url: "http://localhost:12111".to_string(),
            stripe_secret_key: "sk_test_123".to_string(),
            stripe_webhook_secret: "whsec_test_secret".to_string(),
        }
    }
}

impl TestConfig {
    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_service_key: self.supabase_service_key.clone(),
            jwt_secret: self.jwt_secret.clone(),
            jwt_ttl_hours: 24,
            admin_email: "admin@clinic.test".to_string(),
            admin_password: "Admin@1234".to_string(),
            admin_name: "Administrator".to_string(),
            stripe_secret_key: self.stripe_secret_key.clone(),
            stripe_webhook_secret: self.stripe_webhook_secret.clone(),
            stripe_base_url: self.stripe_base_url.clone(),
            payment_currency: "usd".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
            clinic_utc_offset_minutes: 0,
            http_timeout_secs: 5,
            port: 4000,
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }

    /// State backed by a fresh in-memory store with the clinic constraints.
    pub fn to_state(&self) -> AppState {
        AppState::new(
            self.to_app_config(),
            Arc::new(MemoryStore::with_clinic_schema()),
        )
    }
}

pub struct TestUser {
    pub id: String,
    pub email: String,
    pub role: Role,
}

impl Default for TestUser {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: "test@example.com".to_string(),
            role: Role::Patient,
        }
    }
}

impl TestUser {
    pub fn new(email: &str, role: Role) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            role,
        }
    }

    pub fn with_id(id: &str, email: &str, role: Role) -> Self {
        Self {
            id: id.to_string(),
            email: email.to_string(),
            role,
        }
    }

    pub fn doctor(email: &str) -> Self {
        Self::new(email, Role::Doctor)
    }

    pub fn patient(email: &str) -> Self {
        Self::new(email, Role::Patient)
    }

    pub fn admin(email: &str) -> Self {
        Self::new(email, Role::Admin)
    }

    pub fn to_user(&self) -> User {
        User {
            id: self.id.clone(),
            email: self.email.clone(),
            role: self.role,
            token_id: Uuid::new_v4().to_string(),
            expires_at: Utc::now() + Duration::hours(1),
        }
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(user: &TestUser, secret: &str, exp_hours: Option<i64>) -> String {
        let now = Utc::now();
        let exp = now + Duration::hours(exp_hours.unwrap_or(24));

        let claims = JwtClaims {
            sub: user.id.clone(),
            role: user.role,
            email: user.email.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        sign_claims(&claims, secret).expect("test secret is never empty")
    }

    pub fn create_expired_token(user: &TestUser, secret: &str) -> String {
        Self::create_test_token(user, secret, Some(-1))
    }

    pub fn create_invalid_signature_token(user: &TestUser) -> String {
        Self::create_test_token(user, "wrong-secret", Some(24))
    }

    /// Valid signature over the original claims, with the payload swapped for
    /// one claiming the admin role.
    pub fn create_tampered_token(user: &TestUser, secret: &str) -> String {
        let token = Self::create_test_token(user, secret, Some(24));
        let parts: Vec<&str> = token.split('.').collect();

        let forged = json!({
            "sub": user.id,
            "role": "admin",
            "email": user.email,
            "iat": Utc::now().timestamp(),
            "exp": (Utc::now() + Duration::hours(24)).timestamp(),
            "jti": Uuid::new_v4().to_string(),
        });
        let forged_payload = general_purpose::URL_SAFE_NO_PAD.encode(forged.to_string());

        format!("{}.{}.{}", parts[0], forged_payload, parts[2])
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }
}

/// Store documents in the shape the cells persist them.
pub struct Fixtures;

impl Fixtures {
    pub fn doctor_document(id: &str, name: &str, fees: f64) -> Value {
        json!({
            "id": id,
            "name": name,
            "email": format!("{}@clinic.test", id),
            "password": "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHQ$aGFzaA",
            "image": null,
            "speciality": "General physician",
            "degree": "MBBS",
            "experience": "4 Years",
            "about": "Committed to preventive care.",
            "available": true,
            "fees": fees,
            "address": { "line1": "17th Cross, Richmond", "line2": "Circle, Ring Road" },
            "created_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn patient_document(id: &str, name: &str) -> Value {
        json!({
            "id": id,
            "name": name,
            "email": format!("{}@example.com", id),
            "password": "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHQ$aGFzaA",
            "image": null,
            "phone": "9876543210",
            "address": { "line1": "", "line2": "" },
            "gender": "Not Selected",
            "dob": "Not Selected",
            "created_at": "2024-01-01T00:00:00Z"
        })
    }

    /// Unpaid, active appointment without snapshots filled in.
    pub fn appointment_document(
        id: &str,
        user_id: &str,
        doc_id: &str,
        slot_date: &str,
        slot_time: &str,
        amount: f64,
    ) -> Value {
        json!({
            "id": id,
            "user_id": user_id,
            "doc_id": doc_id,
            "slot_date": slot_date,
            "slot_time": slot_time,
            "user_data": {},
            "doc_data": {},
            "amount": amount,
            "date": Utc::now().to_rfc3339(),
            "cancelled": false,
            "payment": false,
            "is_completed": false
        })
    }
}
