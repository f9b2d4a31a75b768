use std::env;
use std::str::FromStr;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_service_key: String,
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
    pub admin_email: String,
    pub admin_password: String,
    pub admin_name: String,
    pub stripe_secret_key: String,
    pub stripe_webhook_secret: String,
    pub stripe_base_url: String,
    pub payment_currency: String,
    pub frontend_url: String,
    pub clinic_utc_offset_minutes: i32,
    pub http_timeout_secs: u64,
    pub port: u16,
}

fn required(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| {
        warn!("{} not set, using empty value", key);
        String::new()
    })
}

fn with_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| {
        warn!("{} not set, using default", key);
        default.to_string()
    })
}

fn parsed<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("{} has an invalid value ({}), using default", key, raw);
            default
        }),
        Err(_) => default,
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            supabase_url: required("SUPABASE_URL"),
            supabase_service_key: required("SUPABASE_SERVICE_KEY"),
            jwt_secret: required("JWT_SECRET"),
            jwt_ttl_hours: parsed("JWT_TTL_HOURS", 24),
            admin_email: required("ADMIN_EMAIL"),
            admin_password: required("ADMIN_PASSWORD"),
            admin_name: with_default("ADMIN_NAME", "Administrator"),
            stripe_secret_key: required("STRIPE_SECRET_KEY"),
            stripe_webhook_secret: required("STRIPE_WEBHOOK_SECRET"),
            stripe_base_url: with_default("STRIPE_BASE_URL", "https://api.stripe.com"),
            payment_currency: with_default("PAYMENT_CURRENCY", "usd"),
            frontend_url: with_default("FRONTEND_URL", "http://localhost:5173"),
            clinic_utc_offset_minutes: parsed("CLINIC_UTC_OFFSET_MINUTES", 0),
            http_timeout_secs: parsed("HTTP_TIMEOUT_SECS", 15),
            port: parsed("PORT", 4000),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.jwt_secret.is_empty()
            && self.is_database_configured()
            && self.is_payment_configured()
    }

    pub fn is_database_configured(&self) -> bool {
        !self.supabase_url.is_empty() && !self.supabase_service_key.is_empty()
    }

    pub fn is_payment_configured(&self) -> bool {
        !self.stripe_secret_key.is_empty() && !self.stripe_base_url.is_empty()
    }

    pub fn is_admin_bootstrap_configured(&self) -> bool {
        !self.admin_email.is_empty() && !self.admin_password.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank() -> AppConfig {
        AppConfig {
            supabase_url: String::new(),
            supabase_service_key: String::new(),
            jwt_secret: "secret".to_string(),
            jwt_ttl_hours: 24,
            admin_email: String::new(),
            admin_password: String::new(),
            admin_name: "Administrator".to_string(),
            stripe_secret_key: String::new(),
            stripe_webhook_secret: String::new(),
            stripe_base_url: "https://api.stripe.com".to_string(),
            payment_currency: "usd".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
            clinic_utc_offset_minutes: 0,
            http_timeout_secs: 15,
            port: 4000,
        }
    }

    #[test]
    fn test_partial_configuration_is_reported() {
        let mut config = blank();
        assert!(!config.is_configured());
        assert!(!config.is_database_configured());

        config.supabase_url = "http://localhost:54321".to_string();
        config.supabase_service_key = "service-key".to_string();
        assert!(config.is_database_configured());
        assert!(!config.is_payment_configured());

        config.stripe_secret_key = "sk_test_123".to_string();
        assert!(config.is_configured());
    }
}
