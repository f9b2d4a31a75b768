use std::sync::Arc;

use chrono::{FixedOffset, NaiveDateTime, Offset, Utc};
use tracing::warn;

use shared_config::AppConfig;
use shared_database::{store_from_config, DocumentStore};

use crate::revocation::RevokedTokens;

/// Shared request state: configuration, the document store and the token
/// deny-list. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn DocumentStore>,
    pub revoked_tokens: Arc<RevokedTokens>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
            revoked_tokens: Arc::new(RevokedTokens::new()),
        }
    }

    pub fn from_config(config: AppConfig) -> Self {
        let store = store_from_config(&config);
        Self::new(config, store)
    }

    pub fn clinic_offset(&self) -> FixedOffset {
        let seconds = self.config.clinic_utc_offset_minutes * 60;
        FixedOffset::east_opt(seconds).unwrap_or_else(|| {
            warn!(
                "CLINIC_UTC_OFFSET_MINUTES={} is out of range, using UTC",
                self.config.clinic_utc_offset_minutes
            );
            Utc.fix()
        })
    }

    /// Wall-clock time at the clinic, which is what slot times refer to.
    pub fn clinic_now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.clinic_offset()).naive_local()
    }
}
