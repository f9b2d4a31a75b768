use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

/// Deny-list of logged-out token ids. Entries are only kept until the token
/// would have expired anyway.
#[derive(Debug, Default)]
pub struct RevokedTokens {
    entries: RwLock<HashMap<String, DateTime<Utc>>>,
}

impl RevokedTokens {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn revoke(&self, token_id: &str, expires_at: DateTime<Utc>) {
        let now = Utc::now();
        let mut entries = self.entries.write().await;

        entries.retain(|_, exp| *exp > now);
        if expires_at > now {
            entries.insert(token_id.to_string(), expires_at);
        }

        debug!("Revoked token {} ({} active revocations)", token_id, entries.len());
    }

    pub async fn is_revoked(&self, token_id: &str) -> bool {
        self.entries.read().await.contains_key(token_id)
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[tokio::test]
    async fn test_revoked_token_is_reported() {
        let revoked = RevokedTokens::new();
        revoked.revoke("jti-1", Utc::now() + Duration::hours(1)).await;

        assert!(revoked.is_revoked("jti-1").await);
        assert!(!revoked.is_revoked("jti-2").await);
    }

    #[tokio::test]
    async fn test_expired_entries_are_pruned() {
        let revoked = RevokedTokens::new();
        revoked.revoke("stale", Utc::now() - Duration::minutes(1)).await;
        revoked.revoke("live", Utc::now() + Duration::hours(1)).await;

        assert!(!revoked.is_revoked("stale").await);
        assert_eq!(revoked.len().await, 1);
    }
}
