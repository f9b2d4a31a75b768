pub mod error;
pub mod memory;
pub mod store;
pub mod supabase;

use std::sync::Arc;

use tracing::{info, warn};

use shared_config::AppConfig;

pub use error::DatabaseError;
pub use memory::{MemoryStore, UniqueConstraint};
pub use store::{decode, decode_all, DocumentStore, Filter};
pub use supabase::SupabaseClient;

/// Collection names shared by every cell.
pub mod collections {
    pub const PATIENTS: &str = "patients";
    pub const DOCTORS: &str = "doctors";
    pub const ADMINS: &str = "admins";
    pub const APPOINTMENTS: &str = "appointments";
}

/// Picks the PostgREST backend when it is configured, otherwise an in-memory
/// store that enforces the same unique constraints.
pub fn store_from_config(config: &AppConfig) -> Arc<dyn DocumentStore> {
    if config.is_database_configured() {
        info!("Using PostgREST document store at {}", config.supabase_url);
        Arc::new(SupabaseClient::new(config))
    } else {
        warn!("Database not configured, falling back to in-memory store (data is not persisted)");
        Arc::new(MemoryStore::with_clinic_schema())
    }
}
