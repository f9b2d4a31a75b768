use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use security_cell::{ValidationError, NOT_SELECTED};
use shared_database::DatabaseError;
use shared_models::error::AppError;
use shared_models::profile::Address;

/// Patient account as stored. The password hash is never serialized back out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing)]
    pub password: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: Address,
    #[serde(default = "not_selected")]
    pub gender: String,
    #[serde(default = "not_selected")]
    pub dob: String,
    pub created_at: DateTime<Utc>,
}

fn not_selected() -> String {
    NOT_SELECTED.to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePatientProfileRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<Address>,
    pub gender: Option<String>,
    pub dob: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum PatientError {
    #[error("Patient not found")]
    NotFound,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<PatientError> for AppError {
    fn from(err: PatientError) -> Self {
        match err {
            PatientError::NotFound => AppError::NotFound(err.to_string()),
            PatientError::Validation(e) => e.into(),
            PatientError::Database(e) => e.into(),
        }
    }
}
