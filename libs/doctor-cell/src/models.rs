use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use security_cell::{SecurityError, ValidationError};
use shared_database::DatabaseError;
use shared_models::error::AppError;
use shared_models::profile::Address;

// ==============================================================================
// DOCTOR MODELS
// ==============================================================================

/// Doctor account as stored. The password hash is never serialized back out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing)]
    pub password: String,
    #[serde(default)]
    pub image: Option<String>,
    pub speciality: String,
    pub degree: String,
    pub experience: String,
    pub about: String,
    pub available: bool,
    pub fees: f64,
    #[serde(default)]
    pub address: Address,
    pub created_at: DateTime<Utc>,
}

/// What anonymous visitors see in the doctor list.
#[derive(Debug, Clone, Serialize)]
pub struct DoctorListing {
    pub id: String,
    pub name: String,
    pub image: Option<String>,
    pub speciality: String,
    pub degree: String,
    pub experience: String,
    pub about: String,
    pub available: bool,
    pub fees: f64,
    pub address: Address,
}

impl From<Doctor> for DoctorListing {
    fn from(doctor: Doctor) -> Self {
        Self {
            id: doctor.id,
            name: doctor.name,
            image: doctor.image,
            speciality: doctor.speciality,
            degree: doctor.degree,
            experience: doctor.experience,
            about: doctor.about,
            available: doctor.available,
            fees: doctor.fees,
            address: doctor.address,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddDoctorRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub image: Option<String>,
    pub speciality: String,
    pub degree: String,
    pub experience: String,
    pub about: String,
    pub fees: f64,
    pub address: Address,
}

/// Fields a doctor may change on their own profile.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateDoctorProfileRequest {
    pub fees: Option<f64>,
    pub address: Option<Address>,
    pub available: Option<bool>,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Error, Debug)]
pub enum DoctorError {
    #[error("Doctor not found")]
    NotFound,

    #[error("A doctor with this email already exists")]
    EmailTaken,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Security(#[from] SecurityError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<DoctorError> for AppError {
    fn from(err: DoctorError) -> Self {
        match err {
            DoctorError::NotFound => AppError::NotFound(err.to_string()),
            DoctorError::EmailTaken => AppError::Conflict(err.to_string()),
            DoctorError::Validation(e) => e.into(),
            DoctorError::Security(e) => e.into(),
            DoctorError::Database(e) => e.into(),
        }
    }
}
