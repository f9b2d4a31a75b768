// libs/appointment-cell/src/models.rs
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use doctor_cell::services::SlotError;
use doctor_cell::DoctorError;
use patient_cell::PatientError;
use shared_database::DatabaseError;
use shared_models::error::AppError;

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

/// Appointment record. Never physically deleted; `cancelled` frees the slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    pub user_id: String,
    pub doc_id: String,
    pub slot_date: String,
    pub slot_time: String,
    /// Patient profile at booking time.
    #[serde(default)]
    pub user_data: Value,
    /// Doctor profile at booking time, without credentials.
    #[serde(default)]
    pub doc_data: Value,
    pub amount: f64,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub cancelled: bool,
    #[serde(default)]
    pub payment: bool,
    #[serde(default)]
    pub is_completed: bool,
}

impl Appointment {
    pub fn status(&self) -> AppointmentStatus {
        if self.cancelled {
            AppointmentStatus::Cancelled
        } else if self.is_completed {
            AppointmentStatus::Completed
        } else if self.payment {
            AppointmentStatus::Paid
        } else {
            AppointmentStatus::Pending
        }
    }
}

/// Derived from the stored flags, not persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    Paid,
    Completed,
    Cancelled,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "pending"),
            AppointmentStatus::Paid => write!(f, "paid"),
            AppointmentStatus::Completed => write!(f, "completed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentAction {
    Cancel,
    Complete,
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct BookAppointmentRequest {
    #[serde(alias = "docId")]
    pub doc_id: String,
    #[serde(alias = "slotDate")]
    pub slot_date: String,
    #[serde(alias = "slotTime")]
    pub slot_time: String,
}

// ==============================================================================
// DASHBOARD MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct DoctorDashboard {
    pub earnings: f64,
    pub appointments: usize,
    pub patients: usize,
    pub latest_appointments: Vec<Appointment>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminDashboard {
    pub doctors: usize,
    pub appointments: usize,
    pub patients: usize,
    pub latest_appointments: Vec<Appointment>,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Doctor not available")]
    DoctorNotAvailable,

    #[error("Slot not available")]
    SlotNotAvailable,

    #[error("Appointment already cancelled")]
    AlreadyCancelled,

    #[error("Appointment already completed")]
    AlreadyCompleted,

    #[error("Paid appointments cannot be cancelled")]
    PaidCannotBeCancelled,

    #[error("Unauthorized action")]
    NotOwner,

    #[error(transparent)]
    InvalidSlot(#[from] SlotError),

    #[error(transparent)]
    Doctor(#[from] DoctorError),

    #[error(transparent)]
    Patient(#[from] PatientError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        match err {
            AppointmentError::NotFound => AppError::NotFound(err.to_string()),
            AppointmentError::DoctorNotAvailable
            | AppointmentError::SlotNotAvailable
            | AppointmentError::AlreadyCancelled
            | AppointmentError::AlreadyCompleted
            | AppointmentError::PaidCannotBeCancelled => AppError::Conflict(err.to_string()),
            AppointmentError::NotOwner => AppError::Forbidden(err.to_string()),
            AppointmentError::InvalidSlot(e) => e.into(),
            AppointmentError::Doctor(e) => e.into(),
            AppointmentError::Patient(e) => e.into(),
            AppointmentError::Database(e) => e.into(),
        }
    }
}
