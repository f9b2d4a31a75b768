use axum::{
    extract::{Extension, Path, State},
    Json,
};
use serde_json::{json, Value};
use tracing::debug;

use shared_models::auth::User;
use shared_models::error::AppError;
use shared_utils::AppState;

use crate::models::{DoctorListing, UpdateDoctorProfileRequest};
use crate::services::{DoctorService, Slot};

// ==============================================================================
// PUBLIC HANDLERS (NO AUTHENTICATION REQUIRED)
// ==============================================================================

#[axum::debug_handler]
pub async fn list_doctors(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let doctors: Vec<DoctorListing> = DoctorService::new(&state)
        .list_doctors()
        .await?
        .into_iter()
        .map(DoctorListing::from)
        .collect();

    Ok(Json(json!({
        "success": true,
        "doctors": doctors
    })))
}

#[axum::debug_handler]
pub async fn doctor_slots(
    State(state): State<AppState>,
    Path(doctor_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let now = state.clinic_now();
    debug!("Computing slots for doctor {} at {}", doctor_id, now);

    let (doctor, booked, days) = DoctorService::new(&state)
        .available_slots(&doctor_id, now)
        .await?;

    let days: Vec<Value> = days
        .into_iter()
        .map(|day| {
            let slot_date = day.slot_date().to_string();
            let slots: Vec<Slot> = day.collect();
            json!({ "slot_date": slot_date, "slots": slots })
        })
        .collect();

    Ok(Json(json!({
        "success": true,
        "doctor_id": doctor.id,
        "available": doctor.available,
        "slots_booked": booked,
        "days": days
    })))
}

// ==============================================================================
// DOCTOR PANEL HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let doctor = DoctorService::new(&state).get_doctor(&user.id).await?;

    Ok(Json(json!({
        "success": true,
        "profile": doctor
    })))
}

#[axum::debug_handler]
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(request): Json<UpdateDoctorProfileRequest>,
) -> Result<Json<Value>, AppError> {
    let doctor = DoctorService::new(&state)
        .update_profile(&user.id, request)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Profile updated",
        "profile": doctor
    })))
}
