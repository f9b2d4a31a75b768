// libs/appointment-cell/src/handlers.rs
use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use shared_models::auth::User;
use shared_models::error::AppError;
use shared_utils::AppState;

use crate::models::BookAppointmentRequest;
use crate::services::{AppointmentBookingService, AppointmentLifecycleService, DashboardService};

// ==============================================================================
// PATIENT HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let appointment = AppointmentBookingService::new(&state)
        .book_appointment(&user.id, request)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Appointment booked",
            "appointment": appointment
        })),
    ))
}

#[axum::debug_handler]
pub async fn list_patient_appointments(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let appointments = AppointmentBookingService::new(&state)
        .patient_appointments(&user.id)
        .await?;

    Ok(Json(json!({
        "success": true,
        "appointments": appointments
    })))
}

// ==============================================================================
// SHARED HANDLERS
// ==============================================================================

/// Ownership is checked against the caller's role.
#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(appointment_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let appointment = AppointmentLifecycleService::new(&state)
        .cancel_appointment(&appointment_id, &user)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Appointment cancelled",
        "appointment": appointment
    })))
}

// ==============================================================================
// DOCTOR HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_doctor_appointments(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let appointments = AppointmentBookingService::new(&state)
        .doctor_appointments(&user.id)
        .await?;

    Ok(Json(json!({
        "success": true,
        "appointments": appointments
    })))
}

#[axum::debug_handler]
pub async fn complete_appointment(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(appointment_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let appointment = AppointmentLifecycleService::new(&state)
        .complete_appointment(&appointment_id, &user)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Appointment completed",
        "appointment": appointment
    })))
}

#[axum::debug_handler]
pub async fn doctor_dashboard(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let dashboard = DashboardService::new(&state).doctor_dashboard(&user.id).await?;

    Ok(Json(json!({
        "success": true,
        "dashboard": dashboard
    })))
}

// ==============================================================================
// ADMIN HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_all_appointments(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let appointments = AppointmentBookingService::new(&state).all_appointments().await?;

    Ok(Json(json!({
        "success": true,
        "appointments": appointments
    })))
}

#[axum::debug_handler]
pub async fn admin_dashboard(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let dashboard = DashboardService::new(&state).admin_dashboard().await?;

    Ok(Json(json!({
        "success": true,
        "dashboard": dashboard
    })))
}
