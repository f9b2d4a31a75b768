// libs/admin-cell/src/handlers.rs
use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::info;

use doctor_cell::{AddDoctorRequest, DoctorService};
use shared_models::auth::User;
use shared_models::error::AppError;
use shared_utils::AppState;

#[axum::debug_handler]
pub async fn add_doctor(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(request): Json<AddDoctorRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let doctor = DoctorService::new(&state).add_doctor(request).await?;
    info!("Admin {} added doctor {}", user.id, doctor.id);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Doctor added",
            "doctor": doctor
        })),
    ))
}

/// Full records including email and availability; passwords never serialize.
#[axum::debug_handler]
pub async fn list_doctors(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let doctors = DoctorService::new(&state).list_doctors().await?;

    Ok(Json(json!({
        "success": true,
        "doctors": doctors
    })))
}

#[axum::debug_handler]
pub async fn toggle_availability(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(doctor_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let doctor = DoctorService::new(&state)
        .toggle_availability(&doctor_id)
        .await?;
    info!(
        "Admin {} set doctor {} availability to {}",
        user.id, doctor.id, doctor.available
    );

    Ok(Json(json!({
        "success": true,
        "message": "Availability changed",
        "doctor": doctor
    })))
}
