use axum::{
    extract::{Extension, State},
    Json,
};
use serde_json::{json, Value};

use shared_models::auth::User;
use shared_models::error::AppError;
use shared_utils::AppState;

use crate::models::UpdatePatientProfileRequest;
use crate::services::PatientService;

#[axum::debug_handler]
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let patient = PatientService::new(&state).get_patient(&user.id).await?;

    Ok(Json(json!({
        "success": true,
        "profile": patient
    })))
}

#[axum::debug_handler]
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(request): Json<UpdatePatientProfileRequest>,
) -> Result<Json<Value>, AppError> {
    let today = state.clinic_now().date();
    let patient = PatientService::new(&state)
        .update_profile(&user.id, request, today)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Profile updated",
        "profile": patient
    })))
}
