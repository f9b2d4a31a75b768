use axum::{
    extract::{Extension, Json, State},
    http::StatusCode,
};
use serde_json::{json, Value};
use tracing::debug;

use shared_models::auth::{LoginRequest, Role, TokenResponse, User};
use shared_models::error::AppError;
use shared_utils::jwt::IssuedToken;
use shared_utils::AppState;

use crate::models::RegisterRequest;
use crate::services::AuthService;

fn token_response(issued: IssuedToken, role: Role) -> Json<TokenResponse> {
    Json(TokenResponse {
        success: true,
        token: issued.token,
        role,
        expires_at: issued.expires_at,
    })
}

async fn login_as(state: &AppState, role: Role, request: LoginRequest) -> Result<Json<TokenResponse>, AppError> {
    debug!("Login attempt on the {} panel", role);

    let issued = AuthService::new(state)
        .login(role, &request.email, &request.password)
        .await?;

    Ok(token_response(issued, role))
}

#[axum::debug_handler]
pub async fn register_patient(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<TokenResponse>), AppError> {
    let issued = AuthService::new(&state).register_patient(request).await?;
    Ok((StatusCode::CREATED, token_response(issued, Role::Patient)))
}

#[axum::debug_handler]
pub async fn patient_login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    login_as(&state, Role::Patient, request).await
}

#[axum::debug_handler]
pub async fn doctor_login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    login_as(&state, Role::Doctor, request).await
}

#[axum::debug_handler]
pub async fn admin_login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    login_as(&state, Role::Admin, request).await
}

#[axum::debug_handler]
pub async fn logout(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    AuthService::new(&state).logout(&user).await;

    Ok(Json(json!({
        "success": true,
        "message": "Logged out"
    })))
}
