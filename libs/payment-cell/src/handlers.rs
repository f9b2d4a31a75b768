// libs/payment-cell/src/handlers.rs
use axum::{
    body::Bytes,
    extract::{Extension, Query, State},
    http::HeaderMap,
    Json,
};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use shared_models::auth::User;
use shared_models::error::AppError;
use shared_utils::AppState;

use crate::models::{CheckoutRequest, LandingQuery, PaymentError, VerifyRequest};
use crate::services::{PaymentService, WebhookOutcome};

pub const SIGNATURE_HEADER: &str = "Stripe-Signature";

#[axum::debug_handler]
pub async fn create_checkout(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(request): Json<CheckoutRequest>,
) -> Result<Json<Value>, AppError> {
    let checkout = PaymentService::new(&state)?
        .create_checkout(&request.appointment_id, &user)
        .await?;

    Ok(Json(json!({
        "success": true,
        "session_id": checkout.session_id,
        "session_url": checkout.url
    })))
}

#[axum::debug_handler]
pub async fn verify_payment(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(request): Json<VerifyRequest>,
) -> Result<Json<Value>, AppError> {
    info!("Patient {} verifying session {}", user.id, request.session_id);

    let update = PaymentService::new(&state)?
        .verify_session_for(&request.session_id, &user)
        .await?;

    let message = if update.changed {
        "Payment successful"
    } else {
        "Payment already recorded"
    };

    Ok(Json(json!({
        "success": true,
        "message": message,
        "appointment": update.appointment
    })))
}

/// Takes the raw body; the signature covers the exact bytes sent.
#[axum::debug_handler]
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| PaymentError::InvalidSignature("missing signature header".to_string()))?;

    let outcome = PaymentService::new(&state)?
        .handle_webhook(&body, signature)
        .await
        .inspect_err(|e| warn!("Webhook rejected: {}", e))?;

    if let WebhookOutcome::Ignored(reason) = &outcome {
        info!("Webhook acknowledged without changes: {}", reason);
    }

    Ok(Json(json!({ "received": true })))
}

/// Return landing page. Reconciles when the gateway appended the session id.
/// Unauthenticated, so the appointment itself is not echoed back.
#[axum::debug_handler]
pub async fn payment_success(
    State(state): State<AppState>,
    Query(query): Query<LandingQuery>,
) -> Result<Json<Value>, AppError> {
    let Some(session_id) = query.session_id.filter(|id| !id.is_empty()) else {
        return Ok(Json(json!({
            "success": true,
            "message": "Payment submitted, confirmation pending"
        })));
    };

    let update = PaymentService::new(&state)?
        .verify_session(&session_id)
        .await?;
    debug!(
        "Landing page reconciled session {} (changed: {})",
        session_id, update.changed
    );

    Ok(Json(json!({
        "success": true,
        "message": "Payment successful"
    })))
}

#[axum::debug_handler]
pub async fn payment_cancel() -> Json<Value> {
    Json(json!({
        "success": false,
        "message": "Payment cancelled"
    }))
}
