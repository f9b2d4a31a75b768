// libs/payment-cell/src/models.rs
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use appointment_cell::AppointmentError;
use shared_models::error::AppError;

// ==============================================================================
// GATEWAY MODELS
// ==============================================================================

/// Checkout session as reported by the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
    /// `paid`, `unpaid` or `no_payment_required`.
    pub payment_status: String,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl CheckoutSession {
    pub fn is_paid(&self) -> bool {
        self.payment_status == "paid"
    }

    pub fn appointment_id(&self) -> Option<&str> {
        self.metadata
            .get("appointment_id")
            .map(String::as_str)
            .filter(|id| !id.is_empty())
    }
}

/// What we ask the gateway to charge for.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCheckoutSession {
    pub appointment_id: String,
    /// Minor currency units.
    pub amount: i64,
    pub currency: String,
    pub description: String,
    pub success_url: String,
    pub cancel_url: String,
}

/// Gateway event envelope. Only checkout session events carry a session in
/// `data.object`.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: WebhookEventData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEventData {
    pub object: Value,
}

// ==============================================================================
// REQUEST / RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutRequest {
    #[serde(alias = "appointmentId")]
    pub appointment_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerifyRequest {
    #[serde(alias = "sessionId")]
    pub session_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LandingQuery {
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckoutResponse {
    pub session_id: String,
    pub url: String,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("Payment gateway is not configured")]
    NotConfigured,

    #[error("Payment gateway error: {0}")]
    Gateway(String),

    #[error("Checkout session not found")]
    SessionNotFound,

    #[error("Checkout session carries no appointment reference")]
    MissingAppointmentId,

    #[error("Payment not completed (status: {0})")]
    NotCompleted(String),

    #[error("Appointment is cancelled")]
    AppointmentCancelled,

    #[error("Appointment already paid")]
    AlreadyPaid,

    #[error("Invalid webhook signature: {0}")]
    InvalidSignature(String),

    #[error("Invalid webhook payload: {0}")]
    InvalidPayload(String),

    #[error(transparent)]
    Appointment(#[from] AppointmentError),
}

impl From<reqwest::Error> for PaymentError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            PaymentError::Gateway("request timed out".to_string())
        } else {
            PaymentError::Gateway(err.to_string())
        }
    }
}

impl From<PaymentError> for AppError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::NotConfigured
            | PaymentError::Gateway(_)
            | PaymentError::MissingAppointmentId => AppError::ExternalService(err.to_string()),
            PaymentError::SessionNotFound => AppError::NotFound(err.to_string()),
            PaymentError::NotCompleted(_) => AppError::PaymentNotCompleted(err.to_string()),
            PaymentError::AppointmentCancelled | PaymentError::AlreadyPaid => {
                AppError::Conflict(err.to_string())
            }
            PaymentError::InvalidSignature(_) | PaymentError::InvalidPayload(_) => {
                AppError::BadRequest(err.to_string())
            }
            PaymentError::Appointment(e) => e.into(),
        }
    }
}
