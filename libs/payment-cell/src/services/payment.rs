// libs/payment-cell/src/services/payment.rs
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use appointment_cell::{
    AppointmentBookingService, AppointmentError, AppointmentLifecycleService, PaymentUpdate,
};
use shared_config::AppConfig;
use shared_models::auth::User;
use shared_utils::AppState;

use crate::models::{
    CheckoutResponse, CheckoutSession, NewCheckoutSession, PaymentError, WebhookEvent,
};
use crate::services::gateway::PaymentGateway;
use crate::services::signature::verify_signature;
use crate::services::stripe::StripeClient;

const CHECKOUT_COMPLETED: &str = "checkout.session.completed";
const ASYNC_PAYMENT_SUCCEEDED: &str = "checkout.session.async_payment_succeeded";

/// Result of processing a gateway event.
#[derive(Debug)]
pub enum WebhookOutcome {
    Reconciled(PaymentUpdate),
    Ignored(String),
}

pub struct PaymentService {
    gateway: Arc<dyn PaymentGateway>,
    config: Arc<AppConfig>,
    bookings: AppointmentBookingService,
    lifecycle: AppointmentLifecycleService,
}

impl PaymentService {
    pub fn new(state: &AppState) -> Result<Self, PaymentError> {
        let gateway = Arc::new(StripeClient::new(&state.config)?);
        Ok(Self::with_gateway(state, gateway))
    }

    pub fn with_gateway(state: &AppState, gateway: Arc<dyn PaymentGateway>) -> Self {
        Self {
            gateway,
            config: state.config.clone(),
            bookings: AppointmentBookingService::new(state),
            lifecycle: AppointmentLifecycleService::new(state),
        }
    }

    /// Opens a hosted checkout for one of the caller's unpaid appointments.
    /// Nothing is written locally; the appointment only changes once the
    /// gateway confirms payment.
    pub async fn create_checkout(
        &self,
        appointment_id: &str,
        patient: &User,
    ) -> Result<CheckoutResponse, PaymentError> {
        let appointment = self.bookings.get_appointment(appointment_id).await?;

        if appointment.user_id != patient.id {
            warn!(
                "Patient {} attempted checkout for appointment {} owned by {}",
                patient.id, appointment_id, appointment.user_id
            );
            return Err(AppointmentError::NotOwner.into());
        }
        if appointment.cancelled {
            return Err(PaymentError::AppointmentCancelled);
        }
        if appointment.payment {
            return Err(PaymentError::AlreadyPaid);
        }

        let doctor_name = appointment
            .doc_data
            .get("name")
            .and_then(|name| name.as_str())
            .unwrap_or("Doctor");
        let frontend = self.config.frontend_url.trim_end_matches('/');

        let request = NewCheckoutSession {
            appointment_id: appointment.id.clone(),
            amount: (appointment.amount * 100.0).round() as i64,
            currency: self.config.payment_currency.to_lowercase(),
            description: format!("Consultation with {}", doctor_name),
            success_url: format!(
                "{}/verify?success=true&appointment_id={}&session_id={{CHECKOUT_SESSION_ID}}",
                frontend, appointment.id
            ),
            cancel_url: format!(
                "{}/verify?success=false&appointment_id={}",
                frontend, appointment.id
            ),
        };

        let session = self.gateway.create_checkout_session(&request).await?;
        let url = session.url.clone().ok_or_else(|| {
            PaymentError::Gateway(format!("session {} has no checkout url", session.id))
        })?;

        info!(
            "Checkout session {} opened for appointment {}",
            session.id, appointment.id
        );

        Ok(CheckoutResponse {
            session_id: session.id,
            url,
        })
    }

    /// Fetches the session from the gateway and applies it.
    pub async fn verify_session(&self, session_id: &str) -> Result<PaymentUpdate, PaymentError> {
        let session = self.gateway.retrieve_session(session_id).await?;
        self.reconcile(&session).await
    }

    /// Verify on behalf of a patient. The payment is still recorded when the
    /// session belongs to someone else, but the appointment is not returned.
    pub async fn verify_session_for(
        &self,
        session_id: &str,
        patient: &User,
    ) -> Result<PaymentUpdate, PaymentError> {
        let update = self.verify_session(session_id).await?;
        if update.appointment.user_id != patient.id {
            warn!(
                "Patient {} verified session {} for appointment {} owned by {}",
                patient.id, session_id, update.appointment.id, update.appointment.user_id
            );
            return Err(AppointmentError::NotOwner.into());
        }
        Ok(update)
    }

    /// Marks the referenced appointment paid when the session is paid.
    /// Safe to repeat: verify, the landing page and webhooks all end up here.
    pub async fn reconcile(&self, session: &CheckoutSession) -> Result<PaymentUpdate, PaymentError> {
        if !session.is_paid() {
            debug!(
                "Session {} not paid yet (status: {})",
                session.id, session.payment_status
            );
            return Err(PaymentError::NotCompleted(session.payment_status.clone()));
        }

        let appointment_id = session
            .appointment_id()
            .ok_or(PaymentError::MissingAppointmentId)?;

        let update = self.lifecycle.mark_paid(appointment_id).await?;
        if update.changed {
            info!(
                "Payment for appointment {} confirmed by session {}",
                appointment_id, session.id
            );
        }
        Ok(update)
    }

    /// Verifies and applies a signed gateway event. Unhandled event types and
    /// sessions that are not yet paid are acknowledged without changes.
    pub async fn handle_webhook(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> Result<WebhookOutcome, PaymentError> {
        if self.config.stripe_webhook_secret.is_empty() {
            return Err(PaymentError::NotConfigured);
        }

        verify_signature(
            payload,
            signature_header,
            &self.config.stripe_webhook_secret,
            Utc::now().timestamp(),
        )?;

        let event: WebhookEvent = serde_json::from_slice(payload)
            .map_err(|e| PaymentError::InvalidPayload(e.to_string()))?;

        debug!("Webhook event {} ({})", event.id, event.event_type);

        if event.event_type != CHECKOUT_COMPLETED && event.event_type != ASYNC_PAYMENT_SUCCEEDED {
            return Ok(WebhookOutcome::Ignored(format!(
                "unhandled event type {}",
                event.event_type
            )));
        }

        let session: CheckoutSession = serde_json::from_value(event.data.object)
            .map_err(|e| PaymentError::InvalidPayload(e.to_string()))?;

        match self.reconcile(&session).await {
            Ok(update) => Ok(WebhookOutcome::Reconciled(update)),
            Err(PaymentError::NotCompleted(status)) => {
                info!(
                    "Session {} completed with payment status {}, awaiting async payment",
                    session.id, status
                );
                Ok(WebhookOutcome::Ignored(format!("payment status {}", status)))
            }
            Err(e) => Err(e),
        }
    }
}
