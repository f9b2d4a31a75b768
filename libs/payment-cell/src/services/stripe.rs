// libs/payment-cell/src/services/stripe.rs
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use tracing::{debug, error, info};

use shared_config::AppConfig;

use crate::models::{CheckoutSession, NewCheckoutSession, PaymentError};
use crate::services::gateway::PaymentGateway;

/// Stripe Checkout API client.
/// Sessions: https://docs.stripe.com/api/checkout/sessions
pub struct StripeClient {
    client: Client,
    secret_key: String,
    base_url: String,
}

impl StripeClient {
    pub fn new(config: &AppConfig) -> Result<Self, PaymentError> {
        if !config.is_payment_configured() {
            return Err(PaymentError::NotConfigured);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            secret_key: config.stripe_secret_key.clone(),
            base_url: config.stripe_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Form fields in Stripe's bracketed encoding.
    fn checkout_form(request: &NewCheckoutSession) -> Vec<(&'static str, String)> {
        vec![
            ("mode", "payment".to_string()),
            ("payment_method_types[0]", "card".to_string()),
            ("line_items[0][price_data][currency]", request.currency.clone()),
            (
                "line_items[0][price_data][product_data][name]",
                request.description.clone(),
            ),
            ("line_items[0][price_data][unit_amount]", request.amount.to_string()),
            ("line_items[0][quantity]", "1".to_string()),
            ("metadata[appointment_id]", request.appointment_id.clone()),
            ("success_url", request.success_url.clone()),
            ("cancel_url", request.cancel_url.clone()),
        ]
    }

    async fn read_session(response: Response, operation: &str) -> Result<CheckoutSession, PaymentError> {
        let status = response.status();
        let response_text = response.text().await?;

        debug!("Stripe {} response: {}", operation, status);

        if status == StatusCode::NOT_FOUND {
            return Err(PaymentError::SessionNotFound);
        }
        if !status.is_success() {
            error!("Stripe {} failed: {} - {}", operation, status, response_text);
            return Err(PaymentError::Gateway(format!("HTTP {}", status)));
        }

        serde_json::from_str(&response_text).map_err(|e| {
            PaymentError::Gateway(format!("Failed to parse checkout session: {}", e))
        })
    }
}

#[async_trait]
impl PaymentGateway for StripeClient {
    /// POST /v1/checkout/sessions
    async fn create_checkout_session(
        &self,
        request: &NewCheckoutSession,
    ) -> Result<CheckoutSession, PaymentError> {
        info!(
            "Creating checkout session for appointment {} ({} {})",
            request.appointment_id, request.amount, request.currency
        );

        let url = format!("{}/v1/checkout/sessions", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.secret_key)
            .form(&Self::checkout_form(request))
            .send()
            .await?;

        let session = Self::read_session(response, "session creation").await?;
        info!("Created checkout session {}", session.id);
        Ok(session)
    }

    /// GET /v1/checkout/sessions/{id}
    async fn retrieve_session(&self, session_id: &str) -> Result<CheckoutSession, PaymentError> {
        debug!("Retrieving checkout session {}", session_id);

        let url = format!("{}/v1/checkout/sessions/{}", self.base_url, session_id);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.secret_key)
            .send()
            .await?;

        Self::read_session(response, "session retrieval").await
    }
}
