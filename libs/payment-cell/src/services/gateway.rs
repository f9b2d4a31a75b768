use async_trait::async_trait;

use crate::models::{CheckoutSession, NewCheckoutSession, PaymentError};

/// Hosted checkout provider.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_checkout_session(
        &self,
        request: &NewCheckoutSession,
    ) -> Result<CheckoutSession, PaymentError>;

    async fn retrieve_session(&self, session_id: &str) -> Result<CheckoutSession, PaymentError>;
}
