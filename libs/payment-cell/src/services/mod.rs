pub mod gateway;
pub mod payment;
pub mod signature;
pub mod stripe;

pub use gateway::PaymentGateway;
pub use payment::{PaymentService, WebhookOutcome};
pub use signature::{signature_header, verify_signature};
pub use stripe::StripeClient;
