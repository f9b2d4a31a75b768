// libs/payment-cell/src/lib.rs
//
// Hosted checkout for appointment fees. The gateway owns the checkout
// session; locally only the appointment's `payment` flag is written, either
// by the signed webhook or by the idempotent verify call.

pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{CheckoutSession, NewCheckoutSession, PaymentError};
pub use router::payment_routes;
pub use services::{PaymentGateway, PaymentService, StripeClient, WebhookOutcome};
