use assert_matches::assert_matches;
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use payment_cell::models::{NewCheckoutSession, PaymentError};
use payment_cell::{PaymentGateway, StripeClient};
use shared_utils::test_utils::TestConfig;

fn client_for(server: &MockServer) -> StripeClient {
    let mut config = TestConfig::default().to_app_config();
    config.stripe_base_url = server.uri();
    StripeClient::new(&config).unwrap()
}

fn checkout_request() -> NewCheckoutSession {
    NewCheckoutSession {
        appointment_id: "appt-1".to_string(),
        amount: 5000,
        currency: "usd".to_string(),
        description: "Consultation with Richard James".to_string(),
        success_url: "http://localhost:5173/verify?success=true".to_string(),
        cancel_url: "http://localhost:5173/verify?success=false".to_string(),
    }
}

#[tokio::test]
async fn test_create_session_posts_form_with_bearer_key() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/checkout/sessions"))
        .and(header("authorization", "Bearer sk_test_123"))
        .and(body_string_contains("mode=payment"))
        .and(body_string_contains("unit_amount%5D=5000"))
        .and(body_string_contains("currency%5D=usd"))
        .and(body_string_contains("metadata%5Bappointment_id%5D=appt-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "cs_test_1",
            "object": "checkout.session",
            "url": "https://checkout.stripe.com/c/pay/cs_test_1",
            "payment_status": "unpaid",
            "metadata": { "appointment_id": "appt-1" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = client_for(&server)
        .create_checkout_session(&checkout_request())
        .await
        .unwrap();

    assert_eq!(session.id, "cs_test_1");
    assert_eq!(session.url.as_deref(), Some("https://checkout.stripe.com/c/pay/cs_test_1"));
    assert!(!session.is_paid());
    assert_eq!(session.appointment_id(), Some("appt-1"));
}

#[tokio::test]
async fn test_retrieve_session_reads_payment_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/checkout/sessions/cs_test_1"))
        .and(header("authorization", "Bearer sk_test_123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "cs_test_1",
            "url": null,
            "payment_status": "paid",
            "metadata": { "appointment_id": "appt-1" }
        })))
        .mount(&server)
        .await;

    let session = client_for(&server).retrieve_session("cs_test_1").await.unwrap();

    assert!(session.is_paid());
    assert_eq!(session.appointment_id(), Some("appt-1"));
}

#[tokio::test]
async fn test_unknown_session_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/checkout/sessions/cs_missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": { "type": "invalid_request_error", "message": "No such checkout.session" }
        })))
        .mount(&server)
        .await;

    let result = client_for(&server).retrieve_session("cs_missing").await;
    assert_matches!(result, Err(PaymentError::SessionNotFound));
}

#[tokio::test]
async fn test_gateway_errors_are_reported() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/checkout/sessions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream failure"))
        .mount(&server)
        .await;

    let result = client_for(&server)
        .create_checkout_session(&checkout_request())
        .await;
    assert_matches!(result, Err(PaymentError::Gateway(_)));
}

#[tokio::test]
async fn test_unparseable_session_is_a_gateway_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/checkout/sessions/cs_test_1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let result = client_for(&server).retrieve_session("cs_test_1").await;
    assert_matches!(result, Err(PaymentError::Gateway(_)));
}

#[test]
fn test_missing_secret_key_is_not_configured() {
    let mut config = TestConfig::default().to_app_config();
    config.stripe_secret_key = String::new();

    assert_matches!(StripeClient::new(&config).err(), Some(PaymentError::NotConfigured));
}
