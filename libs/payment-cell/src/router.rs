// libs/payment-cell/src/router.rs
use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_models::auth::Role;
use shared_utils::extractor::{auth_middleware, role_guard};
use shared_utils::AppState;

use crate::handlers;

pub fn payment_routes(state: AppState) -> Router {
    // Called by the gateway and the browser redirect, no bearer token
    let public_routes = Router::new()
        .route("/webhook", post(handlers::stripe_webhook))
        .route("/success", get(handlers::payment_success))
        .route("/cancel", get(handlers::payment_cancel))
        .with_state(state.clone());

    let patient_routes = Router::new()
        .route("/checkout", post(handlers::create_checkout))
        .route("/verify", post(handlers::verify_payment))
        .route_layer(middleware::from_fn_with_state(Role::Patient, role_guard))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state);

    Router::new().merge(public_routes).merge(patient_routes)
}
