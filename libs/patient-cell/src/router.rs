use axum::{middleware, routing::get, Router};

use shared_models::auth::Role;
use shared_utils::extractor::{auth_middleware, role_guard};
use shared_utils::AppState;

use crate::handlers::{get_profile, update_profile};

pub fn patient_routes(state: AppState) -> Router {
    Router::new()
        .route("/profile", get(get_profile).put(update_profile))
        .route_layer(middleware::from_fn_with_state(Role::Patient, role_guard))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
