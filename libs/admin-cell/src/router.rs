// libs/admin-cell/src/router.rs
use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_models::auth::Role;
use shared_utils::extractor::{auth_middleware, role_guard};
use shared_utils::AppState;

use crate::handlers;

pub fn admin_routes(state: AppState) -> Router {
    Router::new()
        .route("/doctors", post(handlers::add_doctor).get(handlers::list_doctors))
        .route(
            "/doctors/{doctor_id}/availability",
            post(handlers::toggle_availability),
        )
        .route_layer(middleware::from_fn_with_state(Role::Admin, role_guard))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
