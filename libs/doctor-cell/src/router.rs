use axum::{
    middleware,
    routing::get,
    Router,
};

use shared_models::auth::Role;
use shared_utils::extractor::{auth_middleware, role_guard};
use shared_utils::AppState;

use crate::handlers;

pub fn doctor_routes(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/list", get(handlers::list_doctors))
        .route("/{doctor_id}/slots", get(handlers::doctor_slots));

    let protected_routes = Router::new()
        .route("/profile", get(handlers::get_profile).put(handlers::update_profile))
        .route_layer(middleware::from_fn_with_state(Role::Doctor, role_guard))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
