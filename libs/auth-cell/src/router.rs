use axum::{middleware, routing::post, Router};

use shared_models::auth::Role;
use shared_utils::extractor::{auth_middleware, role_guard};
use shared_utils::AppState;

use crate::handlers;

/// Login and logout for one panel. The patient panel also gets `/register`.
pub fn auth_routes(state: AppState, role: Role) -> Router {
    let login = match role {
        Role::Patient => post(handlers::patient_login),
        Role::Doctor => post(handlers::doctor_login),
        Role::Admin => post(handlers::admin_login),
    };

    let mut public_routes = Router::new().route("/login", login);
    if role == Role::Patient {
        public_routes = public_routes.route("/register", post(handlers::register_patient));
    }

    let protected_routes = Router::new()
        .route("/logout", post(handlers::logout))
        .route_layer(middleware::from_fn_with_state(role, role_guard))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
