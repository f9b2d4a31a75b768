// libs/appointment-cell/src/router.rs
use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_models::auth::Role;
use shared_utils::extractor::{auth_middleware, role_guard};
use shared_utils::AppState;

use crate::handlers;

fn guarded(routes: Router<AppState>, state: AppState, role: Role) -> Router {
    routes
        .route_layer(middleware::from_fn_with_state(role, role_guard))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}

pub fn patient_appointment_routes(state: AppState) -> Router {
    let routes = Router::new()
        .route(
            "/appointments",
            post(handlers::book_appointment).get(handlers::list_patient_appointments),
        )
        .route("/appointments/{appointment_id}/cancel", post(handlers::cancel_appointment));

    guarded(routes, state, Role::Patient)
}

pub fn doctor_appointment_routes(state: AppState) -> Router {
    let routes = Router::new()
        .route("/appointments", get(handlers::list_doctor_appointments))
        .route("/appointments/{appointment_id}/complete", post(handlers::complete_appointment))
        .route("/appointments/{appointment_id}/cancel", post(handlers::cancel_appointment))
        .route("/dashboard", get(handlers::doctor_dashboard));

    guarded(routes, state, Role::Doctor)
}

pub fn admin_appointment_routes(state: AppState) -> Router {
    let routes = Router::new()
        .route("/appointments", get(handlers::list_all_appointments))
        .route("/appointments/{appointment_id}/cancel", post(handlers::cancel_appointment))
        .route("/dashboard", get(handlers::admin_dashboard));

    guarded(routes, state, Role::Admin)
}
