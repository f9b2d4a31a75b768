use axum::{routing::get, Json, Router};
use serde_json::json;

use admin_cell::admin_routes;
use appointment_cell::{
    admin_appointment_routes, doctor_appointment_routes, patient_appointment_routes,
};
use auth_cell::auth_routes;
use doctor_cell::doctor_routes;
use patient_cell::patient_routes;
use payment_cell::payment_routes;
use shared_models::auth::Role;
use shared_utils::AppState;

pub fn create_router(state: AppState) -> Router {
    let user_routes = Router::new()
        .merge(auth_routes(state.clone(), Role::Patient))
        .merge(patient_routes(state.clone()))
        .merge(patient_appointment_routes(state.clone()));

    let doctor_panel_routes = Router::new()
        .merge(auth_routes(state.clone(), Role::Doctor))
        .merge(doctor_routes(state.clone()))
        .merge(doctor_appointment_routes(state.clone()));

    let admin_panel_routes = Router::new()
        .merge(auth_routes(state.clone(), Role::Admin))
        .merge(admin_routes(state.clone()))
        .merge(admin_appointment_routes(state.clone()));

    Router::new()
        .route(
            "/",
            get(|| async {
                Json(json!({ "success": true, "message": "Clinic API is running" }))
            }),
        )
        .nest("/api/user", user_routes)
        .nest("/api/doctor", doctor_panel_routes)
        .nest("/api/admin", admin_panel_routes)
        .nest("/api/payment", payment_routes(state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use shared_utils::test_utils::TestConfig;

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
    }

    fn post(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn get(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = create_router(TestConfig::default().to_state());

        let (status, body) = send(&app, get("/", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
    }

    #[tokio::test]
    async fn test_patient_journey_across_panels() {
        let app = create_router(TestConfig::default().to_state());

        let (status, body) = send(
            &app,
            post(
                "/api/user/register",
                None,
                json!({ "name": "Jane Doe", "email": "jane@example.com", "password": "Patient@123" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let patient_token = body["token"].as_str().unwrap().to_string();

        let (status, body) = send(&app, get("/api/user/profile", Some(&patient_token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["profile"]["email"], "jane@example.com");

        let (status, body) = send(&app, get("/api/doctor/list", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["doctors"], json!([]));

        // Patient tokens do not open the other panels
        let (status, _) = send(&app, get("/api/admin/dashboard", Some(&patient_token))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, _) = send(&app, get("/api/doctor/dashboard", Some(&patient_token))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = send(&app, post("/api/user/logout", Some(&patient_token), json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&app, get("/api/user/profile", Some(&patient_token))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_seeded_admin_reaches_dashboard() {
        let state = TestConfig::default().to_state();
        auth_cell::AuthService::new(&state).seed_admin().await.unwrap();
        let app = create_router(state);

        let (status, body) = send(
            &app,
            post(
                "/api/admin/login",
                None,
                json!({ "email": "admin@clinic.test", "password": "Admin@1234" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let admin_token = body["token"].as_str().unwrap().to_string();

        let (status, body) = send(&app, get("/api/admin/dashboard", Some(&admin_token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["dashboard"]["doctors"], 0);

        let (status, _) = send(&app, get("/api/admin/doctors", Some(&admin_token))).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_paths_are_not_found() {
        let app = create_router(TestConfig::default().to_state());

        for uri in ["/api/user/nope", "/api/doctor/register", "/api/admin/unknown", "/api/feedback"] {
            let (status, _) = send(&app, get(uri, None)).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
        }
        let (status, _) = send(&app, post("/api/doctor/register", None, json!({}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
