use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use admin_cell::admin_routes;
use shared_database::collections;
use shared_models::auth::Role;
use shared_utils::test_utils::{Fixtures, JwtTestUtils, TestConfig, TestUser};

fn token(role: Role) -> String {
    let user = TestUser::with_id("acct-1", "acct-1@example.com", role);
    JwtTestUtils::create_test_token(&user, &TestConfig::default().jwt_secret, Some(1))
}

fn request(method: &str, uri: &str, token: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {}", token));
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

fn new_doctor(email: &str) -> Value {
    json!({
        "name": "Emily Larson",
        "email": email,
        "password": "Doctor@123",
        "image": null,
        "speciality": "Gynecologist",
        "degree": "MBBS",
        "experience": "3 Years",
        "about": "Dr. Larson has a strong commitment to delivering comprehensive medical care.",
        "fees": 60,
        "address": { "line1": "27th Cross, Richmond", "line2": "Circle, Ring Road" }
    })
}

#[tokio::test]
async fn test_admin_adds_and_lists_doctors() {
    let app = admin_routes(TestConfig::default().to_state());
    let admin = token(Role::Admin);

    let (status, body) = send(
        &app,
        request("POST", "/doctors", &admin, Some(new_doctor("emily@clinic.test"))),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["doctor"]["email"], "emily@clinic.test");
    assert_eq!(body["doctor"]["available"], true);
    assert!(body["doctor"].get("password").is_none());

    let (status, body) = send(
        &app,
        request("POST", "/doctors", &admin, Some(new_doctor("emily@clinic.test"))),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");

    let (status, body) = send(&app, request("GET", "/doctors", &admin, None)).await;
    assert_eq!(status, StatusCode::OK);
    let doctors = body["doctors"].as_array().unwrap();
    assert_eq!(doctors.len(), 1);
    assert_eq!(doctors[0]["email"], "emily@clinic.test");
    assert!(doctors[0].get("password").is_none());
}

#[tokio::test]
async fn test_invalid_doctor_is_rejected() {
    let app = admin_routes(TestConfig::default().to_state());

    let mut doctor = new_doctor("emily@clinic.test");
    doctor["fees"] = json!(0);
    let (status, body) = send(
        &app,
        request("POST", "/doctors", &token(Role::Admin), Some(doctor)),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION");
}

#[tokio::test]
async fn test_toggle_availability() {
    let state = TestConfig::default().to_state();
    state
        .store
        .insert(collections::DOCTORS, Fixtures::doctor_document("doc-1", "Richard James", 50.0))
        .await
        .unwrap();
    let app = admin_routes(state);
    let admin = token(Role::Admin);

    let (status, body) = send(
        &app,
        request("POST", "/doctors/doc-1/availability", &admin, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["doctor"]["available"], false);

    let (_, body) = send(
        &app,
        request("POST", "/doctors/doc-1/availability", &admin, None),
    )
    .await;
    assert_eq!(body["doctor"]["available"], true);

    let (status, _) = send(
        &app,
        request("POST", "/doctors/missing/availability", &admin, None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_other_panels_are_forbidden() {
    let app = admin_routes(TestConfig::default().to_state());

    for role in [Role::Patient, Role::Doctor] {
        let (status, _) = send(&app, request("GET", "/doctors", &token(role), None)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}
