use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use appointment_cell::router::{
    admin_appointment_routes, doctor_appointment_routes, patient_appointment_routes,
};
use shared_database::collections;
use shared_models::auth::Role;
use shared_utils::test_utils::{Fixtures, JwtTestUtils, TestConfig, TestUser};
use shared_utils::AppState;

async fn clinic() -> AppState {
    let state = TestConfig::default().to_state();
    state
        .store
        .insert(collections::DOCTORS, Fixtures::doctor_document("doc-1", "Richard James", 50.0))
        .await
        .unwrap();
    state
        .store
        .insert(collections::PATIENTS, Fixtures::patient_document("pat-1", "Jane Doe"))
        .await
        .unwrap();
    state
}

fn token(id: &str, role: Role) -> String {
    let user = TestUser::with_id(id, &format!("{}@example.com", id), role);
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

#[tokio::test]
async fn test_patient_books_lists_and_cancels() {
    let state = clinic().await;
    let app = patient_appointment_routes(state);
    let patient = token("pat-1", Role::Patient);

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/appointments",
            &patient,
            Some(json!({ "docId": "doc-1", "slotDate": "5_6_2024", "slotTime": "11:00 AM" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["appointment"]["amount"], 50.0);
    let appointment_id = body["appointment"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, request("GET", "/appointments", &patient, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["appointments"].as_array().unwrap().len(), 1);

    let cancel_uri = format!("/appointments/{}/cancel", appointment_id);
    let (status, body) = send(&app, request("POST", &cancel_uri, &patient, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["appointment"]["cancelled"], true);

    let (status, body) = send(&app, request("POST", &cancel_uri, &patient, None)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Appointment already cancelled");
}

#[tokio::test]
async fn test_second_booking_of_slot_conflicts() {
    let state = clinic().await;
    let app = patient_appointment_routes(state);
    let patient = token("pat-1", Role::Patient);
    let booking = json!({ "doc_id": "doc-1", "slot_date": "5_6_2024", "slot_time": "11:00 AM" });

    let (status, _) = send(&app, request("POST", "/appointments", &patient, Some(booking.clone()))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, request("POST", "/appointments", &patient, Some(booking))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Slot not available");
    assert_eq!(body["code"], "CONFLICT");
}

#[tokio::test]
async fn test_doctor_completes_and_sees_dashboard() {
    let state = clinic().await;
    state
        .store
        .insert(
            collections::APPOINTMENTS,
            Fixtures::appointment_document("a1", "pat-1", "doc-1", "5_6_2024", "10:00 AM", 50.0),
        )
        .await
        .unwrap();
    let app = doctor_appointment_routes(state);
    let doctor = token("doc-1", Role::Doctor);

    let (status, body) = send(&app, request("POST", "/appointments/a1/complete", &doctor, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["appointment"]["is_completed"], true);

    let (status, body) = send(&app, request("GET", "/dashboard", &doctor, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dashboard"]["earnings"], 50.0);
    assert_eq!(body["dashboard"]["patients"], 1);
}

#[tokio::test]
async fn test_doctor_cannot_complete_someone_elses_appointment() {
    let state = clinic().await;
    state
        .store
        .insert(
            collections::APPOINTMENTS,
            Fixtures::appointment_document("a1", "pat-1", "doc-1", "5_6_2024", "10:00 AM", 50.0),
        )
        .await
        .unwrap();
    let app = doctor_appointment_routes(state);

    let (status, body) = send(
        &app,
        request("POST", "/appointments/a1/complete", &token("doc-9", Role::Doctor), None),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Unauthorized action");
}

#[tokio::test]
async fn test_admin_lists_everything() {
    let state = clinic().await;
    for (id, time) in [("a1", "10:00 AM"), ("a2", "10:30 AM")] {
        state
            .store
            .insert(
                collections::APPOINTMENTS,
                Fixtures::appointment_document(id, "pat-1", "doc-1", "5_6_2024", time, 50.0),
            )
            .await
            .unwrap();
    }
    let app = admin_appointment_routes(state);
    let admin = token("admin-1", Role::Admin);

    let (status, body) = send(&app, request("GET", "/appointments", &admin, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["appointments"].as_array().unwrap().len(), 2);

    let (status, body) = send(&app, request("GET", "/dashboard", &admin, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dashboard"]["doctors"], 1);
    assert_eq!(body["dashboard"]["appointments"], 2);
}

#[tokio::test]
async fn test_patient_cannot_use_admin_routes() {
    let state = clinic().await;
    let app = admin_appointment_routes(state);

    let (status, _) = send(&app, request("GET", "/appointments", &token("pat-1", Role::Patient), None)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}
