use assert_matches::assert_matches;
use chrono::NaiveDate;

use patient_cell::{PatientError, PatientService, UpdatePatientProfileRequest};
use shared_database::collections;
use shared_models::profile::Address;
use shared_utils::test_utils::{Fixtures, TestConfig};
use shared_utils::AppState;

async fn seeded_state() -> AppState {
    let state = TestConfig::default().to_state();
    state
        .store
        .insert(collections::PATIENTS, Fixtures::patient_document("pat-1", "Jane Doe"))
        .await
        .unwrap();
    state
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 5).unwrap()
}

fn address(line1: &str) -> UpdatePatientProfileRequest {
    UpdatePatientProfileRequest {
        address: Some(Address {
            line1: line1.to_string(),
            line2: String::new(),
        }),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_address_starting_with_digit_is_rejected() {
    let state = seeded_state().await;
    let service = PatientService::new(&state);

    assert_matches!(
        service.update_profile("pat-1", address("12 Main Street"), today()).await,
        Err(PatientError::Validation(e)) if e.field == "address"
    );
    assert_eq!(service.get_patient("pat-1").await.unwrap().address.line1, "");

    let patient = service
        .update_profile("pat-1", address("#12 Main Street"), today())
        .await
        .unwrap();
    assert_eq!(patient.address.line1, "#12 Main Street");
}

#[tokio::test]
async fn test_missing_patient() {
    let state = seeded_state().await;
    let service = PatientService::new(&state);

    assert_matches!(service.get_patient("ghost").await, Err(PatientError::NotFound));

    let request = UpdatePatientProfileRequest {
        gender: Some("Male".to_string()),
        ..Default::default()
    };
    assert_matches!(
        service.update_profile("ghost", request, today()).await,
        Err(PatientError::NotFound)
    );
}

#[tokio::test]
async fn test_empty_update_returns_stored_profile() {
    let state = seeded_state().await;
    let service = PatientService::new(&state);

    let patient = service
        .update_profile("pat-1", UpdatePatientProfileRequest::default(), today())
        .await
        .unwrap();
    assert_eq!(patient.name, "Jane Doe");
    assert_eq!(patient.dob, "Not Selected");
}
