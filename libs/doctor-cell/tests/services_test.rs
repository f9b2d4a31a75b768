use assert_matches::assert_matches;

use doctor_cell::models::{AddDoctorRequest, DoctorError};
use doctor_cell::services::DoctorService;
use shared_models::profile::Address;
use shared_utils::test_utils::TestConfig;

fn add_request(email: &str) -> AddDoctorRequest {
    AddDoctorRequest {
        name: "Emily Larson".to_string(),
        email: email.to_string(),
        password: "Doctor@123".to_string(),
        image: Some("https://cdn.example.com/doc.png".to_string()),
        speciality: "Gynecologist".to_string(),
        degree: "MBBS".to_string(),
        experience: "3 Years".to_string(),
        about: "Dr. Larson has a strong commitment to delivering comprehensive medical care."
            .to_string(),
        fees: 60.0,
        address: Address {
            line1: "27th Cross, Richmond".to_string(),
            line2: "Circle, Ring Road".to_string(),
        },
    }
}

#[tokio::test]
async fn test_add_doctor_hashes_password_and_starts_available() {
    let state = TestConfig::default().to_state();
    let service = DoctorService::new(&state);

    let doctor = service.add_doctor(add_request("Emily@Clinic.test")).await.unwrap();

    assert_eq!(doctor.email, "emily@clinic.test");
    assert!(doctor.available);
    assert!(doctor.password.starts_with("$argon2"));
}

#[tokio::test]
async fn test_add_doctor_rejects_duplicate_email() {
    let state = TestConfig::default().to_state();
    let service = DoctorService::new(&state);
    service.add_doctor(add_request("emily@clinic.test")).await.unwrap();

    let again = service.add_doctor(add_request("emily@clinic.test")).await;
    assert_matches!(again, Err(DoctorError::EmailTaken));
}

#[tokio::test]
async fn test_add_doctor_validates_input() {
    let state = TestConfig::default().to_state();
    let service = DoctorService::new(&state);

    let mut request = add_request("emily@clinic.test");
    request.fees = -5.0;
    assert_matches!(service.add_doctor(request).await, Err(DoctorError::Validation(_)));

    let mut request = add_request("emily@clinic.test");
    request.about = "Short bio".to_string();
    assert_matches!(service.add_doctor(request).await, Err(DoctorError::Validation(_)));
}

#[tokio::test]
async fn test_toggle_availability_flips_flag() {
    let state = TestConfig::default().to_state();
    let service = DoctorService::new(&state);
    let doctor = service.add_doctor(add_request("emily@clinic.test")).await.unwrap();

    let toggled = service.toggle_availability(&doctor.id).await.unwrap();
    assert!(!toggled.available);

    let toggled = service.toggle_availability(&doctor.id).await.unwrap();
    assert!(toggled.available);
}

#[tokio::test]
async fn test_toggle_unknown_doctor() {
    let state = TestConfig::default().to_state();
    let service = DoctorService::new(&state);

    assert_matches!(
        service.toggle_availability("missing").await,
        Err(DoctorError::NotFound)
    );
}
