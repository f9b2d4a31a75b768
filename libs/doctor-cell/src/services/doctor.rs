use std::sync::Arc;

use chrono::{NaiveDateTime, Utc};
use serde_json::{json, Map, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;

use security_cell::{PasswordSecurityService, ValidationService};
use shared_database::{collections, decode, decode_all, DatabaseError, DocumentStore, Filter};
use shared_utils::AppState;

use crate::models::{AddDoctorRequest, Doctor, DoctorError, UpdateDoctorProfileRequest};
use crate::services::slots::{upcoming_slots, BookedSlots, DaySlots};

pub struct DoctorService {
    store: Arc<dyn DocumentStore>,
}

impl DoctorService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }

    pub async fn list_doctors(&self) -> Result<Vec<Doctor>, DoctorError> {
        let documents = self.store.find(collections::DOCTORS, &[]).await?;
        let mut doctors: Vec<Doctor> = decode_all(documents)?;
        doctors.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(doctors)
    }

    pub async fn get_doctor(&self, doctor_id: &str) -> Result<Doctor, DoctorError> {
        debug!("Fetching doctor {}", doctor_id);

        let document = self
            .store
            .find_by_id(collections::DOCTORS, doctor_id)
            .await?
            .ok_or(DoctorError::NotFound)?;
        Ok(decode(document)?)
    }

    /// Admin-side creation of a doctor account.
    pub async fn add_doctor(&self, request: AddDoctorRequest) -> Result<Doctor, DoctorError> {
        let validator = ValidationService::new();
        let name = request.name.trim();
        validator.validate_name(name)?;
        let email = validator.validate_email(request.email.trim())?;
        PasswordSecurityService::validate_password_policy(&request.password)?;
        validator.validate_required("speciality", &request.speciality)?;
        validator.validate_required("degree", &request.degree)?;
        validator.validate_required("experience", &request.experience)?;
        validator.validate_about(&request.about)?;
        validator.validate_fees(request.fees)?;
        validator.validate_address_line(&request.address.line1, true)?;
        validator.validate_address_line(&request.address.line2, false)?;
        if let Some(image) = &request.image {
            validator.validate_image_url(image)?;
        }

        let existing = self
            .store
            .find(collections::DOCTORS, &[Filter::eq("email", email.as_str())])
            .await?;
        if !existing.is_empty() {
            return Err(DoctorError::EmailTaken);
        }

        let document = json!({
            "id": Uuid::new_v4().to_string(),
            "name": name,
            "email": email,
            "password": PasswordSecurityService::hash_password(&request.password)?,
            "image": request.image,
            "speciality": request.speciality.trim(),
            "degree": request.degree.trim(),
            "experience": request.experience.trim(),
            "about": request.about.trim(),
            "available": true,
            "fees": request.fees,
            "address": request.address,
            "created_at": Utc::now().to_rfc3339(),
        });

        let stored = match self.store.insert(collections::DOCTORS, document).await {
            Ok(doc) => doc,
            Err(DatabaseError::Conflict(_)) => return Err(DoctorError::EmailTaken),
            Err(e) => return Err(e.into()),
        };
        let doctor: Doctor = decode(stored)?;

        info!("Added doctor {} ({})", doctor.id, doctor.speciality);
        Ok(doctor)
    }

    /// Flips the `available` flag. Guarded on the value read so two concurrent
    /// toggles cannot both apply the same flip.
    pub async fn toggle_availability(&self, doctor_id: &str) -> Result<Doctor, DoctorError> {
        let doctor = self.get_doctor(doctor_id).await?;

        let updated = self
            .store
            .update_where(
                collections::DOCTORS,
                &[
                    Filter::eq("id", doctor_id),
                    Filter::eq("available", doctor.available),
                ],
                json!({ "available": !doctor.available }),
            )
            .await?;

        match updated.into_iter().next() {
            Some(document) => {
                let doctor: Doctor = decode(document)?;
                info!("Doctor {} availability set to {}", doctor.id, doctor.available);
                Ok(doctor)
            }
            None => {
                warn!("Availability of doctor {} changed concurrently", doctor_id);
                self.get_doctor(doctor_id).await
            }
        }
    }

    pub async fn update_profile(
        &self,
        doctor_id: &str,
        request: UpdateDoctorProfileRequest,
    ) -> Result<Doctor, DoctorError> {
        let validator = ValidationService::new();
        let mut patch = Map::new();

        if let Some(fees) = request.fees {
            validator.validate_fees(fees)?;
            patch.insert("fees".to_string(), json!(fees));
        }
        if let Some(address) = request.address {
            validator.validate_address_line(&address.line1, true)?;
            validator.validate_address_line(&address.line2, false)?;
            patch.insert("address".to_string(), json!(address));
        }
        if let Some(available) = request.available {
            patch.insert("available".to_string(), json!(available));
        }

        if patch.is_empty() {
            return self.get_doctor(doctor_id).await;
        }

        let document = self
            .store
            .update_by_id(collections::DOCTORS, doctor_id, Value::Object(patch))
            .await?
            .ok_or(DoctorError::NotFound)?;

        info!("Doctor {} updated their profile", doctor_id);
        Ok(decode(document)?)
    }

    /// Rebuilt from the doctor's non-cancelled appointments on every call.
    pub async fn booked_slots(&self, doctor_id: &str) -> Result<BookedSlots, DoctorError> {
        let appointments = self
            .store
            .find(
                collections::APPOINTMENTS,
                &[Filter::eq("doc_id", doctor_id), Filter::eq("cancelled", false)],
            )
            .await?;

        let booked = appointments
            .iter()
            .filter_map(|appointment| {
                let date = appointment.get("slot_date")?.as_str()?;
                let time = appointment.get("slot_time")?.as_str()?;
                Some((date.to_string(), time.to_string()))
            })
            .collect();
        Ok(booked)
    }

    pub async fn available_slots(
        &self,
        doctor_id: &str,
        now: NaiveDateTime,
    ) -> Result<(Doctor, BookedSlots, Vec<DaySlots>), DoctorError> {
        let doctor = self.get_doctor(doctor_id).await?;
        let booked = self.booked_slots(doctor_id).await?;
        let days = upcoming_slots(&booked, now);
        Ok((doctor, booked, days))
    }
}
