// libs/appointment-cell/src/services/booking.rs
use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::{debug, info, warn};
use uuid::Uuid;

use doctor_cell::services::slots::validate_slot;
use doctor_cell::DoctorService;
use patient_cell::PatientService;
use shared_database::{collections, decode, decode_all, DatabaseError, DocumentStore, Filter};
use shared_utils::AppState;

use crate::models::{Appointment, AppointmentError, BookAppointmentRequest};

pub struct AppointmentBookingService {
    store: Arc<dyn DocumentStore>,
    doctors: DoctorService,
    patients: PatientService,
}

impl AppointmentBookingService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            doctors: DoctorService::new(state),
            patients: PatientService::new(state),
        }
    }

    /// Books a slot for a patient.
    ///
    /// The booked-set check gives a friendly early answer; the store's unique
    /// key on active `(doc_id, slot_date, slot_time)` is what actually
    /// serializes concurrent bookings, and its violation surfaces as
    /// [`AppointmentError::SlotNotAvailable`] as well.
    pub async fn book_appointment(
        &self,
        patient_id: &str,
        request: BookAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        debug!(
            "Booking {} {} with doctor {} for patient {}",
            request.slot_date, request.slot_time, request.doc_id, patient_id
        );

        validate_slot(&request.slot_date, &request.slot_time)?;

        let doctor = self.doctors.get_doctor(&request.doc_id).await?;
        if !doctor.available {
            return Err(AppointmentError::DoctorNotAvailable);
        }

        let booked = self.doctors.booked_slots(&doctor.id).await?;
        if booked.contains(&request.slot_date, &request.slot_time) {
            return Err(AppointmentError::SlotNotAvailable);
        }

        let patient = self.patients.get_patient(patient_id).await?;

        let document = json!({
            "id": Uuid::new_v4().to_string(),
            "user_id": patient.id,
            "doc_id": doctor.id,
            "slot_date": request.slot_date,
            "slot_time": request.slot_time,
            "user_data": patient,
            "doc_data": doctor,
            "amount": doctor.fees,
            "date": Utc::now().to_rfc3339(),
            "cancelled": false,
            "payment": false,
            "is_completed": false,
        });

        let stored = match self.store.insert(collections::APPOINTMENTS, document).await {
            Ok(doc) => doc,
            Err(DatabaseError::Conflict(constraint)) => {
                warn!(
                    "Lost booking race for doctor {} at {} {} ({})",
                    request.doc_id, request.slot_date, request.slot_time, constraint
                );
                return Err(AppointmentError::SlotNotAvailable);
            }
            Err(e) => return Err(e.into()),
        };
        let appointment: Appointment = decode(stored)?;

        info!(
            "Appointment {} booked with doctor {} on {} at {}",
            appointment.id, appointment.doc_id, appointment.slot_date, appointment.slot_time
        );
        Ok(appointment)
    }

    pub async fn get_appointment(&self, appointment_id: &str) -> Result<Appointment, AppointmentError> {
        let document = self
            .store
            .find_by_id(collections::APPOINTMENTS, appointment_id)
            .await?
            .ok_or(AppointmentError::NotFound)?;
        Ok(decode(document)?)
    }

    pub async fn patient_appointments(&self, patient_id: &str) -> Result<Vec<Appointment>, AppointmentError> {
        self.list(&[Filter::eq("user_id", patient_id)]).await
    }

    pub async fn doctor_appointments(&self, doctor_id: &str) -> Result<Vec<Appointment>, AppointmentError> {
        self.list(&[Filter::eq("doc_id", doctor_id)]).await
    }

    pub async fn all_appointments(&self) -> Result<Vec<Appointment>, AppointmentError> {
        self.list(&[]).await
    }

    /// Newest first.
    async fn list(&self, filters: &[Filter]) -> Result<Vec<Appointment>, AppointmentError> {
        let documents = self.store.find(collections::APPOINTMENTS, filters).await?;
        let mut appointments: Vec<Appointment> = decode_all(documents)?;
        appointments.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(appointments)
    }
}
