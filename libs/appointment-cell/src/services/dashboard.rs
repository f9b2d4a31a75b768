// libs/appointment-cell/src/services/dashboard.rs
use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use shared_database::{collections, DocumentStore};
use shared_utils::AppState;

use crate::models::{AdminDashboard, Appointment, AppointmentError, DoctorDashboard};
use crate::services::booking::AppointmentBookingService;

const LATEST_APPOINTMENTS: usize = 5;

pub struct DashboardService {
    store: Arc<dyn DocumentStore>,
    bookings: AppointmentBookingService,
}

impl DashboardService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            bookings: AppointmentBookingService::new(state),
        }
    }

    /// Earnings count every appointment that was completed or paid.
    pub async fn doctor_dashboard(&self, doctor_id: &str) -> Result<DoctorDashboard, AppointmentError> {
        let appointments = self.bookings.doctor_appointments(doctor_id).await?;
        debug!("Building dashboard for doctor {} over {} appointments", doctor_id, appointments.len());

        let earnings: f64 = appointments
            .iter()
            .filter(|a| a.is_completed || a.payment)
            .map(|a| a.amount)
            .sum();
        let patients: HashSet<&str> = appointments.iter().map(|a| a.user_id.as_str()).collect();

        Ok(DoctorDashboard {
            earnings,
            appointments: appointments.len(),
            patients: patients.len(),
            latest_appointments: latest(&appointments),
        })
    }

    pub async fn admin_dashboard(&self) -> Result<AdminDashboard, AppointmentError> {
        let appointments = self.bookings.all_appointments().await?;
        let doctors = self.store.find(collections::DOCTORS, &[]).await?.len();
        let patients = self.store.find(collections::PATIENTS, &[]).await?.len();

        Ok(AdminDashboard {
            doctors,
            appointments: appointments.len(),
            patients,
            latest_appointments: latest(&appointments),
        })
    }
}

/// Listings are already newest first.
fn latest(appointments: &[Appointment]) -> Vec<Appointment> {
    appointments.iter().take(LATEST_APPOINTMENTS).cloned().collect()
}
