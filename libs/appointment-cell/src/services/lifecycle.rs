// libs/appointment-cell/src/services/lifecycle.rs
use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info, warn};

use shared_database::{collections, decode, DatabaseError, DocumentStore, Filter};
use shared_models::auth::{Role, User};
use shared_utils::AppState;

use crate::models::{Appointment, AppointmentAction, AppointmentError, AppointmentStatus};

/// Outcome of reconciling a confirmed payment.
#[derive(Debug, Clone)]
pub struct PaymentUpdate {
    pub appointment: Appointment,
    /// False when the appointment was already marked paid.
    pub changed: bool,
}

pub struct AppointmentLifecycleService {
    store: Arc<dyn DocumentStore>,
}

impl AppointmentLifecycleService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }

    /// Cancel and complete are only allowed from the non-terminal states.
    /// Paid appointments cannot be cancelled.
    pub fn validate_transition(
        status: AppointmentStatus,
        action: AppointmentAction,
    ) -> Result<(), AppointmentError> {
        debug!("Validating {:?} on a {} appointment", action, status);

        match (status, action) {
            (AppointmentStatus::Cancelled, _) => Err(AppointmentError::AlreadyCancelled),
            (AppointmentStatus::Completed, _) => Err(AppointmentError::AlreadyCompleted),
            (AppointmentStatus::Paid, AppointmentAction::Cancel) => {
                Err(AppointmentError::PaidCannotBeCancelled)
            }
            (AppointmentStatus::Pending, _)
            | (AppointmentStatus::Paid, AppointmentAction::Complete) => Ok(()),
        }
    }

    /// Patients may act on their own appointments, doctors on the ones booked
    /// with them, admins on any.
    fn ensure_access(appointment: &Appointment, actor: &User) -> Result<(), AppointmentError> {
        let allowed = match actor.role {
            Role::Admin => true,
            Role::Patient => appointment.user_id == actor.id,
            Role::Doctor => appointment.doc_id == actor.id,
        };
        if allowed {
            Ok(())
        } else {
            warn!("{} {} tried to modify appointment {}", actor.role, actor.id, appointment.id);
            Err(AppointmentError::NotOwner)
        }
    }

    async fn load(&self, appointment_id: &str) -> Result<Appointment, AppointmentError> {
        let document = self
            .store
            .find_by_id(collections::APPOINTMENTS, appointment_id)
            .await?
            .ok_or(AppointmentError::NotFound)?;
        Ok(decode(document)?)
    }

    /// Applies `patch` only while the appointment is still cancellable or
    /// completable. If another write got there first, the fresh state decides
    /// which error to report.
    async fn transition(
        &self,
        appointment_id: &str,
        action: AppointmentAction,
        actor: &User,
    ) -> Result<Appointment, AppointmentError> {
        let appointment = self.load(appointment_id).await?;
        Self::ensure_access(&appointment, actor)?;
        Self::validate_transition(appointment.status(), action)?;

        let mut guards = vec![
            Filter::eq("id", appointment_id),
            Filter::eq("cancelled", false),
            Filter::eq("is_completed", false),
        ];
        let patch = match action {
            AppointmentAction::Cancel => {
                guards.push(Filter::eq("payment", false));
                json!({ "cancelled": true })
            }
            AppointmentAction::Complete => json!({ "is_completed": true }),
        };

        let updated = self
            .store
            .update_where(collections::APPOINTMENTS, &guards, patch)
            .await?;

        match updated.into_iter().next() {
            Some(document) => Ok(decode(document)?),
            None => {
                let current = self.load(appointment_id).await?;
                Self::validate_transition(current.status(), action)?;
                // Guards failed but the state looks valid again; report the race.
                Err(AppointmentError::Database(DatabaseError::Conflict(format!(
                    "appointment {} changed concurrently",
                    appointment_id
                ))))
            }
        }
    }

    pub async fn cancel_appointment(
        &self,
        appointment_id: &str,
        actor: &User,
    ) -> Result<Appointment, AppointmentError> {
        let appointment = self
            .transition(appointment_id, AppointmentAction::Cancel, actor)
            .await?;
        info!(
            "Appointment {} cancelled by {} {}, slot {} {} released",
            appointment.id, actor.role, actor.id, appointment.slot_date, appointment.slot_time
        );
        Ok(appointment)
    }

    pub async fn complete_appointment(
        &self,
        appointment_id: &str,
        actor: &User,
    ) -> Result<Appointment, AppointmentError> {
        let appointment = self
            .transition(appointment_id, AppointmentAction::Complete, actor)
            .await?;
        info!("Appointment {} completed by doctor {}", appointment.id, actor.id);
        Ok(appointment)
    }

    /// Sets `payment = true` once. A second call is a no-op that still
    /// succeeds. Only the payment flag is ever written.
    pub async fn mark_paid(&self, appointment_id: &str) -> Result<PaymentUpdate, AppointmentError> {
        let appointment = self.load(appointment_id).await?;
        if appointment.payment {
            debug!("Appointment {} already marked paid", appointment_id);
            return Ok(PaymentUpdate {
                appointment,
                changed: false,
            });
        }
        if appointment.cancelled {
            warn!(
                "Payment confirmed for cancelled appointment {}, recording it anyway",
                appointment_id
            );
        }

        let updated = self
            .store
            .update_where(
                collections::APPOINTMENTS,
                &[Filter::eq("id", appointment_id), Filter::eq("payment", false)],
                json!({ "payment": true }),
            )
            .await?;

        match updated.into_iter().next() {
            Some(document) => {
                info!("Appointment {} marked paid", appointment_id);
                Ok(PaymentUpdate {
                    appointment: decode(document)?,
                    changed: true,
                })
            }
            // A concurrent reconciliation won; the end state is the same.
            None => Ok(PaymentUpdate {
                appointment: self.load(appointment_id).await?,
                changed: false,
            }),
        }
    }
}
