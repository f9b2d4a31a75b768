pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{Appointment, AppointmentError, AppointmentStatus, BookAppointmentRequest};
pub use router::{admin_appointment_routes, doctor_appointment_routes, patient_appointment_routes};
pub use services::{AppointmentBookingService, AppointmentLifecycleService, DashboardService, PaymentUpdate};
