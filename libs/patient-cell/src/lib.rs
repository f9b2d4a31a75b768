pub mod models;
pub mod handlers;
pub mod router;
pub mod services;

pub use models::{Patient, PatientError, UpdatePatientProfileRequest};
pub use router::patient_routes;
pub use services::PatientService;
