pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{AddDoctorRequest, Doctor, DoctorError, DoctorListing, UpdateDoctorProfileRequest};
pub use router::doctor_routes;
pub use services::{BookedSlots, DaySlots, DoctorService, Slot};
