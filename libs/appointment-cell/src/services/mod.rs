pub mod booking;
pub mod dashboard;
pub mod lifecycle;

pub use booking::AppointmentBookingService;
pub use dashboard::DashboardService;
pub use lifecycle::{AppointmentLifecycleService, PaymentUpdate};
