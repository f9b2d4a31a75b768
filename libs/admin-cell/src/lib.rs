// libs/admin-cell/src/lib.rs
//
// Admin panel doctor management. Appointment oversight and the dashboard live
// in appointment-cell and are mounted next to these routes.

pub mod handlers;
pub mod router;

pub use router::admin_routes;
