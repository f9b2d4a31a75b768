pub mod doctor;
pub mod slots;

pub use doctor::DoctorService;
pub use slots::{upcoming_slots, BookedSlots, DaySlots, Slot, SlotError};
