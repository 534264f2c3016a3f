pub mod slots;
pub mod working_hours;

pub use slots::{generate_slots, SlotIter};
pub use working_hours::WorkingHoursService;
