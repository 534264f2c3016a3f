pub mod availability;
pub mod booking;
pub mod engine;
pub mod lifecycle;

pub use availability::AvailabilityService;
pub use booking::BookingService;
pub use engine::SchedulingEngine;
pub use lifecycle::AppointmentLifecycleService;
