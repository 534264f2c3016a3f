// libs/appointment-cell/src/services/engine.rs
use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use doctor_cell::models::{Slot, WorkingHoursConfig};
use doctor_cell::services::{generate_slots, SlotIter, WorkingHoursService};

use crate::models::{Appointment, AppointmentError, AvailabilityReport, BookSlotRequest};
use crate::services::{AppointmentLifecycleService, AvailabilityService, BookingService};
use crate::store::AppointmentStore;

/// In-process entry point used by the HTTP handlers and the chat flow.
#[derive(Clone)]
pub struct SchedulingEngine {
    pub working_hours: Arc<WorkingHoursService>,
    pub availability: AvailabilityService,
    pub booking: BookingService,
    pub lifecycle: AppointmentLifecycleService,
}

impl SchedulingEngine {
    pub fn new(working_hours: Arc<WorkingHoursService>, store: Arc<dyn AppointmentStore>) -> Self {
        Self {
            availability: AvailabilityService::new(working_hours.clone(), store.clone()),
            booking: BookingService::new(working_hours.clone(), store.clone()),
            lifecycle: AppointmentLifecycleService::new(store),
            working_hours,
        }
    }

    pub fn generate_slots(&self, config: &WorkingHoursConfig, date: NaiveDate) -> SlotIter {
        generate_slots(config, date)
    }

    pub async fn get_available_slots(
        &self,
        doctor_id: Uuid,
        workplace_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<Slot>, AppointmentError> {
        self.availability.get_available_slots(doctor_id, workplace_id, date).await
    }

    pub async fn check_availability(
        &self,
        doctor_id: Uuid,
        workplace_id: Uuid,
        date: NaiveDate,
    ) -> Result<AvailabilityReport, AppointmentError> {
        self.availability.check_availability(doctor_id, workplace_id, date).await
    }

    pub async fn book_slot(&self, request: BookSlotRequest) -> Result<Appointment, AppointmentError> {
        self.booking.book_slot(request).await
    }

    pub async fn cancel_appointment(
        &self,
        appointment_id: Uuid,
        reason: Option<String>,
    ) -> Result<Appointment, AppointmentError> {
        self.lifecycle.cancel_appointment(appointment_id, reason).await
    }
}
