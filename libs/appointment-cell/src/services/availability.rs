// libs/appointment-cell/src/services/availability.rs
use std::collections::HashSet;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use tracing::debug;
use uuid::Uuid;

use doctor_cell::models::Slot;
use doctor_cell::services::{generate_slots, WorkingHoursService};

use crate::models::{AppointmentError, AvailabilityReport};
use crate::store::AppointmentStore;

/// Derives free slots from working hours minus active appointments. Read-only.
#[derive(Clone)]
pub struct AvailabilityService {
    working_hours: Arc<WorkingHoursService>,
    store: Arc<dyn AppointmentStore>,
}

impl AvailabilityService {
    pub fn new(working_hours: Arc<WorkingHoursService>, store: Arc<dyn AppointmentStore>) -> Self {
        Self { working_hours, store }
    }

    /// Free slots in ascending start order. Empty when the doctor is unconfigured,
    /// off that day, or fully booked; use [`check_availability`](Self::check_availability)
    /// to tell those apart.
    pub async fn get_available_slots(
        &self,
        doctor_id: Uuid,
        workplace_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<Slot>, AppointmentError> {
        Ok(self
            .check_availability(doctor_id, workplace_id, date)
            .await?
            .into_slots())
    }

    pub async fn check_availability(
        &self,
        doctor_id: Uuid,
        workplace_id: Uuid,
        date: NaiveDate,
    ) -> Result<AvailabilityReport, AppointmentError> {
        debug!("Resolving availability for doctor {} at workplace {} on {}", doctor_id, workplace_id, date);

        let Some(config) = self.working_hours.find_working_hours(doctor_id, workplace_id).await? else {
            return Ok(AvailabilityReport::NotConfigured);
        };

        let grid = generate_slots(&config, date);
        let total_slots = grid.len();
        if total_slots == 0 {
            return Ok(AvailabilityReport::DayOff);
        }
        self.store.materialize_slots(grid.clone().collect()).await?;

        let taken: HashSet<NaiveTime> = self
            .store
            .find_active_appointments(doctor_id, date)
            .await?
            .into_iter()
            .map(|appointment| appointment.time)
            .collect();

        let slots: Vec<Slot> = grid.filter(|slot| !taken.contains(&slot.start_time)).collect();

        debug!("{} of {} slots free for doctor {} on {}", slots.len(), total_slots, doctor_id, date);

        if slots.is_empty() {
            Ok(AvailabilityReport::FullyBooked { total_slots })
        } else {
            Ok(AvailabilityReport::Open { total_slots, slots })
        }
    }
}
