// libs/appointment-cell/src/services/booking.rs
use std::sync::Arc;

use tracing::{debug, info, warn};

use doctor_cell::services::{generate_slots, WorkingHoursService};

use crate::models::{Appointment, AppointmentError, BookSlotRequest, NewAppointment};
use crate::store::{AppointmentStore, StoreError};

#[derive(Clone)]
pub struct BookingService {
    working_hours: Arc<WorkingHoursService>,
    store: Arc<dyn AppointmentStore>,
}

impl BookingService {
    pub fn new(working_hours: Arc<WorkingHoursService>, store: Arc<dyn AppointmentStore>) -> Self {
        Self { working_hours, store }
    }

    /// Book one grid slot. The store's insert is the only authority on conflicts;
    /// a lost race surfaces as `SlotConflict` and is never retried here.
    pub async fn book_slot(&self, request: BookSlotRequest) -> Result<Appointment, AppointmentError> {
        debug!(
            "Booking doctor {} at workplace {} on {} {} for patient {}",
            request.doctor_id, request.workplace_id, request.date, request.time, request.patient_id
        );

        let config = self
            .working_hours
            .get_working_hours(request.doctor_id, request.workplace_id)
            .await?;

        if !generate_slots(&config, request.date).contains_start(request.time) {
            return Err(AppointmentError::InvalidSlot(format!(
                "{} on {} is not on the {} minute grid for this doctor",
                shared_utils::wall_clock::format(&request.time),
                request.date,
                config.slot_duration_minutes
            )));
        }

        let new = NewAppointment {
            doctor_id: request.doctor_id,
            patient_id: request.patient_id,
            workplace_id: request.workplace_id,
            date: request.date,
            time: request.time,
            status: request.channel.initial_status(),
            notes: request.notes,
        };

        match self.store.insert_if_absent(new).await {
            Ok(appointment) => {
                info!(
                    "Appointment {} booked for doctor {} on {} {} ({})",
                    appointment.id, appointment.doctor_id, appointment.date, appointment.time, appointment.status
                );
                Ok(appointment)
            }
            Err(StoreError::ConstraintViolation) => {
                warn!(
                    "Slot conflict for doctor {} on {} {}",
                    request.doctor_id, request.date, request.time
                );
                Err(AppointmentError::SlotConflict)
            }
            Err(err) => Err(err.into()),
        }
    }
}
