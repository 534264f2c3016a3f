use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::{DoctorError, SetWorkingHoursRequest, Slot, WorkingHoursConfig};
use crate::services::slots::generate_slots;
use crate::store::WorkingHoursStore;

#[derive(Clone)]
pub struct WorkingHoursService {
    store: Arc<dyn WorkingHoursStore>,
}

impl WorkingHoursService {
    pub fn new(store: Arc<dyn WorkingHoursStore>) -> Self {
        Self { store }
    }

    /// Validate and store the weekly schedule for a doctor at one workplace.
    pub async fn set_working_hours(
        &self,
        doctor_id: Uuid,
        workplace_id: Uuid,
        request: SetWorkingHoursRequest,
    ) -> Result<WorkingHoursConfig, DoctorError> {
        debug!("Setting working hours for doctor {} at workplace {}", doctor_id, workplace_id);

        let config = WorkingHoursConfig {
            doctor_id,
            workplace_id,
            slot_duration_minutes: request.slot_duration_minutes,
            days: request.working_hours,
        };
        config.validate()?;

        let stored = self.store.upsert_config(config).await?;
        info!(
            "Working hours stored for doctor {} at workplace {} ({} min slots)",
            doctor_id, workplace_id, stored.slot_duration_minutes
        );

        Ok(stored)
    }

    pub async fn find_working_hours(
        &self,
        doctor_id: Uuid,
        workplace_id: Uuid,
    ) -> Result<Option<WorkingHoursConfig>, DoctorError> {
        self.store.get_config(doctor_id, workplace_id).await
    }

    pub async fn get_working_hours(
        &self,
        doctor_id: Uuid,
        workplace_id: Uuid,
    ) -> Result<WorkingHoursConfig, DoctorError> {
        self.find_working_hours(doctor_id, workplace_id)
            .await?
            .ok_or(DoctorError::ConfigNotFound { doctor_id, workplace_id })
    }

    pub async fn list_workplaces_for_doctor(
        &self,
        doctor_id: Uuid,
    ) -> Result<Vec<WorkingHoursConfig>, DoctorError> {
        self.store.list_for_doctor(doctor_id).await
    }

    /// Full slot grid for a date, ignoring bookings.
    pub async fn slot_grid(
        &self,
        doctor_id: Uuid,
        workplace_id: Uuid,
        date: NaiveDate,
    ) -> Result<(WorkingHoursConfig, Vec<Slot>), DoctorError> {
        let config = self.get_working_hours(doctor_id, workplace_id).await?;
        let slots = generate_slots(&config, date).collect();
        Ok((config, slots))
    }
}
