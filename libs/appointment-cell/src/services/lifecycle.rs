// libs/appointment-cell/src/services/lifecycle.rs
use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::{Appointment, AppointmentError, AppointmentStatus};
use crate::store::AppointmentStore;

/// Attempts before giving up on a status update that keeps racing.
const MAX_TRANSITION_ATTEMPTS: usize = 3;

#[derive(Clone)]
pub struct AppointmentLifecycleService {
    store: Arc<dyn AppointmentStore>,
}

impl AppointmentLifecycleService {
    pub fn new(store: Arc<dyn AppointmentStore>) -> Self {
        Self { store }
    }

    /// Validate that a status transition is allowed
    pub fn validate_status_transition(
        &self,
        current_status: &AppointmentStatus,
        new_status: &AppointmentStatus,
    ) -> Result<(), AppointmentError> {
        if !current_status.can_transition_to(new_status) {
            warn!("Invalid status transition attempted: {} -> {}", current_status, new_status);
            return Err(AppointmentError::InvalidStatusTransition {
                from: *current_status,
                to: *new_status,
            });
        }
        Ok(())
    }

    /// Get all valid next statuses for a given current status
    pub fn get_valid_transitions(&self, current_status: &AppointmentStatus) -> Vec<AppointmentStatus> {
        match current_status {
            AppointmentStatus::Pending => vec![AppointmentStatus::Confirmed, AppointmentStatus::Cancelled],
            AppointmentStatus::Confirmed => vec![AppointmentStatus::Completed, AppointmentStatus::Cancelled],
            // Terminal states - no transitions allowed
            AppointmentStatus::Cancelled | AppointmentStatus::Completed => vec![],
        }
    }

    pub async fn get_appointment(&self, appointment_id: Uuid) -> Result<Appointment, AppointmentError> {
        self.store
            .get_appointment(appointment_id)
            .await?
            .ok_or(AppointmentError::NotFound)
    }

    pub async fn list_patient_appointments(
        &self,
        patient_id: Uuid,
        active_only: bool,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let mut appointments = self.store.find_patient_appointments(patient_id).await?;
        if active_only {
            appointments.retain(|a| !a.status.is_terminal());
        }
        Ok(appointments)
    }

    /// Cancel a pending or confirmed appointment; its slot becomes bookable again.
    pub async fn cancel_appointment(
        &self,
        appointment_id: Uuid,
        reason: Option<String>,
    ) -> Result<Appointment, AppointmentError> {
        let cancelled = self
            .transition(appointment_id, AppointmentStatus::Cancelled, reason)
            .await?;
        info!("Appointment {} cancelled, slot {} {} released", cancelled.id, cancelled.date, cancelled.time);
        Ok(cancelled)
    }

    pub async fn confirm_appointment(&self, appointment_id: Uuid) -> Result<Appointment, AppointmentError> {
        self.transition(appointment_id, AppointmentStatus::Confirmed, None).await
    }

    pub async fn complete_appointment(&self, appointment_id: Uuid) -> Result<Appointment, AppointmentError> {
        self.transition(appointment_id, AppointmentStatus::Completed, None).await
    }

    async fn transition(
        &self,
        appointment_id: Uuid,
        target: AppointmentStatus,
        reason: Option<String>,
    ) -> Result<Appointment, AppointmentError> {
        for attempt in 1..=MAX_TRANSITION_ATTEMPTS {
            let current = self.get_appointment(appointment_id).await?;
            self.validate_status_transition(&current.status, &target)?;

            if let Some(updated) = self
                .store
                .transition_status(appointment_id, current.status, target, reason.clone())
                .await?
            {
                info!("Appointment {} moved {} -> {}", appointment_id, current.status, target);
                return Ok(updated);
            }

            debug!(
                "Appointment {} changed status during update (attempt {}/{})",
                appointment_id, attempt, MAX_TRANSITION_ATTEMPTS
            );
        }

        Err(AppointmentError::ValidationError(format!(
            "Appointment {} kept changing status; try again",
            appointment_id
        )))
    }
}
