pub mod memory;
pub mod supabase;

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use doctor_cell::models::Slot;
use shared_database::DatabaseError;

use crate::models::{Appointment, AppointmentStatus, NewAppointment};

pub use memory::InMemoryAppointmentStore;
pub use supabase::SupabaseAppointmentStore;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// An active appointment already holds the same doctor/date/time.
    #[error("Active appointment already exists for this doctor, date and time")]
    ConstraintViolation,

    #[error("Store backend error: {0}")]
    Backend(String),
}

impl From<DatabaseError> for StoreError {
    fn from(err: DatabaseError) -> Self {
        if err.is_conflict() {
            StoreError::ConstraintViolation
        } else {
            StoreError::Backend(err.to_string())
        }
    }
}

/// Appointment persistence. Implementations must enforce at most one active
/// (non-cancelled) appointment per `(doctor_id, date, time)` atomically with the insert.
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    async fn find_active_appointments(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<Appointment>, StoreError>;

    async fn insert_if_absent(&self, appointment: NewAppointment) -> Result<Appointment, StoreError>;

    async fn get_appointment(&self, appointment_id: Uuid) -> Result<Option<Appointment>, StoreError>;

    /// Compare-and-set on the status. `Ok(None)` when the row no longer has status `from`.
    async fn transition_status(
        &self,
        appointment_id: Uuid,
        from: AppointmentStatus,
        to: AppointmentStatus,
        reason: Option<String>,
    ) -> Result<Option<Appointment>, StoreError>;

    async fn find_patient_appointments(&self, patient_id: Uuid) -> Result<Vec<Appointment>, StoreError>;

    /// Record a generated slot grid in the backend's slot cache, if it keeps one.
    async fn materialize_slots(&self, _slots: Vec<Slot>) -> Result<(), StoreError> {
        Ok(())
    }
}
