// libs/appointment-cell/src/models.rs
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use doctor_cell::models::{DoctorError, Slot};
use shared_models::error::AppError;
use shared_utils::wall_clock;

use crate::store::StoreError;

/// Bumped whenever the availability response shape changes.
pub const AVAILABILITY_SCHEMA_VERSION: u32 = 1;

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub patient_id: Uuid,
    pub workplace_id: Uuid,
    #[serde(rename = "appointment_date")]
    pub date: NaiveDate,
    #[serde(rename = "appointment_time", with = "wall_clock")]
    pub time: NaiveTime,
    pub status: AppointmentStatus,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    /// Whether this appointment still occupies its doctor/date/time slot.
    pub fn occupies_slot(&self) -> bool {
        self.status.is_active()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl AppointmentStatus {
    /// Every status except CANCELLED holds the slot, COMPLETED included.
    pub fn is_active(&self) -> bool {
        !matches!(self, AppointmentStatus::Cancelled)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AppointmentStatus::Cancelled | AppointmentStatus::Completed)
    }

    pub fn can_transition_to(&self, target: &AppointmentStatus) -> bool {
        use AppointmentStatus::*;
        matches!(
            (self, target),
            (Pending, Confirmed) | (Pending, Cancelled) | (Confirmed, Completed) | (Confirmed, Cancelled)
        )
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "PENDING"),
            AppointmentStatus::Confirmed => write!(f, "CONFIRMED"),
            AppointmentStatus::Cancelled => write!(f, "CANCELLED"),
            AppointmentStatus::Completed => write!(f, "COMPLETED"),
        }
    }
}

/// Where a booking came from; decides the initial status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingChannel {
    #[default]
    Web,
    Chat,
}

impl BookingChannel {
    pub fn initial_status(&self) -> AppointmentStatus {
        match self {
            BookingChannel::Web => AppointmentStatus::Pending,
            BookingChannel::Chat => AppointmentStatus::Confirmed,
        }
    }
}

/// Row handed to the store; id and timestamps are assigned on insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAppointment {
    pub doctor_id: Uuid,
    pub patient_id: Uuid,
    pub workplace_id: Uuid,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
}

/// Persisted slot row. Only a cache of appointment existence, never an authority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterializedSlot {
    #[serde(flatten)]
    pub slot: Slot,
    pub is_available: bool,
    pub appointment_id: Option<Uuid>,
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookSlotRequest {
    pub doctor_id: Uuid,
    pub patient_id: Uuid,
    pub workplace_id: Uuid,
    pub date: NaiveDate,
    #[serde(with = "wall_clock")]
    pub time: NaiveTime,
    #[serde(default)]
    pub channel: BookingChannel,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CancelAppointmentRequest {
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityQuery {
    pub doctor_id: Uuid,
    pub workplace_id: Uuid,
    pub date: NaiveDate,
}

/// Availability for one doctor/workplace/date, with the reason when nothing is bookable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AvailabilityReport {
    /// No working hours exist for this doctor at this workplace.
    NotConfigured,
    /// Working hours exist but have no window on this weekday.
    DayOff,
    FullyBooked { total_slots: usize },
    Open { total_slots: usize, slots: Vec<Slot> },
}

impl AvailabilityReport {
    pub fn into_slots(self) -> Vec<Slot> {
        match self {
            AvailabilityReport::Open { slots, .. } => slots,
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub schema_version: u32,
    pub doctor_id: Uuid,
    pub workplace_id: Uuid,
    pub date: NaiveDate,
    #[serde(flatten)]
    pub report: AvailabilityReport,
}

impl AvailabilityResponse {
    pub fn new(query: &AvailabilityQuery, report: AvailabilityReport) -> Self {
        Self {
            schema_version: AVAILABILITY_SCHEMA_VERSION,
            doctor_id: query.doctor_id,
            workplace_id: query.workplace_id,
            date: query.date,
            report,
        }
    }
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppointmentError {
    #[error("No working hours configured for doctor {doctor_id} at workplace {workplace_id}")]
    ConfigNotFound { doctor_id: Uuid, workplace_id: Uuid },

    #[error("Invalid slot: {0}")]
    InvalidSlot(String),

    #[error("Slot already booked; fetch availability again and pick another slot")]
    SlotConflict,

    #[error("Appointment not found")]
    NotFound,

    #[error("Appointment cannot move from {from} to {to}")]
    InvalidStatusTransition { from: AppointmentStatus, to: AppointmentStatus },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<StoreError> for AppointmentError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ConstraintViolation => AppointmentError::SlotConflict,
            StoreError::Backend(msg) => AppointmentError::DatabaseError(msg),
        }
    }
}

impl From<DoctorError> for AppointmentError {
    fn from(err: DoctorError) -> Self {
        match err {
            DoctorError::ConfigNotFound { doctor_id, workplace_id } => {
                AppointmentError::ConfigNotFound { doctor_id, workplace_id }
            }
            DoctorError::InvalidConfig(msg) => AppointmentError::ValidationError(msg),
            DoctorError::Database(msg) => AppointmentError::DatabaseError(msg),
        }
    }
}

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        match err {
            AppointmentError::ConfigNotFound { .. } | AppointmentError::NotFound => {
                AppError::NotFound(err.to_string())
            }
            AppointmentError::InvalidSlot(_) | AppointmentError::ValidationError(_) => {
                AppError::ValidationError(err.to_string())
            }
            AppointmentError::SlotConflict | AppointmentError::InvalidStatusTransition { .. } => {
                AppError::Conflict(err.to_string())
            }
            AppointmentError::DatabaseError(msg) => AppError::Database(msg),
        }
    }
}
