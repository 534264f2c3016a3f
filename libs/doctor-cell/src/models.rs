use std::collections::BTreeMap;
use std::fmt;

use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use shared_database::DatabaseError;
use shared_utils::wall_clock;

pub const MINUTES_PER_DAY: u32 = 24 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    #[serde(alias = "Monday", alias = "mon")]
    Monday,
    #[serde(alias = "Tuesday", alias = "tue")]
    Tuesday,
    #[serde(alias = "Wednesday", alias = "wed")]
    Wednesday,
    #[serde(alias = "Thursday", alias = "thu")]
    Thursday,
    #[serde(alias = "Friday", alias = "fri")]
    Friday,
    #[serde(alias = "Saturday", alias = "sat")]
    Saturday,
    #[serde(alias = "Sunday", alias = "sun")]
    Sunday,
}

impl From<Weekday> for DayOfWeek {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => DayOfWeek::Monday,
            Weekday::Tue => DayOfWeek::Tuesday,
            Weekday::Wed => DayOfWeek::Wednesday,
            Weekday::Thu => DayOfWeek::Thursday,
            Weekday::Fri => DayOfWeek::Friday,
            Weekday::Sat => DayOfWeek::Saturday,
            Weekday::Sun => DayOfWeek::Sunday,
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DayOfWeek::Monday => "monday",
            DayOfWeek::Tuesday => "tuesday",
            DayOfWeek::Wednesday => "wednesday",
            DayOfWeek::Thursday => "thursday",
            DayOfWeek::Friday => "friday",
            DayOfWeek::Saturday => "saturday",
            DayOfWeek::Sunday => "sunday",
        };
        write!(f, "{}", name)
    }
}

/// Half-open civil-time window `[start, end)` in the doctor's local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    #[serde(with = "wall_clock")]
    pub start: NaiveTime,
    #[serde(with = "wall_clock")]
    pub end: NaiveTime,
}

impl TimeWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    pub fn length_minutes(&self) -> u32 {
        wall_clock::minutes_of_day(&self.end).saturating_sub(wall_clock::minutes_of_day(&self.start))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkingHoursConfig {
    pub doctor_id: Uuid,
    pub workplace_id: Uuid,
    pub slot_duration_minutes: u32,
    #[serde(rename = "working_hours", default)]
    pub days: BTreeMap<DayOfWeek, Option<TimeWindow>>,
}

impl WorkingHoursConfig {
    pub fn new(doctor_id: Uuid, workplace_id: Uuid, slot_duration_minutes: u32) -> Self {
        Self {
            doctor_id,
            workplace_id,
            slot_duration_minutes,
            days: BTreeMap::new(),
        }
    }

    pub fn with_window(mut self, day: DayOfWeek, window: TimeWindow) -> Self {
        self.days.insert(day, Some(window));
        self
    }

    pub fn window_for(&self, day: DayOfWeek) -> Option<&TimeWindow> {
        self.days.get(&day).and_then(|window| window.as_ref())
    }

    pub fn window_on(&self, date: NaiveDate) -> Option<&TimeWindow> {
        use chrono::Datelike;
        self.window_for(date.weekday().into())
    }

    pub fn validate(&self) -> Result<(), DoctorError> {
        if self.slot_duration_minutes == 0 {
            return Err(DoctorError::InvalidConfig(
                "Slot duration must be greater than zero".to_string(),
            ));
        }

        if self.slot_duration_minutes > MINUTES_PER_DAY {
            return Err(DoctorError::InvalidConfig(
                "Slot duration cannot exceed one day".to_string(),
            ));
        }

        let mut any_window = false;
        let mut fits_somewhere = false;

        for (day, window) in &self.days {
            let Some(window) = window else { continue };
            any_window = true;

            if window.start >= window.end {
                return Err(DoctorError::InvalidConfig(format!(
                    "Start time must be before end time on {}",
                    day
                )));
            }

            let length = window.length_minutes();
            if length >= self.slot_duration_minutes {
                fits_somewhere = true;
            }

            if length % self.slot_duration_minutes != 0 {
                warn!(
                    "Window on {} ({} min) is not a multiple of {} min; trailing {} min will not be bookable",
                    day,
                    length,
                    self.slot_duration_minutes,
                    length % self.slot_duration_minutes
                );
            }
        }

        if any_window && !fits_somewhere {
            return Err(DoctorError::InvalidConfig(format!(
                "A {} minute slot does not fit in any configured window",
                self.slot_duration_minutes
            )));
        }

        Ok(())
    }
}

/// One bookable interval `[start_time, end_time)` derived from a working-hours config.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slot {
    pub doctor_id: Uuid,
    pub workplace_id: Uuid,
    pub date: NaiveDate,
    #[serde(with = "wall_clock")]
    pub start_time: NaiveTime,
    #[serde(with = "wall_clock")]
    pub end_time: NaiveTime,
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetWorkingHoursRequest {
    pub slot_duration_minutes: u32,
    #[serde(default)]
    pub working_hours: BTreeMap<DayOfWeek, Option<TimeWindow>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotGridResponse {
    pub doctor_id: Uuid,
    pub workplace_id: Uuid,
    pub date: NaiveDate,
    pub slot_duration_minutes: u32,
    pub slots: Vec<Slot>,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Error, Debug)]
pub enum DoctorError {
    #[error("No working hours configured for doctor {doctor_id} at workplace {workplace_id}")]
    ConfigNotFound { doctor_id: Uuid, workplace_id: Uuid },

    #[error("Invalid working hours: {0}")]
    InvalidConfig(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<DatabaseError> for DoctorError {
    fn from(err: DatabaseError) -> Self {
        DoctorError::Database(err.to_string())
    }
}

impl From<DoctorError> for shared_models::AppError {
    fn from(err: DoctorError) -> Self {
        match err {
            DoctorError::ConfigNotFound { .. } => shared_models::AppError::NotFound(err.to_string()),
            DoctorError::InvalidConfig(msg) => shared_models::AppError::ValidationError(msg),
            DoctorError::Database(msg) => shared_models::AppError::Database(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn rejects_zero_duration() {
        let config = WorkingHoursConfig::new(Uuid::new_v4(), Uuid::new_v4(), 0);
        assert_matches!(config.validate(), Err(DoctorError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_inverted_window() {
        let config = WorkingHoursConfig::new(Uuid::new_v4(), Uuid::new_v4(), 30)
            .with_window(DayOfWeek::Monday, TimeWindow::new(at(17, 0), at(9, 0)));
        assert_matches!(config.validate(), Err(DoctorError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_duration_longer_than_every_window() {
        let config = WorkingHoursConfig::new(Uuid::new_v4(), Uuid::new_v4(), 90)
            .with_window(DayOfWeek::Monday, TimeWindow::new(at(9, 0), at(10, 0)));
        assert_matches!(config.validate(), Err(DoctorError::InvalidConfig(_)));
    }

    #[test]
    fn accepts_window_with_trailing_remainder() {
        let config = WorkingHoursConfig::new(Uuid::new_v4(), Uuid::new_v4(), 30)
            .with_window(DayOfWeek::Monday, TimeWindow::new(at(9, 0), at(9, 50)));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn deserializes_stored_working_hours_json() {
        let raw = serde_json::json!({
            "doctor_id": Uuid::nil(),
            "workplace_id": Uuid::nil(),
            "slot_duration_minutes": 30,
            "working_hours": {
                "Monday": { "start": "09:00", "end": "17:00" },
                "sunday": null
            }
        });

        let config: WorkingHoursConfig = serde_json::from_value(raw).unwrap();
        assert_eq!(
            config.window_for(DayOfWeek::Monday),
            Some(&TimeWindow::new(at(9, 0), at(17, 0)))
        );
        assert_eq!(config.window_for(DayOfWeek::Sunday), None);
        assert_eq!(config.window_for(DayOfWeek::Tuesday), None);
    }
}
