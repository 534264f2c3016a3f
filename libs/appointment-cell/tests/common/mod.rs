// Shared fixtures for appointment-cell integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

use appointment_cell::models::{BookSlotRequest, BookingChannel};
use appointment_cell::services::SchedulingEngine;
use appointment_cell::store::{AppointmentStore, InMemoryAppointmentStore};
use doctor_cell::models::{DayOfWeek, TimeWindow, WorkingHoursConfig};
use doctor_cell::services::WorkingHoursService;
use doctor_cell::store::{InMemoryWorkingHoursStore, WorkingHoursStore};

pub fn at(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

/// 2025-06-16 is a Monday.
pub fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 16).unwrap()
}

pub fn sunday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 22).unwrap()
}

pub struct Fixture {
    pub engine: SchedulingEngine,
    pub store: Arc<InMemoryAppointmentStore>,
    pub doctor_id: Uuid,
    pub workplace_id: Uuid,
}

impl Fixture {
    /// Doctor working Mondays 09:00-17:00 in 30 minute slots.
    pub async fn new() -> Self {
        let working_hours_store = Arc::new(InMemoryWorkingHoursStore::new());
        let doctor_id = Uuid::new_v4();
        let workplace_id = Uuid::new_v4();

        let config = WorkingHoursConfig::new(doctor_id, workplace_id, 30)
            .with_window(DayOfWeek::Monday, TimeWindow::new(at(9, 0), at(17, 0)));
        working_hours_store.upsert_config(config).await.unwrap();

        Self::with_store(working_hours_store, Arc::new(InMemoryAppointmentStore::new()), doctor_id, workplace_id)
    }

    pub fn with_store(
        working_hours_store: Arc<InMemoryWorkingHoursStore>,
        store: Arc<InMemoryAppointmentStore>,
        doctor_id: Uuid,
        workplace_id: Uuid,
    ) -> Self {
        let working_hours = Arc::new(WorkingHoursService::new(working_hours_store));
        let dyn_store: Arc<dyn AppointmentStore> = store.clone();
        Self {
            engine: SchedulingEngine::new(working_hours, dyn_store),
            store,
            doctor_id,
            workplace_id,
        }
    }

    pub fn request(&self, date: NaiveDate, time: NaiveTime) -> BookSlotRequest {
        BookSlotRequest {
            doctor_id: self.doctor_id,
            patient_id: Uuid::new_v4(),
            workplace_id: self.workplace_id,
            date,
            time,
            channel: BookingChannel::Web,
            notes: None,
        }
    }
}
