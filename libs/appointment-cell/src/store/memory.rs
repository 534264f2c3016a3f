use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime, Utc};
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use doctor_cell::models::Slot;

use crate::models::{Appointment, AppointmentStatus, MaterializedSlot, NewAppointment};
use super::{AppointmentStore, StoreError};

type SlotKey = (Uuid, NaiveDate, NaiveTime);

#[derive(Default)]
struct Inner {
    appointments: HashMap<Uuid, Appointment>,
    /// Uniqueness index over active appointments.
    active_slots: HashMap<SlotKey, Uuid>,
    slot_cache: HashMap<(Uuid, Uuid, NaiveDate, NaiveTime), MaterializedSlot>,
}

impl Inner {
    fn mark_cached_slot(&mut self, appointment: &Appointment, booked: bool) {
        let key = (appointment.doctor_id, appointment.workplace_id, appointment.date, appointment.time);
        if let Some(row) = self.slot_cache.get_mut(&key) {
            row.is_available = !booked;
            row.appointment_id = booked.then_some(appointment.id);
        }
    }
}

/// Process-local store. One mutex covers the uniqueness check, the insert
/// and the slot cache so they can never disagree.
#[derive(Default)]
pub struct InMemoryAppointmentStore {
    inner: Mutex<Inner>,
}

impl InMemoryAppointmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Materialize slot rows for later inspection. Existing rows are left untouched.
    pub async fn warm_slot_cache<I>(&self, slots: I)
    where
        I: IntoIterator<Item = Slot>,
    {
        let mut inner = self.inner.lock().await;
        for slot in slots {
            let key = (slot.doctor_id, slot.workplace_id, slot.date, slot.start_time);
            if inner.slot_cache.contains_key(&key) {
                continue;
            }
            let appointment_id = inner
                .active_slots
                .get(&(slot.doctor_id, slot.date, slot.start_time))
                .copied();
            inner.slot_cache.insert(
                key,
                MaterializedSlot {
                    slot,
                    is_available: appointment_id.is_none(),
                    appointment_id,
                },
            );
        }
    }

    pub async fn cached_slots(&self, doctor_id: Uuid, workplace_id: Uuid, date: NaiveDate) -> Vec<MaterializedSlot> {
        let inner = self.inner.lock().await;
        let mut rows: Vec<MaterializedSlot> = inner
            .slot_cache
            .iter()
            .filter(|((d, w, day, _), _)| *d == doctor_id && *w == workplace_id && *day == date)
            .map(|(_, row)| row.clone())
            .collect();
        rows.sort_by_key(|row| row.slot.start_time);
        rows
    }
}

#[async_trait]
impl AppointmentStore for InMemoryAppointmentStore {
    async fn find_active_appointments(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<Appointment>, StoreError> {
        let inner = self.inner.lock().await;
        let mut found: Vec<Appointment> = inner
            .appointments
            .values()
            .filter(|a| a.doctor_id == doctor_id && a.date == date && a.occupies_slot())
            .cloned()
            .collect();
        found.sort_by_key(|a| a.time);
        Ok(found)
    }

    async fn insert_if_absent(&self, new: NewAppointment) -> Result<Appointment, StoreError> {
        let mut inner = self.inner.lock().await;

        let key = (new.doctor_id, new.date, new.time);
        if new.status.is_active() && inner.active_slots.contains_key(&key) {
            debug!("Slot {} {} already held for doctor {}", new.date, new.time, new.doctor_id);
            return Err(StoreError::ConstraintViolation);
        }

        let now = Utc::now();
        let appointment = Appointment {
            id: Uuid::new_v4(),
            doctor_id: new.doctor_id,
            patient_id: new.patient_id,
            workplace_id: new.workplace_id,
            date: new.date,
            time: new.time,
            status: new.status,
            notes: new.notes,
            cancellation_reason: None,
            created_at: now,
            updated_at: now,
        };

        if appointment.occupies_slot() {
            inner.active_slots.insert(key, appointment.id);
            inner.mark_cached_slot(&appointment, true);
        }
        inner.appointments.insert(appointment.id, appointment.clone());

        Ok(appointment)
    }

    async fn get_appointment(&self, appointment_id: Uuid) -> Result<Option<Appointment>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.appointments.get(&appointment_id).cloned())
    }

    async fn transition_status(
        &self,
        appointment_id: Uuid,
        from: AppointmentStatus,
        to: AppointmentStatus,
        reason: Option<String>,
    ) -> Result<Option<Appointment>, StoreError> {
        let mut inner = self.inner.lock().await;

        let Some(appointment) = inner.appointments.get_mut(&appointment_id) else {
            return Ok(None);
        };
        if appointment.status != from {
            return Ok(None);
        }

        appointment.status = to;
        appointment.updated_at = Utc::now();
        if to == AppointmentStatus::Cancelled {
            appointment.cancellation_reason = reason;
        }
        let updated = appointment.clone();

        if from.is_active() && !to.is_active() {
            let key = (updated.doctor_id, updated.date, updated.time);
            if inner.active_slots.get(&key) == Some(&updated.id) {
                inner.active_slots.remove(&key);
            }
            inner.mark_cached_slot(&updated, false);
        }

        Ok(Some(updated))
    }

    async fn materialize_slots(&self, slots: Vec<Slot>) -> Result<(), StoreError> {
        self.warm_slot_cache(slots).await;
        Ok(())
    }

    async fn find_patient_appointments(&self, patient_id: Uuid) -> Result<Vec<Appointment>, StoreError> {
        let inner = self.inner.lock().await;
        let mut found: Vec<Appointment> = inner
            .appointments
            .values()
            .filter(|a| a.patient_id == patient_id)
            .cloned()
            .collect();
        found.sort_by_key(|a| (a.date, a.time));
        Ok(found)
    }
}
