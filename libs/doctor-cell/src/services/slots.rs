// libs/doctor-cell/src/services/slots.rs
//
// Slot grid generation. Pure: the same (config, date) always yields the same
// ordered sequence, and the iterator can be cloned to restart it.

use std::iter::FusedIterator;

use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

use shared_utils::wall_clock;

use crate::models::{Slot, WorkingHoursConfig};

/// Lazily walks a day's working window in `slot_duration_minutes` steps.
#[derive(Debug, Clone)]
pub struct SlotIter {
    doctor_id: Uuid,
    workplace_id: Uuid,
    date: NaiveDate,
    next_start: u32,
    window_end: u32,
    step: u32,
}

impl SlotIter {
    fn empty(config: &WorkingHoursConfig, date: NaiveDate) -> Self {
        Self {
            doctor_id: config.doctor_id,
            workplace_id: config.workplace_id,
            date,
            next_start: 0,
            window_end: 0,
            step: 0,
        }
    }

    /// True when `time` is the start of one of the remaining slots.
    pub fn contains_start(&self, time: NaiveTime) -> bool {
        self.clone().any(|slot| slot.start_time == time)
    }
}

impl Iterator for SlotIter {
    type Item = Slot;

    fn next(&mut self) -> Option<Slot> {
        if self.step == 0 {
            return None;
        }

        let slot_end = self.next_start.checked_add(self.step)?;
        if slot_end > self.window_end {
            return None;
        }

        let start_time = wall_clock::from_minutes_of_day(self.next_start)?;
        // A window ending at 23:59 keeps slot_end below one day.
        let end_time = wall_clock::from_minutes_of_day(slot_end)?;
        self.next_start = slot_end;

        Some(Slot {
            doctor_id: self.doctor_id,
            workplace_id: self.workplace_id,
            date: self.date,
            start_time,
            end_time,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.step == 0 || self.next_start >= self.window_end {
            0
        } else {
            ((self.window_end - self.next_start) / self.step) as usize
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SlotIter {}

impl FusedIterator for SlotIter {}

/// Slots for `date`, or an empty sequence when the doctor does not work that weekday.
pub fn generate_slots(config: &WorkingHoursConfig, date: NaiveDate) -> SlotIter {
    let Some(window) = config.window_on(date) else {
        return SlotIter::empty(config, date);
    };

    if window.start >= window.end {
        return SlotIter::empty(config, date);
    }

    SlotIter {
        doctor_id: config.doctor_id,
        workplace_id: config.workplace_id,
        date,
        next_start: wall_clock::minutes_of_day(&window.start),
        window_end: wall_clock::minutes_of_day(&window.end),
        step: config.slot_duration_minutes,
    }
}
