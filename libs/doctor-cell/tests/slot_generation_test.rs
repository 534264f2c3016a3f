// libs/doctor-cell/tests/slot_generation_test.rs

use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Weekday};
use uuid::Uuid;

use doctor_cell::models::{DayOfWeek, TimeWindow, WorkingHoursConfig};
use doctor_cell::services::generate_slots;
use shared_utils::test_utils::next_weekday;

fn at(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
}

fn weekday_config(start: NaiveTime, end: NaiveTime, duration: u32) -> WorkingHoursConfig {
    let mut config = WorkingHoursConfig::new(Uuid::new_v4(), Uuid::new_v4(), duration);
    for day in [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
    ] {
        config = config.with_window(day, TimeWindow::new(start, end));
    }
    config
}

#[test]
fn full_day_grid_has_sixteen_half_hour_slots() {
    let config = weekday_config(at(9, 0), at(17, 0), 30);
    let date = next_weekday(base_date(), Weekday::Tue);

    let slots: Vec<_> = generate_slots(&config, date).collect();

    assert_eq!(slots.len(), 16);
    assert_eq!((slots[0].start_time, slots[0].end_time), (at(9, 0), at(9, 30)));
    assert_eq!((slots[15].start_time, slots[15].end_time), (at(16, 30), at(17, 0)));
    assert!(slots.iter().all(|slot| slot.end_time <= at(17, 0)));
    assert!(slots.iter().all(|slot| slot.date == date));
}

#[test]
fn slots_partition_the_window_without_overlap() {
    let config = weekday_config(at(8, 15), at(12, 45), 15);
    let date = next_weekday(base_date(), Weekday::Mon);

    let slots: Vec<_> = generate_slots(&config, date).collect();

    assert_eq!(slots.first().map(|s| s.start_time), Some(at(8, 15)));
    assert_eq!(slots.last().map(|s| s.end_time), Some(at(12, 45)));
    for pair in slots.windows(2) {
        assert_eq!(pair[0].end_time, pair[1].start_time);
    }
}

#[test]
fn partial_trailing_step_is_dropped() {
    let config = weekday_config(at(9, 0), at(9, 50), 30);
    let date = next_weekday(base_date(), Weekday::Wed);

    let slots: Vec<_> = generate_slots(&config, date).collect();

    assert_eq!(slots.len(), 1);
    assert_eq!((slots[0].start_time, slots[0].end_time), (at(9, 0), at(9, 30)));
}

#[test]
fn days_without_a_window_yield_nothing() {
    let config = weekday_config(at(9, 0), at(17, 0), 30);

    let mut sunday = next_weekday(base_date(), Weekday::Sun);
    for _ in 0..8 {
        assert_eq!(sunday.weekday(), Weekday::Sun);
        assert_eq!(generate_slots(&config, sunday).count(), 0);
        sunday += Duration::days(7);
    }
}

#[test]
fn explicit_null_window_counts_as_day_off() {
    let mut config = weekday_config(at(9, 0), at(17, 0), 30);
    config.days.insert(DayOfWeek::Friday, None);

    let friday = next_weekday(base_date(), Weekday::Fri);
    assert_eq!(generate_slots(&config, friday).count(), 0);
}

#[test]
fn regeneration_is_byte_for_byte_identical() {
    let config = weekday_config(at(9, 0), at(17, 0), 20);
    let date = next_weekday(base_date(), Weekday::Thu);

    let first = serde_json::to_vec(&generate_slots(&config, date).collect::<Vec<_>>()).unwrap();
    let second = serde_json::to_vec(&generate_slots(&config, date).collect::<Vec<_>>()).unwrap();
    assert_eq!(first, second);

    // A cloned iterator restarts from where it was cloned.
    let iter = generate_slots(&config, date);
    let restarted: Vec<_> = iter.clone().collect();
    assert_eq!(restarted, iter.collect::<Vec<_>>());
}

#[test]
fn slot_json_uses_wall_clock_times() {
    let config = weekday_config(at(9, 0), at(10, 0), 60);
    let date = next_weekday(base_date(), Weekday::Mon);

    let slot = generate_slots(&config, date).next().unwrap();
    let json = serde_json::to_value(&slot).unwrap();

    assert_eq!(json["start_time"], "09:00");
    assert_eq!(json["end_time"], "10:00");
    assert_eq!(json["date"], date.to_string());
}
