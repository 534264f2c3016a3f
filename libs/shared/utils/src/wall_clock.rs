//! Minute-granularity civil times rendered as `HH:MM`.
//!
//! Working hours and appointment times carry no timezone offset and no
//! seconds. Parsing also accepts `HH:MM:SS` because Postgres `time` columns
//! come back that way, but a non-zero seconds component is rejected.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serializer};

pub const FORMAT: &str = "%H:%M";

pub fn parse(raw: &str) -> Result<NaiveTime, String> {
    let raw = raw.trim();
    let time = NaiveTime::parse_from_str(raw, FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|_| format!("invalid time {:?}, expected HH:MM", raw))?;

    if time.second() != 0 || time.nanosecond() != 0 {
        return Err(format!("time {:?} must not carry seconds", raw));
    }

    Ok(time)
}

pub fn format(time: &NaiveTime) -> String {
    time.format(FORMAT).to_string()
}

/// Minutes elapsed since midnight.
pub fn minutes_of_day(time: &NaiveTime) -> u32 {
    time.num_seconds_from_midnight() / 60
}

pub fn from_minutes_of_day(minutes: u32) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0)
}

pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format(time))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).map_err(serde::de::Error::custom)
}
