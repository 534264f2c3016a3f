use chrono::{Datelike, NaiveDate, NaiveTime};
use regex::Regex;

/// Free-text replies a patient can send during a chat flow.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatInput {
    Abort,
    All,
    Choice(usize),
    Date(NaiveDate),
    Time(NaiveTime),
    Unrecognized,
}

pub struct InputParser {
    day_month: Regex,
    hour_minute: Regex,
    choice: Regex,
}

impl InputParser {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            day_month: Regex::new(r"^(\d{1,2})/(\d{1,2})$")?,
            hour_minute: Regex::new(r"^([01]?\d|2[0-3]):([0-5]\d)$")?,
            choice: Regex::new(r"^\d{1,3}$")?,
        })
    }

    /// `DD/MM` in the year of `today`. Impossible dates such as 31/02 yield `None`.
    pub fn parse_date(&self, input: &str, today: NaiveDate) -> Option<NaiveDate> {
        let caps = self.day_month.captures(input.trim())?;
        let day: u32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        NaiveDate::from_ymd_opt(today.year(), month, day)
    }

    pub fn parse_time(&self, input: &str) -> Option<NaiveTime> {
        let caps = self.hour_minute.captures(input.trim())?;
        let hour: u32 = caps[1].parse().ok()?;
        let minute: u32 = caps[2].parse().ok()?;
        NaiveTime::from_hms_opt(hour, minute, 0)
    }

    pub fn parse_choice(&self, input: &str) -> Option<usize> {
        let trimmed = input.trim();
        if self.choice.is_match(trimmed) {
            trimmed.parse().ok()
        } else {
            None
        }
    }

    pub fn classify(&self, input: &str, today: NaiveDate) -> ChatInput {
        let trimmed = input.trim();
        if trimmed.eq_ignore_ascii_case("cancel") {
            return ChatInput::Abort;
        }
        if trimmed.eq_ignore_ascii_case("all") {
            return ChatInput::All;
        }
        if let Some(date) = self.parse_date(trimmed, today) {
            return ChatInput::Date(date);
        }
        if let Some(time) = self.parse_time(trimmed) {
            return ChatInput::Time(time);
        }
        if let Some(choice) = self.parse_choice(trimmed) {
            return ChatInput::Choice(choice);
        }
        ChatInput::Unrecognized
    }
}
