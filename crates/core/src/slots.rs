//! # Office-hour slots
//!
//! Professors publish a weekly schedule: for each day of the week an opening
//! time, a closing time, a slot interval and how many students may book the
//! same slot. This module turns that schedule into concrete `HH:MM` slots and
//! decides which of them can still be booked.
//!
//! Everything here is pure. Callers load the schedule and the reservation
//! counts from the database and pass them in.

use std::collections::{BTreeMap, HashMap};
use std::iter::FusedIterator;

use chrono::{Datelike, Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::errors::{NestError, NestResult};

/// Day names in the order used by the booking pages (`Date::getDay` order).
pub const DAYS_OF_WEEK: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

const TIME_FORMAT: &str = "%H:%M";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Weekly schedule keyed by day name.
pub type WeeklySchedule = BTreeMap<String, DaySchedule>;

fn default_interval() -> u32 {
    30
}

fn default_max_capacity() -> u32 {
    1
}

/// Opening hours of a single weekday.
///
/// A day is open only when both `start` and `end` are set to a non-empty
/// value; the booking pages send empty strings for closed days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySchedule {
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default = "default_interval")]
    pub interval: u32,
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u32,
}

impl Default for DaySchedule {
    fn default() -> Self {
        Self {
            start: None,
            end: None,
            interval: default_interval(),
            max_capacity: default_max_capacity(),
        }
    }
}

impl DaySchedule {
    /// Returns the opening and closing time when the day is open.
    pub fn open_hours(&self) -> Option<(&str, &str)> {
        let start = self.start.as_deref().filter(|s| !s.is_empty())?;
        let end = self.end.as_deref().filter(|s| !s.is_empty())?;
        Some((start, end))
    }

    /// All slots of the day, ignoring reservations and blocked times.
    pub fn slots(&self) -> NestResult<Vec<String>> {
        match self.open_hours() {
            Some((start, end)) => Ok(generate_slots(start, end, self.interval)?.collect()),
            None => Ok(Vec::new()),
        }
    }

    /// Capacity used by the booking policy. Zero is treated as one.
    pub fn capacity(&self) -> i64 {
        i64::from(self.max_capacity.max(1))
    }
}

/// A single day+time pair a professor blocked out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnavailableTime {
    pub day: String,
    pub time: String,
}

/// Parses an `HH:MM` time of day.
pub fn parse_time(value: &str) -> NestResult<NaiveTime> {
    NaiveTime::parse_from_str(value, TIME_FORMAT).map_err(|_| {
        NestError::InvalidArgument(format!("Invalid time '{}', expected HH:MM", value))
    })
}

/// Parses a time of day and renders it zero-padded, so `9:05` becomes `09:05`.
pub fn normalize_time(value: &str) -> NestResult<String> {
    Ok(parse_time(value)?.format(TIME_FORMAT).to_string())
}

/// Ordered `HH:MM` slots between two times of day.
///
/// Produced by [`generate_slots`]. The iterator is consumed as it is read and
/// cannot be restarted; generate a new one to walk the slots again.
#[derive(Debug)]
pub struct SlotIter {
    cursor: Option<NaiveTime>,
    end: NaiveTime,
    step: Duration,
}

impl Iterator for SlotIter {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.cursor.filter(|time| *time < self.end)?;
        let (following, wrapped_seconds) = current.overflowing_add_signed(self.step);
        // Stepping past midnight ends the day.
        self.cursor = (wrapped_seconds == 0).then_some(following);
        Some(current.format(TIME_FORMAT).to_string())
    }
}

impl FusedIterator for SlotIter {}

/// Generates the slots from `start` (inclusive) to `end` (exclusive), stepping
/// by `interval_minutes`.
///
/// # Errors
///
/// * `NestError::InvalidArgument` - `start` or `end` is not a valid `HH:MM`
///   time, or the interval is zero
pub fn generate_slots(start: &str, end: &str, interval_minutes: u32) -> NestResult<SlotIter> {
    let start = parse_time(start)?;
    let end = parse_time(end)?;

    if interval_minutes == 0 {
        return Err(NestError::InvalidArgument(
            "Slot interval must be at least one minute".to_string(),
        ));
    }

    Ok(SlotIter {
        cursor: Some(start),
        end,
        step: Duration::minutes(i64::from(interval_minutes)),
    })
}

fn is_unavailable(unavailable: &[UnavailableTime], day: &str, time: &str) -> bool {
    unavailable
        .iter()
        .any(|slot| slot.day == day && slot.time == time)
}

/// Slots of `day` that can still be booked.
///
/// `booked` maps a slot time to the number of reservations already made for
/// that day and time. A slot is dropped when it is blocked in `unavailable` or
/// when its reservation count reached the day's capacity. Closed or unknown
/// days have no slots.
pub fn bookable_slots(
    weekly: &WeeklySchedule,
    day: &str,
    unavailable: &[UnavailableTime],
    booked: &HashMap<String, i64>,
) -> NestResult<Vec<String>> {
    let Some(schedule) = weekly.get(day) else {
        return Ok(Vec::new());
    };
    let capacity = schedule.capacity();

    Ok(schedule
        .slots()?
        .into_iter()
        .filter(|time| !is_unavailable(unavailable, day, time))
        .filter(|time| booked.get(time).copied().unwrap_or(0) < capacity)
        .collect())
}

/// Checks that a reservation for `day` at `time` is allowed given
/// `booked_count` existing reservations for that day and time.
///
/// # Errors
///
/// * `NestError::InvalidArgument` - `time` is not a valid `HH:MM` time
/// * `NestError::Validation` - the day is closed, the time is not one of the
///   day's slots, or the time is blocked
/// * `NestError::Conflict` - the slot is fully booked
pub fn check_bookable(
    weekly: &WeeklySchedule,
    day: &str,
    time: &str,
    unavailable: &[UnavailableTime],
    booked_count: i64,
) -> NestResult<()> {
    parse_time(time)?;

    let schedule = weekly
        .get(day)
        .filter(|schedule| schedule.open_hours().is_some())
        .ok_or_else(|| NestError::Validation("Invalid reservation time.".to_string()))?;

    if !schedule.slots()?.iter().any(|slot| slot == time) {
        return Err(NestError::Validation("Invalid reservation time.".to_string()));
    }

    if is_unavailable(unavailable, day, time) {
        return Err(NestError::Validation(
            "The selected time is unavailable.".to_string(),
        ));
    }

    if booked_count >= schedule.capacity() {
        return Err(NestError::Conflict(
            "The selected time is fully booked.".to_string(),
        ));
    }

    Ok(())
}

fn check_day_name(day: &str) -> NestResult<()> {
    if DAYS_OF_WEEK.contains(&day) {
        Ok(())
    } else {
        Err(NestError::Validation(format!("Unknown day of week '{}'", day)))
    }
}

/// Validates a weekly schedule before it is stored.
pub fn validate_weekly_schedule(weekly: &WeeklySchedule) -> NestResult<()> {
    for (day, schedule) in weekly {
        check_day_name(day)?;

        for time in [&schedule.start, &schedule.end].into_iter().flatten() {
            if !time.is_empty() {
                parse_time(time)?;
            }
        }

        if schedule.interval == 0 {
            return Err(NestError::InvalidArgument(format!(
                "Slot interval for {} must be at least one minute",
                day
            )));
        }

        if schedule.max_capacity == 0 {
            return Err(NestError::Validation(format!(
                "Capacity for {} must be at least one",
                day
            )));
        }
    }

    Ok(())
}

/// Validates blocked-out times before they are stored.
pub fn validate_unavailable_times(unavailable: &[UnavailableTime]) -> NestResult<()> {
    for slot in unavailable {
        check_day_name(&slot.day)?;
        parse_time(&slot.time)?;
    }
    Ok(())
}

/// Day name (`"Monday"`, ...) of a `YYYY-MM-DD` date.
pub fn weekday_name(date: &str) -> NestResult<&'static str> {
    let date = NaiveDate::parse_from_str(date, DATE_FORMAT).map_err(|_| {
        NestError::InvalidArgument(format!("Invalid date '{}', expected YYYY-MM-DD", date))
    })?;

    Ok(DAYS_OF_WEEK[date.weekday().num_days_from_sunday() as usize])
}
