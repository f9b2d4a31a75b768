// =====================================================================================
// SLOT COMPUTATION
// =====================================================================================
//
// Slots are keyed by clinic-local date (`D_M_YYYY`, no zero padding) and
// 12-hour time (`hh:mm AM`). Availability is derived from the booked set
// passed in; nothing here touches the store.

use std::collections::{BTreeSet, HashMap};

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::Serialize;
use thiserror::Error;

use shared_models::error::AppError;

pub const OPENING_MINUTE: u32 = 10 * 60;
pub const CLOSING_MINUTE: u32 = 21 * 60;
pub const SLOT_MINUTES: u32 = 30;
pub const BOOKING_WINDOW_DAYS: i64 = 7;

const SLOT_TIME_FORMAT: &str = "%I:%M %p";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SlotError {
    #[error("Invalid slot date '{0}', expected D_M_YYYY")]
    InvalidDate(String),

    #[error("Invalid slot time '{0}', expected hh:mm AM/PM")]
    InvalidTime(String),

    #[error("Slot time '{0}' is outside consultation hours")]
    OutsideHours(String),
}

impl From<SlotError> for AppError {
    fn from(err: SlotError) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

pub fn format_slot_date(date: NaiveDate) -> String {
    format!("{}_{}_{}", date.day(), date.month(), date.year())
}

/// Only the canonical unpadded form is accepted, so each date has exactly one key.
pub fn parse_slot_date(value: &str) -> Result<NaiveDate, SlotError> {
    let invalid = || SlotError::InvalidDate(value.to_string());

    let mut parts = value.split('_');
    let (Some(day), Some(month), Some(year), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid());
    };

    let date = NaiveDate::from_ymd_opt(
        year.parse().map_err(|_| invalid())?,
        month.parse().map_err(|_| invalid())?,
        day.parse().map_err(|_| invalid())?,
    )
    .ok_or_else(invalid)?;

    if format_slot_date(date) != value {
        return Err(invalid());
    }
    Ok(date)
}

pub fn format_slot_time(time: NaiveTime) -> String {
    time.format(SLOT_TIME_FORMAT).to_string()
}

pub fn parse_slot_time(value: &str) -> Result<NaiveTime, SlotError> {
    let time = NaiveTime::parse_from_str(value, SLOT_TIME_FORMAT)
        .map_err(|_| SlotError::InvalidTime(value.to_string()))?;

    if format_slot_time(time) != value {
        return Err(SlotError::InvalidTime(value.to_string()));
    }
    Ok(time)
}

/// On the half-hour grid and inside consultation hours.
pub fn is_bookable_time(time: NaiveTime) -> bool {
    let minute_of_day = time.hour() * 60 + time.minute();
    time.second() == 0
        && time.nanosecond() == 0
        && minute_of_day % SLOT_MINUTES == 0
        && (OPENING_MINUTE..CLOSING_MINUTE).contains(&minute_of_day)
}

/// Parses and checks a `(slot_date, slot_time)` pair a client wants to book.
pub fn validate_slot(slot_date: &str, slot_time: &str) -> Result<NaiveDateTime, SlotError> {
    let date = parse_slot_date(slot_date)?;
    let time = parse_slot_time(slot_time)?;
    if !is_bookable_time(time) {
        return Err(SlotError::OutsideHours(slot_time.to_string()));
    }
    Ok(date.and_time(time))
}

fn time_at_minute(minute_of_day: u32) -> Option<NaiveTime> {
    NaiveTime::from_num_seconds_from_midnight_opt(minute_of_day * 60, 0)
}

/// Times already taken per date, derived from non-cancelled appointments.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct BookedSlots(HashMap<String, BTreeSet<String>>);

impl BookedSlots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, slot_date: impl Into<String>, slot_time: impl Into<String>) {
        self.0
            .entry(slot_date.into())
            .or_default()
            .insert(slot_time.into());
    }

    pub fn contains(&self, slot_date: &str, slot_time: &str) -> bool {
        self.0
            .get(slot_date)
            .is_some_and(|times| times.contains(slot_time))
    }

    pub fn times_on(&self, slot_date: &str) -> BTreeSet<String> {
        self.0.get(slot_date).cloned().unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(BTreeSet::is_empty)
    }
}

impl<D: Into<String>, T: Into<String>> FromIterator<(D, T)> for BookedSlots {
    fn from_iter<I: IntoIterator<Item = (D, T)>>(iter: I) -> Self {
        let mut booked = BookedSlots::new();
        for (date, time) in iter {
            booked.insert(date, time);
        }
        booked
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slot {
    pub slot_date: String,
    pub slot_time: String,
    pub datetime: NaiveDateTime,
}

/// Free slots of one day, produced on demand. Once exhausted it stays exhausted.
#[derive(Debug, Clone)]
pub struct DaySlots {
    slot_date: String,
    date: NaiveDate,
    next_minute: u32,
    booked: BTreeSet<String>,
}

impl DaySlots {
    fn new(date: NaiveDate, first_minute: u32, booked: &BookedSlots) -> Self {
        let slot_date = format_slot_date(date);
        let booked = booked.times_on(&slot_date);
        Self {
            slot_date,
            date,
            next_minute: first_minute,
            booked,
        }
    }

    pub fn slot_date(&self) -> &str {
        &self.slot_date
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Iterator for DaySlots {
    type Item = Slot;

    fn next(&mut self) -> Option<Slot> {
        while self.next_minute < CLOSING_MINUTE {
            let minute = self.next_minute;
            self.next_minute += SLOT_MINUTES;

            let Some(time) = time_at_minute(minute) else {
                continue;
            };
            let slot_time = format_slot_time(time);
            if self.booked.contains(&slot_time) {
                continue;
            }
            return Some(Slot {
                slot_date: self.slot_date.clone(),
                slot_time,
                datetime: self.date.and_time(time),
            });
        }
        None
    }
}

/// Today's first offerable minute: the next half-hour strictly after `now`,
/// never before opening.
fn first_minute_today(now: NaiveDateTime) -> u32 {
    let current = now.hour() * 60 + now.minute();
    let next_boundary = (current / SLOT_MINUTES + 1) * SLOT_MINUTES;
    next_boundary.max(OPENING_MINUTE)
}

/// One bucket per day for today and the following six days. Buckets can be
/// empty but are always present.
pub fn upcoming_slots(booked: &BookedSlots, now: NaiveDateTime) -> Vec<DaySlots> {
    let today = now.date();

    (0..BOOKING_WINDOW_DAYS)
        .map(|offset| {
            let date = today + Duration::days(offset);
            let first_minute = if offset == 0 {
                first_minute_today(now)
            } else {
                OPENING_MINUTE
            };
            DaySlots::new(date, first_minute, booked)
        })
        .collect()
}
