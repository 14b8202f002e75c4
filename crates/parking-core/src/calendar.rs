//! Calendar and time arithmetic
//!
//! Plain Gregorian dates with minute resolution. Dates are written
//! `DD-MM-YYYY` and times `HH:MM`. February 29 is a valid calendar date in
//! leap years but the lots are closed on it: no event may be registered on
//! that day and time spent across it is not billed.

use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::{ParkingError, ParkingResult};

pub const MINUTES_PER_HOUR: i64 = 60;
pub const MINUTES_PER_DAY: i64 = 24 * MINUTES_PER_HOUR;

/// Gregorian leap-year rule
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

pub fn days_in_month(year: i32, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}

/// Days since 1970-01-01 for a proleptic Gregorian date.
fn days_from_civil(year: i32, month: u8, day: u8) -> i64 {
    let month = i64::from(month);
    let year = i64::from(year) - i64::from(month <= 2);
    let era = if year >= 0 { year } else { year - 399 } / 400;
    let yoe = year - era * 400;
    let mp = (month + 9) % 12;
    let doy = (153 * mp + 2) / 5 + i64::from(day) - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

/// Inverse of [`days_from_civil`].
fn civil_from_days(days: i64) -> (i32, u8, u8) {
    let z = days + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year as i32, month as u8, day as u8)
}

/// Parses a field of ASCII digits whose length lies in `len`.
fn parse_digits(text: &str, len: std::ops::RangeInclusive<usize>) -> ParkingResult<u32> {
    if !len.contains(&text.len()) || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParkingError::InvalidDate);
    }
    text.parse().map_err(|_| ParkingError::InvalidDate)
}

/// Calendar date
///
/// Field order gives the derived ordering (year, month, day).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date {
    pub year: i32,
    pub month: u8,
    pub day: u8,
}

impl Date {
    /// Builds a date, rejecting days that do not exist in the calendar
    pub fn new(day: u8, month: u8, year: i32) -> ParkingResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(ParkingError::InvalidDate);
        }
        if day < 1 || day > days_in_month(year, month) {
            return Err(ParkingError::InvalidDate);
        }
        Ok(Self { year, month, day })
    }

    /// February 29, the closed day
    pub fn is_leap_day(&self) -> bool {
        self.month == 2 && self.day == 29
    }

    /// Days elapsed since 1970-01-01
    pub fn day_number(&self) -> i64 {
        days_from_civil(self.year, self.month, self.day)
    }
}

impl FromStr for Date {
    type Err = ParkingError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut parts = text.split('-');
        let (Some(day), Some(month), Some(year), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(ParkingError::InvalidDate);
        };

        let day = parse_digits(day, 1..=2)?;
        let month = parse_digits(month, 1..=2)?;
        let year = parse_digits(year, 4..=4)?;

        Date::new(day as u8, month as u8, year as i32)
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}-{:04}", self.day, self.month, self.year)
    }
}

impl Serialize for Date {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Time of day with minute resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Time {
    pub hour: u8,
    pub minute: u8,
}

impl Time {
    pub fn new(hour: u8, minute: u8) -> ParkingResult<Self> {
        if hour > 23 || minute > 59 {
            return Err(ParkingError::InvalidDate);
        }
        Ok(Self { hour, minute })
    }

    pub fn minute_of_day(&self) -> i64 {
        i64::from(self.hour) * MINUTES_PER_HOUR + i64::from(self.minute)
    }
}

impl FromStr for Time {
    type Err = ParkingError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let (hour, minute) = text.split_once(':').ok_or(ParkingError::InvalidDate)?;
        let hour = parse_digits(hour, 1..=2)?;
        let minute = parse_digits(minute, 2..=2)?;

        Time::new(hour as u8, minute as u8)
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl Serialize for Time {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A date and time of day
///
/// Ordered by date first, then time, which is the (year, month, day, hour,
/// minute) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct DateTime {
    pub date: Date,
    pub time: Time,
}

impl DateTime {
    pub fn new(date: Date, time: Time) -> Self {
        Self { date, time }
    }

    /// Parses `DD-MM-YYYY` and `HH:MM`, checking ranges and calendar validity
    pub fn parse(date_text: &str, time_text: &str) -> ParkingResult<Self> {
        let date: Date = date_text.parse()?;
        let time: Time = time_text.parse()?;
        Ok(Self { date, time })
    }

    /// Parses a timestamp for an entry or exit event.
    ///
    /// Same as [`DateTime::parse`] but also rejects the closed day.
    pub fn parse_event(date_text: &str, time_text: &str) -> ParkingResult<Self> {
        let stamp = Self::parse(date_text, time_text)?;
        if stamp.date.is_leap_day() {
            return Err(ParkingError::InvalidDate);
        }
        Ok(stamp)
    }

    /// Minutes elapsed since 1970-01-01 00:00
    pub fn minute_stamp(&self) -> i64 {
        self.date.day_number() * MINUTES_PER_DAY + self.time.minute_of_day()
    }

    /// Inverse of [`DateTime::minute_stamp`]
    pub fn from_minute_stamp(stamp: i64) -> Self {
        let (year, month, day) = civil_from_days(stamp.div_euclid(MINUTES_PER_DAY));
        let minute_of_day = stamp.rem_euclid(MINUTES_PER_DAY);
        Self {
            date: Date { year, month, day },
            time: Time {
                hour: (minute_of_day / MINUTES_PER_HOUR) as u8,
                minute: (minute_of_day % MINUTES_PER_HOUR) as u8,
            },
        }
    }

    pub fn add_minutes(&self, minutes: i64) -> Self {
        Self::from_minute_stamp(self.minute_stamp() + minutes)
    }

    pub fn compare(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }

    /// Whole minutes from `self` to `later`.
    ///
    /// Fails with `InvalidDate` when `later` is before `self`.
    pub fn minutes_until(&self, later: &Self) -> ParkingResult<i64> {
        if later < self {
            return Err(ParkingError::InvalidDate);
        }
        Ok(later.minute_stamp() - self.minute_stamp())
    }

    /// Minutes of `[self, later)` that fall on a February 29
    pub fn closed_minutes_until(&self, later: &Self) -> i64 {
        let start = self.minute_stamp();
        let end = later.minute_stamp();
        if end <= start {
            return 0;
        }

        (self.date.year..=later.date.year)
            .filter(|&year| is_leap_year(year))
            .map(|year| {
                let day_start = days_from_civil(year, 2, 29) * MINUTES_PER_DAY;
                let day_end = day_start + MINUTES_PER_DAY;
                (end.min(day_end) - start.max(day_start)).max(0)
            })
            .sum()
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date, self.time)
    }
}

/// Elapsed whole minutes between two timestamps, `b` not before `a`
pub fn minutes_between(a: &DateTime, b: &DateTime) -> ParkingResult<i64> {
    a.minutes_until(b)
}
