// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Parsing and range rules for the scalar cells of a job row.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Parses a calendar date cell.
///
/// Accepts `YYYY-MM-DD`, spreadsheet datetime exports whose time part is
/// discarded (`2026-03-01 00:00:00`, `2026-03-01T00:00:00`), and `DD/MM/YYYY`.
///
/// # Errors
///
/// Returns `DomainError::DateParse` if none of the accepted formats match.
pub fn parse_date(value: &str) -> Result<NaiveDate, DomainError> {
    let trimmed: &str = value.trim();
    let date_part: &str = trimmed
        .split(|c: char| c == 'T' || c == ' ')
        .next()
        .unwrap_or(trimmed);

    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(date_part, "%d/%m/%Y"))
        .map_err(|_| DomainError::DateParse {
            value: trimmed.to_string(),
        })
}

/// Parses an hour or minute cell.
///
/// Whole numbers exported by spreadsheets as floats (`9.0`) are accepted.
/// Range checking is left to [`validate_time_window`].
///
/// # Errors
///
/// Returns `DomainError::TimeParse` if the cell is not a whole number.
pub fn parse_time_component(value: &str) -> Result<i64, DomainError> {
    let trimmed: &str = value.trim();
    let integral: &str = match trimmed.split_once('.') {
        Some((whole, fraction)) if fraction.chars().all(|c| c == '0') => whole,
        _ => trimmed,
    };

    integral.parse::<i64>().map_err(|_| DomainError::TimeParse {
        value: trimmed.to_string(),
    })
}

/// Parses a yes/no cell.
///
/// # Errors
///
/// Returns `DomainError::FlagParse` for anything but the usual spellings.
pub fn parse_flag(value: &str) -> Result<bool, DomainError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Ok(true),
        "false" | "no" | "n" | "0" => Ok(false),
        _ => Err(DomainError::FlagParse {
            value: value.trim().to_string(),
        }),
    }
}

/// A wall-clock time of day with minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClockTime {
    hour: u8,
    minute: u8,
}

impl ClockTime {
    /// Creates a time of day, or `None` when either component is out of range.
    #[must_use]
    pub fn new(hour: i64, minute: i64) -> Option<Self> {
        let hour: u8 = u8::try_from(hour).ok().filter(|h| *h <= 23)?;
        let minute: u8 = u8::try_from(minute).ok().filter(|m| *m <= 59)?;
        Some(Self { hour, minute })
    }

    /// Returns the hour (0-23).
    #[must_use]
    pub const fn hour(&self) -> u8 {
        self.hour
    }

    /// Returns the minute (0-59).
    #[must_use]
    pub const fn minute(&self) -> u8 {
        self.minute
    }
}

impl std::fmt::Display for ClockTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// The daily working window of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: ClockTime,
    pub end: ClockTime,
}

/// Validates the four time components of a row.
///
/// Every component is range checked before the ordering rule is applied,
/// so a row with two bad cells reports both.
///
/// # Errors
///
/// Returns every violated rule:
/// - hours outside 0-23
/// - minutes outside 0-59
/// - an end time that is not strictly after the start time
pub fn validate_time_window(
    (hour_start, minute_start): (i64, i64),
    (hour_end, minute_end): (i64, i64),
) -> Result<TimeWindow, Vec<DomainError>> {
    let mut errors: Vec<DomainError> = Vec::new();

    for (field, value) in [("hour_start", hour_start), ("hour_end", hour_end)] {
        if !(0..=23).contains(&value) {
            errors.push(DomainError::HourOutOfRange { field, value });
        }
    }
    for (field, value) in [("minute_start", minute_start), ("minute_end", minute_end)] {
        if !(0..=59).contains(&value) {
            errors.push(DomainError::MinuteOutOfRange { field, value });
        }
    }

    let (Some(start), Some(end)) = (
        ClockTime::new(hour_start, minute_start),
        ClockTime::new(hour_end, minute_end),
    ) else {
        return Err(errors);
    };

    if end <= start {
        errors.push(DomainError::EndNotAfterStart {
            start: start.to_string(),
            end: end.to_string(),
        });
        return Err(errors);
    }

    Ok(TimeWindow { start, end })
}
