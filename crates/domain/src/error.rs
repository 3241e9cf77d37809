// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chrono::NaiveDate;

use crate::issue::IssueCode;

/// Errors raised while parsing the scalar fields of a job row.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// A calendar date could not be parsed.
    #[error("Failed to parse date '{value}': expected YYYY-MM-DD")]
    DateParse {
        /// The rejected text.
        value: String,
    },
    /// An hour or minute value was not a whole number.
    #[error("Failed to parse time component '{value}': expected a whole number")]
    TimeParse {
        /// The rejected text.
        value: String,
    },
    /// A boolean flag column held something other than yes/no.
    #[error("Failed to parse flag '{value}': expected true or false")]
    FlagParse {
        /// The rejected text.
        value: String,
    },
    /// An hour component is outside 0-23.
    #[error("{field} {value} out of range")]
    HourOutOfRange {
        /// The column name.
        field: &'static str,
        /// The rejected value.
        value: i64,
    },
    /// A minute component is outside 0-59.
    #[error("{field} {value} out of range")]
    MinuteOutOfRange {
        /// The column name.
        field: &'static str,
        /// The rejected value.
        value: i64,
    },
    /// The end of the working window is not after its start.
    #[error("End time ({end}) must be after start ({start})")]
    EndNotAfterStart {
        /// Formatted start time.
        start: String,
        /// Formatted end time.
        end: String,
    },
    /// The configured reference time zone is not a known IANA zone.
    #[error("Unknown time zone '{0}'")]
    InvalidTimezone(String),
}

impl DomainError {
    /// Returns the stable issue code reported for this failure.
    #[must_use]
    pub const fn code(&self) -> IssueCode {
        match self {
            Self::DateParse { .. } | Self::InvalidTimezone(_) => IssueCode::InvalidDate,
            Self::TimeParse { .. } => IssueCode::InvalidTime,
            Self::FlagParse { .. } => IssueCode::InvalidNotificationFlag,
            Self::HourOutOfRange { .. } => IssueCode::InvalidHour,
            Self::MinuteOutOfRange { .. } => IssueCode::InvalidMinute,
            Self::EndNotAfterStart { .. } => IssueCode::InvalidTimeRange,
        }
    }
}

/// Row-local failures of the recurrence engine.
///
/// None of these abort a batch; the row validator turns each one into an
/// `ERROR` issue for the offending row.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecurrenceError {
    /// The recurrence type is not one of the recognised tokens.
    #[error("recurrence_type '{0}' is invalid")]
    InvalidType(String),
    /// A recurring job has no end date.
    #[error("recurrence_end_date required for recurring jobs")]
    MissingEndDate,
    /// The end date could not be parsed.
    #[error("Invalid recurrence_end_date '{0}'")]
    InvalidEndDate(String),
    /// The end date is not strictly after the first occurrence.
    #[error("recurrence_end_date {end} must be after date_start {start}")]
    EndDateBeforeStart {
        /// The requested end date.
        end: NaiveDate,
        /// The first occurrence.
        start: NaiveDate,
    },
    /// One or more day tokens are not weekday abbreviations.
    #[error("Invalid day(s): {}", .0.join(", "))]
    InvalidDayTokens(Vec<String>),
    /// The interval is not a positive whole number.
    #[error("recurrence_interval '{0}' must be a positive integer")]
    InvalidInterval(String),
    /// A biweekly rule was given an interval other than 1 or 2.
    #[error("recurrence_interval {0} conflicts with biweekly, which always repeats every 2 weeks")]
    BiweeklyIntervalConflict(u32),
    /// A weekdays rule was given an interval other than 1.
    #[error("recurrence_interval {0} is not supported for weekdays, which repeat every weekday")]
    WeekdaysIntervalConflict(u32),
    /// The monthly mode is neither `date` nor `weekday`.
    #[error("recurrence_monthly_mode '{0}' is invalid")]
    InvalidMonthlyMode(String),
}

impl RecurrenceError {
    /// Returns the stable issue code reported for this failure.
    #[must_use]
    pub const fn code(&self) -> IssueCode {
        match self {
            Self::InvalidType(_) => IssueCode::InvalidRecurrenceType,
            Self::MissingEndDate => IssueCode::MissingEndDate,
            Self::InvalidEndDate(_) => IssueCode::InvalidEndDate,
            Self::EndDateBeforeStart { .. } => IssueCode::EndDateBeforeStart,
            Self::InvalidDayTokens(_) => IssueCode::InvalidDayToken,
            Self::InvalidInterval(_)
            | Self::BiweeklyIntervalConflict(_)
            | Self::WeekdaysIntervalConflict(_) => IssueCode::InvalidInterval,
            Self::InvalidMonthlyMode(_) => IssueCode::InvalidMonthlyMode,
        }
    }

    /// Returns a short fix-it hint for the report.
    #[must_use]
    pub const fn suggestion(&self) -> &'static str {
        match self {
            Self::InvalidType(_) => {
                "Use one of: daily, weekdays, weekly, biweekly, monthly, or leave empty for one-off"
            }
            Self::MissingEndDate => {
                "Provide end date (YYYY-MM-DD) or set recurrence_type to 'none'"
            }
            Self::InvalidEndDate(_) => "Use YYYY-MM-DD format",
            Self::EndDateBeforeStart { .. } => "Set end date > start date",
            Self::InvalidDayTokens(_) => "Use: Mon, Tue, Wed, Thu, Fri, Sat, Sun (comma-separated)",
            Self::InvalidInterval(_) => "Use positive integer (1, 2, 3, etc.)",
            Self::BiweeklyIntervalConflict(_) => {
                "Leave recurrence_interval empty for biweekly, or use weekly with the interval"
            }
            Self::WeekdaysIntervalConflict(_) => {
                "Leave recurrence_interval empty for weekdays, or use weekly with explicit days"
            }
            Self::InvalidMonthlyMode(_) => "Use 'date' or 'weekday'",
        }
    }
}
