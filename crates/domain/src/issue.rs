// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Validation findings.
//!
//! Every check in the pipeline appends zero or more [`Issue`] values and
//! returns normally. A row is importable when none of its issues carries
//! [`Severity::Error`].

use serde::{Deserialize, Serialize};

/// Severity of a validation finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Blocks the row from import.
    Error,
    /// Reported, but the row stays importable.
    Warn,
    /// Marker for a row with nothing to report.
    Ok,
}

impl Severity {
    /// Converts this severity to its report representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "ERROR",
            Self::Warn => "WARN",
            Self::Ok => "OK",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Stable short identifier of a finding.
///
/// The serialized names are an external contract consumed by reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCode {
    MissingRequired,
    MalformedRow,
    InvalidDate,
    PastDate,
    InvalidDateRange,
    InvalidTime,
    InvalidHour,
    InvalidMinute,
    InvalidTimeRange,
    MissingSite,
    SiteNotFound,
    FloorNotInSite,
    SpaceNotInFloor,
    SpaceWithoutFloor,
    MissingOwner,
    OwnerNotFound,
    UnknownReference,
    FloorOutsideSite,
    SpaceOutsideFloor,
    InvalidRecurrenceType,
    MissingEndDate,
    InvalidEndDate,
    EndDateBeforeStart,
    InvalidDayToken,
    InvalidInterval,
    InvalidMonthlyMode,
    InvalidNotificationFlag,
    DuplicateLabels,
    DuplicateRow,
    Valid,
}

impl IssueCode {
    /// Converts this code to its report representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MissingRequired => "MISSING_REQUIRED",
            Self::MalformedRow => "MALFORMED_ROW",
            Self::InvalidDate => "INVALID_DATE",
            Self::PastDate => "PAST_DATE",
            Self::InvalidDateRange => "INVALID_DATE_RANGE",
            Self::InvalidTime => "INVALID_TIME",
            Self::InvalidHour => "INVALID_HOUR",
            Self::InvalidMinute => "INVALID_MINUTE",
            Self::InvalidTimeRange => "INVALID_TIME_RANGE",
            Self::MissingSite => "MISSING_SITE",
            Self::SiteNotFound => "SITE_NOT_FOUND",
            Self::FloorNotInSite => "FLOOR_NOT_IN_SITE",
            Self::SpaceNotInFloor => "SPACE_NOT_IN_FLOOR",
            Self::SpaceWithoutFloor => "SPACE_WITHOUT_FLOOR",
            Self::MissingOwner => "MISSING_OWNER",
            Self::OwnerNotFound => "OWNER_NOT_FOUND",
            Self::UnknownReference => "UNKNOWN_REFERENCE",
            Self::FloorOutsideSite => "FLOOR_OUTSIDE_SITE",
            Self::SpaceOutsideFloor => "SPACE_OUTSIDE_FLOOR",
            Self::InvalidRecurrenceType => "INVALID_RECURRENCE_TYPE",
            Self::MissingEndDate => "MISSING_END_DATE",
            Self::InvalidEndDate => "INVALID_END_DATE",
            Self::EndDateBeforeStart => "END_DATE_BEFORE_START",
            Self::InvalidDayToken => "INVALID_DAY_TOKEN",
            Self::InvalidInterval => "INVALID_INTERVAL",
            Self::InvalidMonthlyMode => "INVALID_MONTHLY_MODE",
            Self::InvalidNotificationFlag => "INVALID_NOTIFICATION_FLAG",
            Self::DuplicateLabels => "DUPLICATE_LABELS",
            Self::DuplicateRow => "DUPLICATE_ROW",
            Self::Valid => "VALID",
        }
    }
}

impl std::fmt::Display for IssueCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One validation finding for one row.
///
/// Field names follow the issue report columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// The spreadsheet row number the finding belongs to.
    pub row_number: usize,
    /// How severe the finding is.
    #[serde(rename = "status")]
    pub severity: Severity,
    /// Stable identifier of the finding.
    #[serde(rename = "issue_code")]
    pub code: IssueCode,
    /// Human-readable description.
    #[serde(rename = "issue_detail")]
    pub detail: String,
    /// Optional fix-it hint.
    pub suggestion: Option<String>,
}

impl Issue {
    /// Creates a new issue without a suggestion.
    #[must_use]
    pub fn new(row_number: usize, severity: Severity, code: IssueCode, detail: impl Into<String>) -> Self {
        Self {
            row_number,
            severity,
            code,
            detail: detail.into(),
            suggestion: None,
        }
    }

    /// Creates an `ERROR` issue.
    #[must_use]
    pub fn error(row_number: usize, code: IssueCode, detail: impl Into<String>) -> Self {
        Self::new(row_number, Severity::Error, code, detail)
    }

    /// Creates a `WARN` issue.
    #[must_use]
    pub fn warn(row_number: usize, code: IssueCode, detail: impl Into<String>) -> Self {
        Self::new(row_number, Severity::Warn, code, detail)
    }

    /// Creates the `OK` marker for a row with nothing to report.
    #[must_use]
    pub fn valid(row_number: usize) -> Self {
        Self::new(row_number, Severity::Ok, IssueCode::Valid, "Row is valid")
    }

    /// Attaches a suggestion.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Returns whether this issue blocks the row from import.
    #[must_use]
    pub fn is_blocking(&self) -> bool {
        self.severity == Severity::Error
    }
}
