// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Per-row validation pipeline.
//!
//! Every check appends issues and returns normally, so a row reports all of
//! its problems in one pass. A row whose issues contain no `ERROR` yields a
//! [`ReadyJob`] carrying the parsed and resolved values the payload builder
//! needs.

use chrono::NaiveDate;
use roster_import_domain::{
    DomainError, Issue, IssueCode, JobRow, NormalizedRecurrence, ParsedLabels, RecurrenceError,
    RecurrenceType, ResolvedIds, ResolvedLocation, TimeWindow, check_recurrence, normalize,
    parse_date, parse_flag, parse_labels, parse_time_component, validate_time_window,
};

use crate::lookup::LookupIndex;
use crate::options::ValidationOptions;
use crate::resolve::{Resolution, resolve_location, resolve_owner};

/// A fully validated row, ready to be turned into a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadyJob {
    pub row_number: usize,
    pub title: String,
    pub description: Option<String>,
    pub date_start: NaiveDate,
    /// The row's end date for one-off jobs, the recurrence end date otherwise.
    pub date_end: NaiveDate,
    pub window: TimeWindow,
    pub location: ResolvedLocation,
    pub owner_id: String,
    /// Distinct labels in first-seen order.
    pub labels: Vec<String>,
    pub recurrence: NormalizedRecurrence,
    /// Row-level override of the notification email policy.
    pub notifications: Option<bool>,
}

/// Columns compared when looking for duplicate rows.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DuplicateKey {
    pub site_id: Option<String>,
    pub floor_id: Option<String>,
    pub space_id: Option<String>,
    pub title: String,
    pub date_start: Option<String>,
    pub hour_start: Option<String>,
    pub minute_start: Option<String>,
}

/// Everything the validator learned about one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowReport {
    pub row_number: usize,
    pub issues: Vec<Issue>,
    pub resolved: ResolvedIds,
    pub ready: Option<ReadyJob>,
    pub duplicate_key: Option<DuplicateKey>,
}

impl RowReport {
    /// Returns whether the row carries no `ERROR` issue.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready.is_some()
    }
}

/// Validates one row and returns its issues.
///
/// Uses the default [`ValidationOptions`].
#[must_use]
pub fn validate(row: &JobRow, index: &LookupIndex, today: NaiveDate) -> Vec<Issue> {
    validate_row(row, index, today, &ValidationOptions::default()).issues
}

/// Runs the full validation pipeline on one row.
///
/// # Arguments
///
/// * `row` - The row to validate
/// * `index` - The reference-data snapshot used for name resolution
/// * `today` - The civil date in the reference time zone
/// * `options` - Resolution settings
#[must_use]
pub fn validate_row(
    row: &JobRow,
    index: &LookupIndex,
    today: NaiveDate,
    options: &ValidationOptions,
) -> RowReport {
    let n: usize = row.row_number;
    let mut issues: Vec<Issue> = Vec::new();
    let recurring: bool = is_recurring(row);

    // Required fields
    let mut required: Vec<(&str, Option<&String>)> = vec![
        ("title_en", row.title.as_ref()),
        ("date_start", row.date_start.as_ref()),
        ("hour_start", row.hour_start.as_ref()),
        ("minute_start", row.minute_start.as_ref()),
        ("hour_end", row.hour_end.as_ref()),
        ("minute_end", row.minute_end.as_ref()),
    ];
    if !recurring {
        required.push(("date_end", row.date_end.as_ref()));
    }
    for (column, value) in required {
        if value.is_none() {
            issues.push(
                Issue::error(n, IssueCode::MissingRequired, format!("{column} is required"))
                    .with_suggestion(format!("Fill in {column}")),
            );
        }
    }

    // Dates
    let date_start: Option<NaiveDate> = row
        .date_start
        .as_deref()
        .and_then(|raw| parse_or_report(n, "date_start", parse_date(raw), &mut issues));
    if let Some(start) = date_start
        && start < today
    {
        issues.push(
            Issue::error(
                n,
                IssueCode::PastDate,
                format!("date_start {start} is before today ({today})"),
            )
            .with_suggestion("Use today or a future date"),
        );
    }

    let one_off_end: Option<NaiveDate> = if recurring {
        None
    } else {
        row.date_end
            .as_deref()
            .and_then(|raw| parse_or_report(n, "date_end", parse_date(raw), &mut issues))
    };
    if let (Some(start), Some(end)) = (date_start, one_off_end)
        && end < start
    {
        issues.push(
            Issue::error(
                n,
                IssueCode::InvalidDateRange,
                format!("date_end {end} is before date_start {start}"),
            )
            .with_suggestion("Set date_end on or after date_start"),
        );
    }

    // Times
    let window: Option<TimeWindow> = check_time_window(row, &mut issues);

    // Location
    let location: Resolution = resolve_location(&row.location, index, options);
    issues.extend(location.findings.iter().map(|f| f.to_issue(n)));

    // Recurrence; without a start date only the start-independent checks run
    let (recurrence, recurrence_errors): (Option<NormalizedRecurrence>, Vec<RecurrenceError>) =
        match date_start.map(|start| normalize(&row.recurrence, start)) {
            Some(Ok(recurrence)) => (Some(recurrence), Vec::new()),
            Some(Err(errors)) => (None, errors),
            None => (None, check_recurrence(&row.recurrence)),
        };
    issues.extend(recurrence_errors.iter().map(|e| {
        Issue::error(n, e.code(), e.to_string()).with_suggestion(e.suggestion())
    }));

    // Labels
    let labels: ParsedLabels = parse_labels(row.labels.as_deref());
    if !labels.duplicates.is_empty() {
        issues.push(
            Issue::warn(
                n,
                IssueCode::DuplicateLabels,
                format!("Duplicate labels removed: {}", labels.duplicates.join(", ")),
            )
            .with_suggestion("Remove repeated labels from label_list"),
        );
    }

    // Owner
    let owner: Resolution = resolve_owner(&row.owner, index);
    issues.extend(owner.findings.iter().map(|f| f.to_issue(n)));

    // Notification override
    let notifications: Option<bool> = row.notification_emails.as_deref().and_then(|raw| {
        parse_or_report(n, "notification_emails", parse_flag(raw), &mut issues)
    });

    let resolved: ResolvedIds = ResolvedIds {
        owner_id: owner.ids.owner_id,
        ..location.ids
    };
    let duplicate_key: Option<DuplicateKey> = duplicate_key_of(row, &resolved, date_start);

    let ready: Option<ReadyJob> = if issues.iter().any(Issue::is_blocking) {
        None
    } else {
        assemble(row, &resolved, date_start, one_off_end, window, recurrence, labels.labels, notifications)
    };

    RowReport {
        row_number: n,
        issues,
        resolved,
        ready,
        duplicate_key,
    }
}

/// Whether the row's recurrence columns ask for a series.
///
/// An unrecognised type counts as recurring so the one-off `date_end`
/// requirement is not reported on top of the type error.
fn is_recurring(row: &JobRow) -> bool {
    row.recurrence
        .kind
        .as_deref()
        .is_some_and(|kind| kind.parse::<RecurrenceType>() != Ok(RecurrenceType::None))
}

fn parse_or_report<T>(
    row_number: usize,
    column: &str,
    parsed: Result<T, DomainError>,
    issues: &mut Vec<Issue>,
) -> Option<T> {
    match parsed {
        Ok(value) => Some(value),
        Err(e) => {
            issues.push(domain_issue(row_number, Some(column), &e));
            None
        }
    }
}

fn domain_issue(row_number: usize, column: Option<&str>, error: &DomainError) -> Issue {
    let detail: String = column.map_or_else(|| error.to_string(), |c| format!("{c}: {error}"));
    let suggestion: &str = match error.code() {
        IssueCode::InvalidDate => "Use YYYY-MM-DD format",
        IssueCode::InvalidTime => "Use whole numbers for hours and minutes",
        IssueCode::InvalidHour => "Use an hour between 0 and 23",
        IssueCode::InvalidMinute => "Use a minute between 0 and 59",
        IssueCode::InvalidTimeRange => "Set the end time after the start time",
        _ => "Use true or false",
    };
    Issue::error(row_number, error.code(), detail).with_suggestion(suggestion)
}

fn check_time_window(row: &JobRow, issues: &mut Vec<Issue>) -> Option<TimeWindow> {
    let n: usize = row.row_number;
    let mut parse = |column: &str, raw: Option<&String>| -> Option<i64> {
        raw.and_then(|raw| parse_or_report(n, column, parse_time_component(raw), issues))
    };

    let hour_start: Option<i64> = parse("hour_start", row.hour_start.as_ref());
    let minute_start: Option<i64> = parse("minute_start", row.minute_start.as_ref());
    let hour_end: Option<i64> = parse("hour_end", row.hour_end.as_ref());
    let minute_end: Option<i64> = parse("minute_end", row.minute_end.as_ref());

    let (Some(hs), Some(ms), Some(he), Some(me)) = (hour_start, minute_start, hour_end, minute_end)
    else {
        return None;
    };

    match validate_time_window((hs, ms), (he, me)) {
        Ok(window) => Some(window),
        Err(errors) => {
            issues.extend(errors.iter().map(|e| domain_issue(n, None, e)));
            None
        }
    }
}

fn duplicate_key_of(
    row: &JobRow,
    resolved: &ResolvedIds,
    date_start: Option<NaiveDate>,
) -> Option<DuplicateKey> {
    let canonical_time = |raw: Option<&str>| -> Option<String> {
        raw.map(|raw| {
            parse_time_component(raw).map_or_else(|_| raw.to_string(), |value| value.to_string())
        })
    };

    Some(DuplicateKey {
        site_id: resolved.site_id.clone(),
        floor_id: resolved.floor_id.clone(),
        space_id: resolved.space_id.clone(),
        title: row.title.clone()?,
        date_start: date_start.map(|d| d.to_string()).or_else(|| row.date_start.clone()),
        hour_start: canonical_time(row.hour_start.as_deref()),
        minute_start: canonical_time(row.minute_start.as_deref()),
    })
}

#[allow(clippy::too_many_arguments)]
fn assemble(
    row: &JobRow,
    resolved: &ResolvedIds,
    date_start: Option<NaiveDate>,
    one_off_end: Option<NaiveDate>,
    window: Option<TimeWindow>,
    recurrence: Option<NormalizedRecurrence>,
    labels: Vec<String>,
    notifications: Option<bool>,
) -> Option<ReadyJob> {
    let date_start: NaiveDate = date_start?;
    let recurrence: NormalizedRecurrence = recurrence?;
    let date_end: NaiveDate = match recurrence {
        NormalizedRecurrence::OneOff { .. } => one_off_end?,
        NormalizedRecurrence::Repeating(_) => recurrence.end_date()?,
    };

    Some(ReadyJob {
        row_number: row.row_number,
        title: row.title.clone()?,
        description: row.description.clone(),
        date_start,
        date_end,
        window: window?,
        location: ResolvedLocation::from_ids(
            resolved.site_id.as_deref(),
            resolved.floor_id.as_deref(),
            resolved.space_id.as_deref(),
        )?,
        owner_id: resolved.owner_id.clone()?,
        labels,
        recurrence,
        notifications,
    })
}
