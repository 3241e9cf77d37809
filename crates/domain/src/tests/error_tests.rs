// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{DomainError, Issue, IssueCode, RecurrenceError, Severity};

#[test]
fn test_domain_error_codes() {
    assert_eq!(
        DomainError::DateParse {
            value: String::from("x")
        }
        .code(),
        IssueCode::InvalidDate
    );
    assert_eq!(
        DomainError::HourOutOfRange {
            field: "hour_start",
            value: 24
        }
        .code(),
        IssueCode::InvalidHour
    );
    assert_eq!(
        DomainError::EndNotAfterStart {
            start: String::from("10:00"),
            end: String::from("09:00")
        }
        .code(),
        IssueCode::InvalidTimeRange
    );
}

#[test]
fn test_domain_error_messages() {
    let error: DomainError = DomainError::MinuteOutOfRange {
        field: "minute_end",
        value: 75,
    };
    assert_eq!(error.to_string(), "minute_end 75 out of range");

    let error: DomainError = DomainError::EndNotAfterStart {
        start: String::from("10:00"),
        end: String::from("09:30"),
    };
    assert_eq!(error.to_string(), "End time (09:30) must be after start (10:00)");
}

#[test]
fn test_interval_conflicts_share_one_code() {
    assert_eq!(
        RecurrenceError::BiweeklyIntervalConflict(3).code(),
        IssueCode::InvalidInterval
    );
    assert_eq!(
        RecurrenceError::WeekdaysIntervalConflict(2).code(),
        IssueCode::InvalidInterval
    );
    assert_ne!(
        RecurrenceError::BiweeklyIntervalConflict(3).suggestion(),
        RecurrenceError::InvalidInterval(String::from("0")).suggestion()
    );
}

#[test]
fn test_issue_constructors() {
    let issue: Issue = Issue::error(4, IssueCode::SiteNotFound, "Site 'Nowhere' not found")
        .with_suggestion("Check spelling");

    assert!(issue.is_blocking());
    assert_eq!(issue.row_number, 4);
    assert_eq!(issue.suggestion.as_deref(), Some("Check spelling"));

    assert!(!Issue::warn(4, IssueCode::DuplicateLabels, "dup").is_blocking());
    assert_eq!(Issue::valid(7).severity, Severity::Ok);
    assert_eq!(Issue::valid(7).code, IssueCode::Valid);
}

#[test]
fn test_issue_serializes_with_report_field_names() {
    let issue: Issue = Issue::warn(9, IssueCode::DuplicateRow, "Same as row 3");
    let value: serde_json::Value = serde_json::to_value(&issue).unwrap();

    assert_eq!(value["row_number"], 9);
    assert_eq!(value["status"], "WARN");
    assert_eq!(value["issue_code"], "DUPLICATE_ROW");
    assert_eq!(value["issue_detail"], "Same as row 3");
    assert!(value["suggestion"].is_null());
}

#[test]
fn test_issue_code_strings_match_serde_names() {
    for code in [
        IssueCode::MissingRequired,
        IssueCode::FloorNotInSite,
        IssueCode::SpaceWithoutFloor,
        IssueCode::InvalidNotificationFlag,
        IssueCode::Valid,
    ] {
        let serialized: serde_json::Value = serde_json::to_value(code).unwrap();
        assert_eq!(serialized, code.as_str());
    }
}
