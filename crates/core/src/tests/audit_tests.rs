// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use roster_import_domain::{Issue, IssueCode, JobRow, RecurrenceSpec, Severity};

use crate::tests::helpers::{create_test_index, create_test_row, create_test_today};
use crate::{
    AuditResult, CoreError, LookupIndex, LookupStore, ValidationOptions, audit, audit_with_store,
};

fn run(rows: &mut [JobRow]) -> AuditResult {
    let index: LookupIndex = create_test_index();
    audit(rows, &index, create_test_today(), &ValidationOptions::default())
}

fn duplicate_warnings(result: &AuditResult, row_number: usize) -> Vec<&Issue> {
    result
        .issues_for(row_number)
        .into_iter()
        .filter(|issue| issue.code == IssueCode::DuplicateRow)
        .collect()
}

#[test]
fn test_clean_rows_get_valid_marker() {
    let mut rows: Vec<JobRow> = vec![create_test_row(2)];
    let result: AuditResult = run(&mut rows);

    assert_eq!(result.issues.len(), 1);
    assert_eq!(result.issues[0].severity, Severity::Ok);
    assert_eq!(result.issues[0].code, IssueCode::Valid);
    assert_eq!(result.ready_rows.len(), 1);
    assert!(result.blocked_rows.is_empty());
}

#[test]
fn test_resolution_is_attached_to_rows() {
    let mut rows: Vec<JobRow> = vec![create_test_row(2)];
    let _ = run(&mut rows);

    assert_eq!(rows[0].resolved.site_id.as_deref(), Some("1"));
    assert_eq!(rows[0].resolved.floor_id.as_deref(), Some("10"));
    assert_eq!(rows[0].resolved.owner_id.as_deref(), Some("500"));
}

#[test]
fn test_duplicates_reference_each_other() {
    let mut third: JobRow = create_test_row(4);
    third.title = Some(String::from("Inspect boiler"));
    let mut rows: Vec<JobRow> = vec![create_test_row(2), create_test_row(3), third];

    let result: AuditResult = run(&mut rows);

    let first = duplicate_warnings(&result, 2);
    let second = duplicate_warnings(&result, 3);
    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 1);
    assert_eq!(first[0].detail, "Possible duplicate of row(s) 3");
    assert_eq!(second[0].detail, "Possible duplicate of row(s) 2");
    assert_eq!(first[0].severity, Severity::Warn);
    assert!(duplicate_warnings(&result, 4).is_empty());

    // Duplicates alone do not block import
    assert_eq!(result.ready_rows.len(), 3);
}

#[test]
fn test_failing_row_does_not_affect_others() {
    let mut broken: JobRow = create_test_row(3);
    broken.title = Some(String::from("Broken"));
    broken.recurrence = RecurrenceSpec::of_kind("fortnightly");

    let mut alone: Vec<JobRow> = vec![create_test_row(2)];
    let mut together: Vec<JobRow> = vec![create_test_row(2), broken];

    let alone_result: AuditResult = run(&mut alone);
    let together_result: AuditResult = run(&mut together);

    assert_eq!(alone_result.issues_for(2), together_result.issues_for(2));
    assert_eq!(together_result.blocked_rows, vec![3]);
    assert_eq!(together_result.ready_rows.len(), 1);
    assert_eq!(together_result.ready_rows[0].row_number, 2);
}

#[test]
fn test_issues_are_ordered_by_row() {
    let mut bad: JobRow = create_test_row(2);
    bad.title = None;
    bad.owner.name = Some(String::from("Nobody"));
    let mut rows: Vec<JobRow> = vec![bad, create_test_row(3)];

    let result: AuditResult = run(&mut rows);
    let row_numbers: Vec<usize> = result.issues.iter().map(|i| i.row_number).collect();

    assert_eq!(row_numbers, vec![2, 2, 3]);
    assert_eq!(result.count(Severity::Error), 2);
    assert_eq!(result.count(Severity::Ok), 1);
}

#[test]
fn test_reaudit_replaces_previous_result() {
    let mut rows: Vec<JobRow> = vec![create_test_row(2)];
    rows[0].owner.name = Some(String::from("Nobody"));
    let first: AuditResult = run(&mut rows);
    assert_eq!(first.blocked_rows, vec![2]);

    rows[0].owner.name = Some(String::from("Bob Jones"));
    let second: AuditResult = run(&mut rows);
    assert!(second.blocked_rows.is_empty());
    assert_eq!(second.issues.len(), 1);
    assert_eq!(rows[0].resolved.owner_id.as_deref(), Some("501"));
}

#[test]
fn test_audit_with_empty_store_fails() {
    let store: LookupStore = LookupStore::new();
    let mut rows: Vec<JobRow> = vec![create_test_row(2)];

    let result = audit_with_store(
        &mut rows,
        &store,
        create_test_today(),
        &ValidationOptions::default(),
    );
    assert_eq!(result.unwrap_err(), CoreError::LookupUnavailable);
}

#[test]
fn test_audit_with_loaded_store() {
    let store: LookupStore = LookupStore::new();
    store.replace(create_test_index());
    let mut rows: Vec<JobRow> = vec![create_test_row(2)];

    let result: AuditResult = audit_with_store(
        &mut rows,
        &store,
        create_test_today(),
        &ValidationOptions::default(),
    )
    .unwrap();
    assert_eq!(result.ready_rows.len(), 1);
}
