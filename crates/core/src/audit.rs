// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Batch auditing.
//!
//! Validates every row independently, attaches the resolved ids to the row,
//! then scans the batch for duplicates. Re-running an audit after edits
//! produces a fresh [`AuditResult`]; nothing is carried over.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use roster_import_domain::{Issue, IssueCode, JobRow, Severity};
use tracing::info;

use crate::error::CoreError;
use crate::lookup::{LookupIndex, LookupStore};
use crate::options::ValidationOptions;
use crate::validate::{DuplicateKey, ReadyJob, RowReport, validate_row};

/// Outcome of auditing a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditResult {
    /// Every finding, ordered by row and then by pipeline step.
    pub issues: Vec<Issue>,
    /// Rows with no `ERROR` issue, in row order.
    pub ready_rows: Vec<ReadyJob>,
    /// Row numbers of rows carrying at least one `ERROR` issue.
    pub blocked_rows: Vec<usize>,
}

impl AuditResult {
    /// Returns the issues reported for one row.
    #[must_use]
    pub fn issues_for(&self, row_number: usize) -> Vec<&Issue> {
        self.issues
            .iter()
            .filter(|issue| issue.row_number == row_number)
            .collect()
    }

    /// Counts issues with the given severity.
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity == severity)
            .count()
    }
}

/// Audits a batch of rows against one lookup snapshot.
///
/// Each row's resolved ids are written back to the row. Rows never affect
/// each other's findings, except for the duplicate warning.
///
/// # Arguments
///
/// * `rows` - The rows to audit, in spreadsheet order
/// * `index` - The reference-data snapshot
/// * `today` - The civil date in the reference time zone
/// * `options` - Resolution settings
pub fn audit(
    rows: &mut [JobRow],
    index: &LookupIndex,
    today: NaiveDate,
    options: &ValidationOptions,
) -> AuditResult {
    let mut reports: Vec<RowReport> = rows
        .iter_mut()
        .map(|row| {
            let report: RowReport = validate_row(row, index, today, options);
            row.attach_resolution(report.resolved.clone());
            report
        })
        .collect();

    flag_duplicates(&mut reports);

    let mut result: AuditResult = AuditResult::default();
    for mut report in reports {
        if report.issues.is_empty() {
            report.issues.push(Issue::valid(report.row_number));
        }
        match report.ready {
            Some(job) => result.ready_rows.push(job),
            None => result.blocked_rows.push(report.row_number),
        }
        result.issues.extend(report.issues);
    }

    info!(
        rows = rows.len(),
        ready = result.ready_rows.len(),
        blocked = result.blocked_rows.len(),
        errors = result.count(Severity::Error),
        warnings = result.count(Severity::Warn),
        "Audit complete"
    );

    result
}

/// Audits a batch against the current snapshot of a [`LookupStore`].
///
/// The snapshot is taken once, so a concurrent refresh does not affect
/// this pass.
///
/// # Errors
///
/// Returns `CoreError::LookupUnavailable` if no reference data has been loaded.
pub fn audit_with_store(
    rows: &mut [JobRow],
    store: &LookupStore,
    today: NaiveDate,
    options: &ValidationOptions,
) -> Result<AuditResult, CoreError> {
    let index: Arc<LookupIndex> = store.snapshot()?;
    Ok(audit(rows, &index, today, options))
}

/// Adds a `WARN DUPLICATE_ROW` issue to every member of a duplicate group.
fn flag_duplicates(reports: &mut [RowReport]) {
    let mut groups: BTreeMap<&DuplicateKey, Vec<usize>> = BTreeMap::new();
    for (position, report) in reports.iter().enumerate() {
        if let Some(key) = &report.duplicate_key {
            groups.entry(key).or_default().push(position);
        }
    }

    let mut warnings: Vec<(usize, Issue)> = Vec::new();
    for members in groups.values().filter(|members| members.len() > 1) {
        for &position in members {
            let others: Vec<String> = members
                .iter()
                .filter(|&&other| other != position)
                .map(|&other| reports[other].row_number.to_string())
                .collect();
            let row_number: usize = reports[position].row_number;
            warnings.push((
                position,
                Issue::warn(
                    row_number,
                    IssueCode::DuplicateRow,
                    format!("Possible duplicate of row(s) {}", others.join(", ")),
                )
                .with_suggestion("Remove the repeated row or change its title, date or time"),
            ));
        }
    }

    for (position, issue) in warnings {
        if let Some(report) = reports.get_mut(position) {
            report.issues.push(issue);
        }
    }
}
