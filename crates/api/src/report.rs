// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Issue report rendering.

use std::io::Write;

use roster_import_domain::Issue;

use crate::error::ApiError;

/// Writes issues as CSV with the header
/// `row_number,status,issue_code,issue_detail,suggestion`.
///
/// # Errors
///
/// Returns `ApiError::ReportWrite` if a record cannot be written.
pub fn write_issue_report<W: Write>(writer: W, issues: &[Issue]) -> Result<(), ApiError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    if issues.is_empty() {
        csv_writer
            .write_record(["row_number", "status", "issue_code", "issue_detail", "suggestion"])
            .map_err(report_error)?;
    }
    for issue in issues {
        csv_writer.serialize(issue).map_err(report_error)?;
    }

    csv_writer.flush().map_err(|e| ApiError::ReportWrite {
        reason: e.to_string(),
    })
}

/// Renders issues as a CSV string.
///
/// # Errors
///
/// Returns `ApiError::ReportWrite` if rendering fails.
pub fn render_issue_report(issues: &[Issue]) -> Result<String, ApiError> {
    let mut buffer: Vec<u8> = Vec::new();
    write_issue_report(&mut buffer, issues)?;
    String::from_utf8(buffer).map_err(|e| ApiError::ReportWrite {
        reason: e.to_string(),
    })
}

fn report_error(e: csv::Error) -> ApiError {
    ApiError::ReportWrite {
        reason: e.to_string(),
    }
}
