// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! CSV ingestion of job rows.
//!
//! Headers are matched case-insensitively after trimming, with spaces
//! treated as underscores. Extra columns are ignored and column order is
//! free. Cells are kept as trimmed text; parsing is the validator's job.

use std::collections::HashMap;

use csv::StringRecord;
use roster_import_domain::{
    Issue, IssueCode, JobRow, LocationRefs, OwnerRefs, RecurrenceSpec, clean_field,
};
use tracing::{debug, warn};

use crate::error::ApiError;

/// The spreadsheet row number of the first data row (the header is row 1).
pub const FIRST_DATA_ROW: usize = 2;

/// Rows read from a CSV file, plus the records that could not be read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowIngest {
    /// Successfully read rows, in file order.
    pub rows: Vec<JobRow>,
    /// One `MALFORMED_ROW` issue per unreadable record.
    pub issues: Vec<Issue>,
}

/// Required CSV column headers (case-insensitive, normalized).
const REQUIRED_HEADERS: &[&str] = &[
    "title_en",
    "date_start",
    "hour_start",
    "minute_start",
    "hour_end",
    "minute_end",
];

/// Normalizes a CSV header string for case-insensitive, whitespace-tolerant matching.
fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase().replace(' ', "_")
}

/// Validates that all required headers are present in the CSV.
fn validate_headers(headers: &StringRecord) -> Result<HashMap<String, usize>, ApiError> {
    let mut header_map: HashMap<String, usize> = HashMap::new();

    for (idx, header) in headers.iter().enumerate() {
        header_map.entry(normalize_header(header)).or_insert(idx);
    }

    let missing: Vec<&str> = REQUIRED_HEADERS
        .iter()
        .copied()
        .filter(|required| !header_map.contains_key(*required))
        .collect();

    if !missing.is_empty() {
        return Err(ApiError::InvalidCsvFormat {
            reason: format!("Missing required headers: {}", missing.join(", ")),
        });
    }

    Ok(header_map)
}

/// Maps one CSV record onto a [`JobRow`].
fn parse_csv_row(
    record: &StringRecord,
    header_map: &HashMap<String, usize>,
    row_number: usize,
) -> JobRow {
    let get_field = |name: &str| -> Option<String> {
        clean_field(header_map.get(name).and_then(|&idx| record.get(idx)))
    };

    JobRow {
        title: get_field("title_en"),
        description: get_field("description_en"),
        date_start: get_field("date_start"),
        date_end: get_field("date_end"),
        hour_start: get_field("hour_start"),
        minute_start: get_field("minute_start"),
        hour_end: get_field("hour_end"),
        minute_end: get_field("minute_end"),
        location: LocationRefs {
            site_id: get_field("site_id"),
            site_name: get_field("site_name"),
            floor_id: get_field("floor_id"),
            floor_name: get_field("floor_name"),
            space_id: get_field("space_id"),
            space_name: get_field("space_name"),
        },
        owner: OwnerRefs {
            employee_id: get_field("owner_employee_id"),
            name: get_field("owner_name"),
            email: get_field("owner_email"),
        },
        labels: get_field("label_list"),
        recurrence: RecurrenceSpec {
            kind: get_field("recurrence_type"),
            end_date: get_field("recurrence_end_date"),
            days: get_field("recurrence_days"),
            interval: get_field("recurrence_interval"),
            monthly_mode: get_field("recurrence_monthly_mode"),
        },
        notification_emails: get_field("notification_emails"),
        ..JobRow::new(row_number)
    }
}

/// Reads job rows from CSV text.
///
/// # Arguments
///
/// * `csv_content` - The CSV file contents, header first
///
/// # Returns
///
/// * `Ok(RowIngest)` with the readable rows and a `MALFORMED_ROW` issue per
///   unreadable record
/// * `Err(ApiError)` if the header is unreadable or incomplete
///
/// # Errors
///
/// Returns `ApiError::InvalidCsvFormat` if the header cannot be read or any
/// required column is missing.
pub fn read_job_rows(csv_content: &str) -> Result<RowIngest, ApiError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(csv_content.as_bytes());

    let headers: StringRecord = reader
        .headers()
        .map_err(|e| ApiError::InvalidCsvFormat {
            reason: format!("Failed to read CSV headers: {e}"),
        })?
        .clone();

    let header_map: HashMap<String, usize> = validate_headers(&headers)?;
    let mut ingest: RowIngest = RowIngest::default();

    for (idx, result) in reader.records().enumerate() {
        let row_number: usize = idx + FIRST_DATA_ROW;

        match result {
            Ok(record) => {
                if record.iter().all(|cell| cell.trim().is_empty()) {
                    debug!(row = row_number, "Skipping blank row");
                    continue;
                }
                ingest.rows.push(parse_csv_row(&record, &header_map, row_number));
            }
            Err(e) => {
                warn!(row = row_number, error = %e, "Unreadable CSV record");
                ingest.issues.push(
                    Issue::error(row_number, IssueCode::MalformedRow, format!("CSV parse error: {e}"))
                        .with_suggestion("Check the row has one cell per header column"),
                );
            }
        }
    }

    debug!(
        rows = ingest.rows.len(),
        malformed = ingest.issues.len(),
        "Read job rows"
    );

    Ok(ingest)
}
