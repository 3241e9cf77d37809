// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use chrono::NaiveDate;
use roster_import::ReadyJob;
use roster_import_domain::{ClockTime, RecurrenceSpec, ResolvedLocation, TimeWindow, normalize};

use crate::PayloadOptions;

pub fn create_test_options() -> PayloadOptions {
    PayloadOptions::new("roster-import").with_batch_tag("b1")
}

/// A one-off job on floor 10 of site 1, owned by user 500.
pub fn create_test_job(row_number: usize) -> ReadyJob {
    let date_start: NaiveDate = NaiveDate::from_ymd_opt(2026, 11, 5).unwrap();
    ReadyJob {
        row_number,
        title: String::from("Replace air filters"),
        description: Some(String::from("All AHUs on the ground floor")),
        date_start,
        date_end: date_start,
        window: TimeWindow {
            start: ClockTime::new(9, 0).unwrap(),
            end: ClockTime::new(10, 30).unwrap(),
        },
        location: ResolvedLocation::Floor {
            site_id: String::from("1"),
            floor_id: String::from("10"),
        },
        owner_id: String::from("500"),
        labels: vec![String::from("HVAC")],
        recurrence: normalize(&RecurrenceSpec::default(), date_start).unwrap(),
        notifications: None,
    }
}

/// The same job repeating every other Thursday until 2026-12-17.
pub fn create_test_biweekly_job(row_number: usize) -> ReadyJob {
    let mut job: ReadyJob = create_test_job(row_number);
    let spec: RecurrenceSpec = RecurrenceSpec {
        end_date: Some(String::from("2026-12-17")),
        days: Some(String::from("Thu")),
        ..RecurrenceSpec::of_kind("biweekly")
    };
    job.recurrence = normalize(&spec, job.date_start).unwrap();
    job.date_end = NaiveDate::from_ymd_opt(2026, 12, 17).unwrap();
    job
}
