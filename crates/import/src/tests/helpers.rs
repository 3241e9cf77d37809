// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use roster_import::ReadyJob;
use roster_import_api::{PayloadOptions, PayloadRecord, build_payload};
use roster_import_domain::{ClockTime, RecurrenceSpec, ResolvedLocation, TimeWindow, normalize};
use tokio::time::Instant;

use crate::{JobSubmitter, SubmitError, Submitted};

/// Builds payloads for rows 2, 3, ... `count + 1`.
pub fn create_test_payloads(count: usize) -> Vec<PayloadRecord> {
    let options: PayloadOptions = PayloadOptions::new("roster-import").with_batch_tag("t1");
    let date_start: NaiveDate = NaiveDate::from_ymd_opt(2026, 11, 5).unwrap();

    (0..count)
        .map(|offset| {
            let job: ReadyJob = ReadyJob {
                row_number: offset + 2,
                title: format!("Job {offset}"),
                description: None,
                date_start,
                date_end: date_start,
                window: TimeWindow {
                    start: ClockTime::new(9, 0).unwrap(),
                    end: ClockTime::new(10, 0).unwrap(),
                },
                location: ResolvedLocation::Site {
                    site_id: String::from("1"),
                },
                owner_id: String::from("500"),
                labels: Vec::new(),
                recurrence: normalize(&RecurrenceSpec::default(), date_start).unwrap(),
                notifications: None,
            };
            build_payload(&job, &options)
        })
        .collect()
}

pub fn create_test_server_error() -> SubmitError {
    SubmitError::from_status(503, "Service Unavailable")
}

pub fn create_test_client_error() -> SubmitError {
    SubmitError::from_status(422, "date_start is invalid")
}

pub fn create_test_transport_error() -> SubmitError {
    SubmitError::Transport(String::from("connection refused"))
}

/// A submitter that replays scripted outcomes per row.
///
/// Rows without a script (or whose script ran out) succeed with remote id
/// `1000 + row_number`.
#[derive(Default)]
pub struct ScriptedSubmitter {
    script: Mutex<HashMap<usize, VecDeque<Result<Submitted, SubmitError>>>>,
    calls: Mutex<Vec<(usize, Instant)>>,
    cancel_after: Option<(usize, Arc<AtomicBool>)>,
}

impl ScriptedSubmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_outcomes(
        self,
        row_number: usize,
        outcomes: Vec<Result<Submitted, SubmitError>>,
    ) -> Self {
        self.script
            .lock()
            .unwrap()
            .insert(row_number, outcomes.into_iter().collect());
        self
    }

    /// Raises `flag` once `calls` submissions have been made.
    pub fn with_cancel_after(mut self, calls: usize, flag: Arc<AtomicBool>) -> Self {
        self.cancel_after = Some((calls, flag));
        self
    }

    /// Row numbers in submission order, one entry per attempt.
    pub fn calls(&self) -> Vec<usize> {
        self.calls.lock().unwrap().iter().map(|(row, _)| *row).collect()
    }

    /// Instants of every attempt.
    pub fn call_times(&self) -> Vec<Instant> {
        self.calls.lock().unwrap().iter().map(|(_, at)| *at).collect()
    }
}

#[async_trait]
impl JobSubmitter for ScriptedSubmitter {
    async fn submit(&self, payload: &PayloadRecord) -> Result<Submitted, SubmitError> {
        let row_number: usize = payload.row_number();
        let call_count: usize = {
            let mut calls = self.calls.lock().unwrap();
            calls.push((row_number, Instant::now()));
            calls.len()
        };

        if let Some((after, flag)) = &self.cancel_after
            && call_count >= *after
        {
            flag.store(true, Ordering::SeqCst);
        }

        let scripted: Option<Result<Submitted, SubmitError>> = self
            .script
            .lock()
            .unwrap()
            .get_mut(&row_number)
            .and_then(VecDeque::pop_front);

        scripted.unwrap_or(Ok(Submitted {
            remote_id: 1000 + u64::try_from(row_number).unwrap(),
            quota_remaining: None,
        }))
    }
}
