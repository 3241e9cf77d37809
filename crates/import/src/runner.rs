// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Sequential, rate-limited submission of payloads.
//!
//! Rows are submitted one at a time. Every row's outcome is recorded before
//! the next row starts, so an abort or cancellation never loses results.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use roster_import_api::PayloadRecord;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{ImportError, SubmitError};
use crate::policy::ImportPolicy;
use crate::submitter::{JobSubmitter, Submitted};

/// A row the remote API accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedRow {
    pub row_number: usize,
    pub remote_id: u64,
}

/// A row that could not be created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedRow {
    pub row_number: usize,
    pub error: String,
    /// Attempts made, including the first.
    pub attempts: u32,
    #[serde(skip)]
    pub cause: SubmitError,
}

/// Why a run stopped before the last row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum AbortReason {
    /// The failure rate exceeded the policy threshold.
    FailureThreshold { failed: usize, attempted: usize },
    /// The cancellation flag was raised.
    Cancelled,
}

/// Outcome of an import run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub created: Vec<CreatedRow>,
    pub failed: Vec<FailedRow>,
    /// Rows skipped because the run stopped early.
    pub not_attempted: Vec<usize>,
    pub aborted: Option<AbortReason>,
}

impl ImportReport {
    /// Rows submitted so far, successful or not.
    #[must_use]
    pub fn attempted(&self) -> usize {
        self.created.len() + self.failed.len()
    }
}

/// The last failure of a row, after retries.
struct Exhausted {
    error: SubmitError,
    attempts: u32,
    all_transport: bool,
}

/// Submits payloads under an [`ImportPolicy`].
pub struct ImportRunner<S: JobSubmitter> {
    submitter: S,
    policy: ImportPolicy,
    cancel: Arc<AtomicBool>,
}

impl<S: JobSubmitter> ImportRunner<S> {
    /// Creates a runner with its own cancellation flag.
    #[must_use]
    pub fn new(submitter: S, policy: ImportPolicy) -> Self {
        Self {
            submitter,
            policy,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Returns the flag that cancels the run between rows when set.
    #[must_use]
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    #[must_use]
    pub const fn submitter(&self) -> &S {
        &self.submitter
    }

    #[must_use]
    pub const fn policy(&self) -> &ImportPolicy {
        &self.policy
    }

    /// Submits every payload in order.
    ///
    /// # Arguments
    ///
    /// * `payloads` - Payloads of the ready rows, in row order
    ///
    /// # Returns
    ///
    /// * `Ok(ImportReport)` splitting rows into created, failed and not attempted
    /// * `Err(ImportError)` if the endpoint is unreachable
    ///
    /// # Errors
    ///
    /// Returns `ImportError::SubmitterUnreachable` when every attempt for the
    /// first row failed without reaching the remote API.
    pub async fn run(&self, payloads: &[PayloadRecord]) -> Result<ImportReport, ImportError> {
        let mut report: ImportReport = ImportReport::default();
        let mut quota_remaining: Option<u32> = None;

        for (position, payload) in payloads.iter().enumerate() {
            if position > 0 {
                tokio::time::sleep(self.policy.min_spacing).await;
            }
            if self.cancel.load(Ordering::SeqCst) {
                warn!(row = payload.row_number(), "Import cancelled");
                report.aborted = Some(AbortReason::Cancelled);
                report.not_attempted = remaining_rows(&payloads[position..]);
                break;
            }
            if self.policy.quota_is_low(quota_remaining) {
                warn!(
                    quota_remaining = quota_remaining.unwrap_or_default(),
                    pause = ?self.policy.low_quota_pause,
                    "Remote quota low, pausing"
                );
                tokio::time::sleep(self.policy.low_quota_pause).await;
            }

            match self.submit_with_retry(payload).await {
                Ok(submitted) => {
                    info!(
                        row = payload.row_number(),
                        remote_id = submitted.remote_id,
                        "Created job"
                    );
                    quota_remaining = submitted.quota_remaining;
                    report.created.push(CreatedRow {
                        row_number: payload.row_number(),
                        remote_id: submitted.remote_id,
                    });
                }
                Err(exhausted) => {
                    if position == 0 && exhausted.all_transport {
                        return Err(ImportError::SubmitterUnreachable {
                            attempts: exhausted.attempts,
                            reason: exhausted.error.to_string(),
                        });
                    }
                    warn!(
                        row = payload.row_number(),
                        attempts = exhausted.attempts,
                        error = %exhausted.error,
                        "Job creation failed"
                    );
                    report.failed.push(FailedRow {
                        row_number: payload.row_number(),
                        error: exhausted.error.to_string(),
                        attempts: exhausted.attempts,
                        cause: exhausted.error,
                    });
                }
            }

            let attempted: usize = report.attempted();
            let rows_left: bool = position + 1 < payloads.len();
            if rows_left && self.policy.should_abort(report.failed.len(), attempted) {
                warn!(
                    failed = report.failed.len(),
                    attempted, "Failure rate above threshold, aborting import"
                );
                report.aborted = Some(AbortReason::FailureThreshold {
                    failed: report.failed.len(),
                    attempted,
                });
                report.not_attempted = remaining_rows(&payloads[position + 1..]);
                break;
            }
        }

        info!(
            created = report.created.len(),
            failed = report.failed.len(),
            not_attempted = report.not_attempted.len(),
            "Import finished"
        );

        Ok(report)
    }

    async fn submit_with_retry(&self, payload: &PayloadRecord) -> Result<Submitted, Exhausted> {
        let max_attempts: u32 = self.policy.max_attempts.max(1);
        let mut all_transport: bool = true;
        let mut attempt: u32 = 1;

        loop {
            match self.submitter.submit(payload).await {
                Ok(submitted) => return Ok(submitted),
                Err(error) => {
                    all_transport &= error.is_transport();
                    if !error.is_retryable() || attempt >= max_attempts {
                        return Err(Exhausted {
                            error,
                            attempts: attempt,
                            all_transport,
                        });
                    }
                    let delay: std::time::Duration = self.policy.backoff_after(attempt);
                    warn!(
                        row = payload.row_number(),
                        attempt,
                        delay = ?delay,
                        error = %error,
                        "Retrying job creation"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

fn remaining_rows(payloads: &[PayloadRecord]) -> Vec<usize> {
    payloads.iter().map(PayloadRecord::row_number).collect()
}
