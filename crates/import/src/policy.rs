// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Pacing, retry and abort settings of an import run.

use std::time::Duration;

/// Controls how an [`crate::ImportRunner`] talks to the remote API.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImportPolicy {
    /// Minimum gap between two consecutive submissions.
    pub min_spacing: Duration,
    /// Remaining-quota value below which an extra pause is inserted.
    pub low_quota_mark: u32,
    /// Length of the low-quota pause.
    pub low_quota_pause: Duration,
    /// Attempts per row, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry; doubled for each further retry.
    pub base_backoff: Duration,
    /// Failure rate above which the run aborts.
    pub failure_threshold: f64,
    /// Attempted rows needed before the failure rate is evaluated. The default
    /// of 1 evaluates after every row.
    pub evaluation_window: usize,
}

impl Default for ImportPolicy {
    fn default() -> Self {
        Self {
            min_spacing: Duration::from_secs(1),
            low_quota_mark: 5,
            low_quota_pause: Duration::from_secs(2),
            max_attempts: 3,
            base_backoff: Duration::from_secs(1),
            failure_threshold: 0.10,
            evaluation_window: 1,
        }
    }
}

impl ImportPolicy {
    /// Returns the delay before retrying after the given failed attempt.
    ///
    /// Attempt 1 waits `base_backoff`, attempt 2 twice that, and so on.
    #[must_use]
    pub fn backoff_after(&self, attempt: u32) -> Duration {
        let exponent: u32 = attempt.saturating_sub(1).min(16);
        self.base_backoff.saturating_mul(1_u32 << exponent)
    }

    /// Returns whether the remaining quota calls for an extra pause.
    #[must_use]
    pub fn quota_is_low(&self, remaining: Option<u32>) -> bool {
        remaining.is_some_and(|remaining| remaining < self.low_quota_mark)
    }

    /// Returns whether the cumulative failure rate should stop the run.
    ///
    /// Nothing aborts until `evaluation_window` rows have been attempted.
    /// The rate must strictly exceed `failure_threshold`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn should_abort(&self, failed: usize, attempted: usize) -> bool {
        if attempted == 0 || attempted < self.evaluation_window {
            return false;
        }
        (failed as f64 / attempted as f64) > self.failure_threshold
    }
}
