// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use async_trait::async_trait;
use roster_import_api::PayloadRecord;

use crate::error::SubmitError;

/// A successful job creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Submitted {
    /// Identifier the remote API assigned to the new job.
    pub remote_id: u64,
    /// The remote's remaining request quota, when it reports one.
    pub quota_remaining: Option<u32>,
}

/// The collaborator that POSTs payloads to the job creation endpoint.
#[async_trait]
pub trait JobSubmitter: Send + Sync {
    /// Submits one payload.
    ///
    /// # Errors
    ///
    /// Returns `SubmitError::Server` or `SubmitError::Client` for an error
    /// status, or `SubmitError::Transport` when no answer was received.
    async fn submit(&self, payload: &PayloadRecord) -> Result<Submitted, SubmitError>;
}
