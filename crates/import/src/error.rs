// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use thiserror::Error;

/// A single submission failure reported by the collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// The remote answered with a 5xx status.
    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },
    /// The remote rejected the request with a 4xx status.
    #[error("Request rejected {status}: {message}")]
    Client { status: u16, message: String },
    /// The request never got an answer.
    #[error("Transport failure: {0}")]
    Transport(String),
}

impl SubmitError {
    /// Maps an HTTP status and body onto a failure class.
    #[must_use]
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message: String = message.into();
        if status >= 500 {
            Self::Server { status, message }
        } else {
            Self::Client { status, message }
        }
    }

    /// Returns whether the submission may be retried.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Server { .. } | Self::Transport(_))
    }

    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// Errors that stop an import run before it produces a report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    /// The first row never reached the remote API.
    #[error("Submission endpoint unreachable after {attempts} attempt(s): {reason}")]
    SubmitterUnreachable { attempts: u32, reason: String },
}

/// Errors raised while fetching the reference feeds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    /// A feed request failed.
    #[error("Failed to fetch {feed}: {reason}")]
    Fetch { feed: &'static str, reason: String },
    /// A feed answered with a body that could not be decoded.
    #[error("Invalid {feed} feed: {reason}")]
    Decode { feed: &'static str, reason: String },
}
