// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API boundary.

/// Errors raised while reading rows or writing reports.
///
/// Problems with individual rows are reported as issues instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The CSV header could not be read or lacks required columns.
    #[error("Invalid CSV format: {reason}")]
    InvalidCsvFormat {
        /// What was wrong with the file.
        reason: String,
    },
    /// A report could not be written.
    #[error("Failed to write report: {reason}")]
    ReportWrite {
        /// The underlying failure.
        reason: String,
    },
}
