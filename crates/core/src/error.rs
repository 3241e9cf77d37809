// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that stop a validation pass as a whole.
///
/// Row-level findings are never reported through this type; they become
/// issues on the affected row.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// No reference data has been loaded, so names cannot be resolved.
    #[error("Lookup index unavailable: load reference data before auditing")]
    LookupUnavailable,
    /// A feed record carries none of the accepted spellings of a key.
    #[error("{record} record {id} has no {key}")]
    MissingFeedKey {
        record: &'static str,
        id: String,
        key: &'static str,
    },
}
