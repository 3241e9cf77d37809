// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod error;
mod policy;
mod reference;
mod runner;
mod submitter;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use error::{ImportError, ReferenceError, SubmitError};
pub use policy::ImportPolicy;
pub use reference::{
    Feed, ReferenceSource, USER_PAGE_LIMIT, UserPage, decode_feed, fetch_reference_data,
    fetch_users, load_reference_data,
};
pub use runner::{AbortReason, CreatedRow, FailedRow, ImportReport, ImportRunner};
pub use submitter::{JobSubmitter, Submitted};
