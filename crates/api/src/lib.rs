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

mod csv_rows;
mod error;
mod payload;
mod report;

#[cfg(test)]
mod tests;

pub use csv_rows::{FIRST_DATA_ROW, RowIngest, read_job_rows};
pub use error::ApiError;
pub use payload::{
    FloorsSpaces, OwnerRef, PayloadOptions, PayloadRecord, Translation, build_payload,
    preview_line,
};
pub use report::{render_issue_report, write_issue_report};
