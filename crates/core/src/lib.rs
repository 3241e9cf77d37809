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

mod audit;
mod error;
mod lookup;
mod options;
mod resolve;
mod validate;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use audit::{AuditResult, audit, audit_with_store};
pub use error::CoreError;
pub use lookup::{
    FloorRecord, LookupIndex, LookupStore, ReferenceData, RemoteId, SiteRecord, SpaceRecord,
    UserRecord, normalize_name,
};
pub use options::ValidationOptions;
pub use resolve::{
    OwnerStrategy, ReferenceKind, Resolution, ResolutionError, StrategyOutcome, resolve,
    resolve_location, resolve_owner,
};
pub use validate::{DuplicateKey, ReadyJob, RowReport, validate, validate_row};
