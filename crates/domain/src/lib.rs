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

mod clock;
mod error;
mod issue;
mod labels;
mod recurrence;
mod types;
mod validation;
mod wire;

#[cfg(test)]
mod tests;

pub use clock::ReferenceClock;
pub use error::{DomainError, RecurrenceError};
pub use issue::{Issue, IssueCode, Severity};
pub use labels::{ParsedLabels, parse_labels};
pub use recurrence::{
    MonthlyMode, NormalizedRecurrence, Occurrences, RecurrenceType, RepeatPattern, RepeatRule,
    StopCondition, WeekdaySet, check_recurrence, normalize,
};
pub use types::{
    JobRow, LocationRefs, OwnerRefs, RecurrenceSpec, ResolvedIds, ResolvedLocation, clean_field,
};
pub use validation::{
    ClockTime, TimeWindow, parse_date, parse_flag, parse_time_component, validate_time_window,
};
pub use wire::{IntervalPeriod, RecurrenceWire, StopCount, StopMode};
