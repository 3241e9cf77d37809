// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::HashSet;

/// Labels parsed from a comma-separated cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedLabels {
    /// Distinct labels in first-seen order.
    pub labels: Vec<String>,
    /// Labels that appeared more than once, each listed once.
    pub duplicates: Vec<String>,
}

/// Splits a label cell on commas, trims, drops blanks and removes duplicates.
///
/// Comparison is case-sensitive: `Urgent` and `urgent` are two labels.
#[must_use]
pub fn parse_labels(raw: Option<&str>) -> ParsedLabels {
    let mut parsed: ParsedLabels = ParsedLabels::default();
    let Some(raw) = raw else {
        return parsed;
    };

    let mut seen: HashSet<&str> = HashSet::new();
    for label in raw.split(',').map(str::trim).filter(|l| !l.is_empty()) {
        if seen.insert(label) {
            parsed.labels.push(label.to_string());
        } else if !parsed.duplicates.iter().any(|d| d == label) {
            parsed.duplicates.push(label.to_string());
        }
    }

    parsed
}
