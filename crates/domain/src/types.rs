// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};

/// Trims a raw cell and maps blank cells to `None`.
#[must_use]
pub fn clean_field(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Location references exactly as supplied by a row.
///
/// Each level may be given by id or by name; an id always wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRefs {
    pub site_id: Option<String>,
    pub site_name: Option<String>,
    pub floor_id: Option<String>,
    pub floor_name: Option<String>,
    pub space_id: Option<String>,
    pub space_name: Option<String>,
}

impl LocationRefs {
    /// Returns whether a floor was referenced at all.
    #[must_use]
    pub const fn has_floor(&self) -> bool {
        self.floor_id.is_some() || self.floor_name.is_some()
    }

    /// Returns whether a space was referenced at all.
    #[must_use]
    pub const fn has_space(&self) -> bool {
        self.space_id.is_some() || self.space_name.is_some()
    }
}

/// Owner references exactly as supplied by a row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerRefs {
    pub employee_id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl OwnerRefs {
    /// Returns whether any owner reference was supplied.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.employee_id.is_none() && self.name.is_none() && self.email.is_none()
    }
}

/// The declarative recurrence columns of a row, unparsed.
///
/// The recurrence engine turns this into a [`crate::NormalizedRecurrence`]
/// or a list of row-local errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceSpec {
    /// `none`, `daily`, `weekdays`, `weekly`, `biweekly` or `monthly`.
    pub kind: Option<String>,
    /// Last possible occurrence (inclusive).
    pub end_date: Option<String>,
    /// Comma-separated weekday tokens, used by weekly and biweekly rules.
    pub days: Option<String>,
    /// Every N units; defaults to 1.
    pub interval: Option<String>,
    /// `date` (default) or `weekday`, used by monthly rules.
    pub monthly_mode: Option<String>,
}

impl RecurrenceSpec {
    /// Creates a spec from its type token alone.
    #[must_use]
    pub fn of_kind(kind: &str) -> Self {
        Self {
            kind: clean_field(Some(kind)),
            ..Self::default()
        }
    }
}

/// Identifiers attached to a row by name resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolvedIds {
    pub site_id: Option<String>,
    pub floor_id: Option<String>,
    pub space_id: Option<String>,
    pub owner_id: Option<String>,
}

/// One input row describing a maintenance job.
///
/// All cells are kept as trimmed text; parsing happens in the validator so
/// that every malformed cell can be reported in one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRow {
    /// Spreadsheet row number (the header is row 1).
    pub row_number: usize,
    pub title: Option<String>,
    pub description: Option<String>,
    pub date_start: Option<String>,
    pub date_end: Option<String>,
    pub hour_start: Option<String>,
    pub minute_start: Option<String>,
    pub hour_end: Option<String>,
    pub minute_end: Option<String>,
    pub location: LocationRefs,
    pub owner: OwnerRefs,
    /// Comma-separated labels.
    pub labels: Option<String>,
    pub recurrence: RecurrenceSpec,
    /// Per-row override of the completion/cancellation email policy.
    pub notification_emails: Option<String>,
    /// Filled in by resolution; empty until the row has been audited.
    pub resolved: ResolvedIds,
}

impl JobRow {
    /// Creates an empty row with the given spreadsheet row number.
    #[must_use]
    pub fn new(row_number: usize) -> Self {
        Self {
            row_number,
            ..Self::default()
        }
    }

    /// Records the identifiers produced by name resolution.
    pub fn attach_resolution(&mut self, resolved: ResolvedIds) {
        self.resolved = resolved;
    }
}

/// A validated position in the site / floor / space hierarchy.
///
/// A space can only be expressed together with its floor, so the
/// "space without floor" shape is unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "depth", rename_all = "snake_case")]
pub enum ResolvedLocation {
    /// The job is anchored to the whole site.
    Site {
        site_id: String,
    },
    /// The job is narrowed to one floor of the site.
    Floor {
        site_id: String,
        floor_id: String,
    },
    /// The job is narrowed to one space on a floor.
    Space {
        site_id: String,
        floor_id: String,
        space_id: String,
    },
}

impl ResolvedLocation {
    /// Builds a location from resolved ids.
    ///
    /// Returns `None` when the site is missing or a space is given without
    /// a floor.
    #[must_use]
    pub fn from_ids(
        site_id: Option<&str>,
        floor_id: Option<&str>,
        space_id: Option<&str>,
    ) -> Option<Self> {
        let site_id: String = site_id?.to_string();
        match (floor_id, space_id) {
            (None, None) => Some(Self::Site { site_id }),
            (Some(floor_id), None) => Some(Self::Floor {
                site_id,
                floor_id: floor_id.to_string(),
            }),
            (Some(floor_id), Some(space_id)) => Some(Self::Space {
                site_id,
                floor_id: floor_id.to_string(),
                space_id: space_id.to_string(),
            }),
            (None, Some(_)) => None,
        }
    }

    /// Returns the site id.
    #[must_use]
    pub fn site_id(&self) -> &str {
        match self {
            Self::Site { site_id } | Self::Floor { site_id, .. } | Self::Space { site_id, .. } => {
                site_id
            }
        }
    }

    /// Returns the floor id, if the location is narrowed to a floor.
    #[must_use]
    pub fn floor_id(&self) -> Option<&str> {
        match self {
            Self::Site { .. } => None,
            Self::Floor { floor_id, .. } | Self::Space { floor_id, .. } => Some(floor_id),
        }
    }

    /// Returns the space id, if the location is narrowed to a space.
    #[must_use]
    pub fn space_id(&self) -> Option<&str> {
        match self {
            Self::Space { space_id, .. } => Some(space_id),
            _ => None,
        }
    }
}
