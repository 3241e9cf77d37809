// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Name resolution.
//!
//! Explicit ids are always used verbatim; one the index does not know blocks
//! the row. Names are matched exactly after trimming and lowercasing; floors
//! are looked up within the resolved site and spaces within the resolved
//! floor. Every field class is attempted even
//! when an earlier one failed, so one pass reports every problem.

use roster_import_domain::{Issue, IssueCode, JobRow, LocationRefs, OwnerRefs, ResolvedIds, Severity};
use tracing::debug;

use crate::lookup::LookupIndex;
use crate::options::ValidationOptions;

/// The class of reference an explicit id was given for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    Site,
    Floor,
    Space,
    Owner,
}

impl ReferenceKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Site => "site",
            Self::Floor => "floor",
            Self::Space => "space",
            Self::Owner => "owner",
        }
    }
}

/// One resolution finding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionError {
    #[error("No site reference: site_id or site_name is required")]
    MissingSite,
    #[error("Site '{name}' not found")]
    SiteNotFound { name: String },
    #[error("Floor '{floor}' not found in site {site_id}")]
    FloorNotInSite { floor: String, site_id: String },
    #[error("Space '{space}' not found on floor {floor_id}")]
    SpaceNotInFloor { space: String, floor_id: String },
    #[error("Space given without a floor")]
    SpaceWithoutFloor,
    #[error("No owner reference: owner_employee_id, owner_name or owner_email is required")]
    MissingOwner,
    #[error("Owner not found by {}", .tried.join(" or "))]
    OwnerNotFound { tried: Vec<String> },
    /// An explicit id that the index has never seen.
    #[error("{} id '{id}' is not in the loaded reference data", .kind.as_str())]
    UnknownReference { kind: ReferenceKind, id: String },
    /// A floor name matched only by the unscoped fallback. Not blocking.
    #[error("Floor '{floor}' matched floor {floor_id} of site {parent_site_id}, not site {site_id}")]
    FloorOutsideSite {
        floor: String,
        floor_id: String,
        parent_site_id: String,
        site_id: String,
    },
    /// A space name matched only by the unscoped fallback. Not blocking.
    #[error("Space '{space}' matched space {space_id} of floor {parent_floor_id}, not floor {floor_id}")]
    SpaceOutsideFloor {
        space: String,
        space_id: String,
        parent_floor_id: String,
        floor_id: String,
    },
}

impl ResolutionError {
    /// Returns the stable issue code reported for this finding.
    #[must_use]
    pub const fn code(&self) -> IssueCode {
        match self {
            Self::MissingSite => IssueCode::MissingSite,
            Self::SiteNotFound { .. } => IssueCode::SiteNotFound,
            Self::FloorNotInSite { .. } => IssueCode::FloorNotInSite,
            Self::SpaceNotInFloor { .. } => IssueCode::SpaceNotInFloor,
            Self::SpaceWithoutFloor => IssueCode::SpaceWithoutFloor,
            Self::MissingOwner => IssueCode::MissingOwner,
            Self::OwnerNotFound { .. } => IssueCode::OwnerNotFound,
            Self::UnknownReference { .. } => IssueCode::UnknownReference,
            Self::FloorOutsideSite { .. } => IssueCode::FloorOutsideSite,
            Self::SpaceOutsideFloor { .. } => IssueCode::SpaceOutsideFloor,
        }
    }

    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::FloorOutsideSite { .. } | Self::SpaceOutsideFloor { .. } => Severity::Warn,
            _ => Severity::Error,
        }
    }

    #[must_use]
    pub const fn suggestion(&self) -> &'static str {
        match self {
            Self::MissingSite => "Fill in site_name or site_id",
            Self::SiteNotFound { .. } => "Check the site name against the reference data",
            Self::FloorNotInSite { .. } => "Check that the floor belongs to the row's site",
            Self::SpaceNotInFloor { .. } => "Check that the space belongs to the row's floor",
            Self::SpaceWithoutFloor => "Add floor_name or floor_id for the space",
            Self::MissingOwner => "Fill in owner_name, owner_email or owner_employee_id",
            Self::OwnerNotFound { .. } => "Check the owner's name or email against the user list",
            Self::UnknownReference { .. } => {
                "Verify the id exists in the remote system and reload the reference data"
            }
            Self::FloorOutsideSite { .. } => "Check that the row names the floor's own site",
            Self::SpaceOutsideFloor { .. } => "Check that the row names the space's own floor",
        }
    }

    /// Converts this finding into an issue for `row_number`.
    #[must_use]
    pub fn to_issue(&self, row_number: usize) -> Issue {
        Issue::new(row_number, self.severity(), self.code(), self.to_string())
            .with_suggestion(self.suggestion())
    }
}

/// The ids found for a row plus everything that went wrong finding them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub ids: ResolvedIds,
    pub findings: Vec<ResolutionError>,
}

impl Resolution {
    /// Returns whether any finding blocks the row.
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        self.findings.iter().any(|f| f.severity() == Severity::Error)
    }

    /// Splits into ids or blocking errors; warnings are dropped.
    ///
    /// # Errors
    ///
    /// Returns every blocking finding when the row could not be fully resolved.
    pub fn into_result(self) -> Result<ResolvedIds, Vec<ResolutionError>> {
        if self.is_blocked() {
            Err(self
                .findings
                .into_iter()
                .filter(|f| f.severity() == Severity::Error)
                .collect())
        } else {
            Ok(self.ids)
        }
    }
}

/// Resolves every reference of a row.
#[must_use]
pub fn resolve(row: &JobRow, index: &LookupIndex, options: &ValidationOptions) -> Resolution {
    let mut resolution: Resolution = resolve_location(&row.location, index, options);
    let owner: Resolution = resolve_owner(&row.owner, index);
    resolution.ids.owner_id = owner.ids.owner_id;
    resolution.findings.extend(owner.findings);

    debug!(
        row = row.row_number,
        site_id = ?resolution.ids.site_id,
        floor_id = ?resolution.ids.floor_id,
        space_id = ?resolution.ids.space_id,
        owner_id = ?resolution.ids.owner_id,
        findings = resolution.findings.len(),
        "Resolved row references"
    );

    resolution
}

/// Resolves the site, floor and space references of a row.
///
/// Floor and space are skipped when the site could not be resolved, since
/// their names are only meaningful within a site.
#[must_use]
pub fn resolve_location(
    refs: &LocationRefs,
    index: &LookupIndex,
    options: &ValidationOptions,
) -> Resolution {
    let mut resolution: Resolution = Resolution::default();

    if refs.has_space() && !refs.has_floor() {
        resolution.findings.push(ResolutionError::SpaceWithoutFloor);
    }

    let site_id: Option<String> = resolve_site(refs, index, &mut resolution.findings);
    let Some(site_id) = site_id else {
        return resolution;
    };

    let floor_id: Option<String> = resolve_floor(refs, &site_id, index, options, &mut resolution.findings);
    let space_id: Option<String> = floor_id
        .as_deref()
        .and_then(|floor_id| resolve_space(refs, floor_id, index, options, &mut resolution.findings));

    resolution.ids.site_id = Some(site_id);
    resolution.ids.floor_id = floor_id;
    resolution.ids.space_id = space_id;
    resolution
}

fn resolve_site(
    refs: &LocationRefs,
    index: &LookupIndex,
    findings: &mut Vec<ResolutionError>,
) -> Option<String> {
    if let Some(id) = &refs.site_id {
        if !index.has_site(id) {
            findings.push(ResolutionError::UnknownReference {
                kind: ReferenceKind::Site,
                id: id.clone(),
            });
        }
        return Some(id.clone());
    }

    let Some(name) = &refs.site_name else {
        findings.push(ResolutionError::MissingSite);
        return None;
    };

    let found: Option<String> = index.site_by_name(name).map(String::from);
    if found.is_none() {
        findings.push(ResolutionError::SiteNotFound { name: name.clone() });
    }
    found
}

fn resolve_floor(
    refs: &LocationRefs,
    site_id: &str,
    index: &LookupIndex,
    options: &ValidationOptions,
    findings: &mut Vec<ResolutionError>,
) -> Option<String> {
    if let Some(id) = &refs.floor_id {
        match index.site_of_floor(id) {
            Some(parent) if parent != site_id => findings.push(ResolutionError::FloorNotInSite {
                floor: id.clone(),
                site_id: site_id.to_string(),
            }),
            Some(_) => {}
            None => findings.push(ResolutionError::UnknownReference {
                kind: ReferenceKind::Floor,
                id: id.clone(),
            }),
        }
        return Some(id.clone());
    }

    let name: &String = refs.floor_name.as_ref()?;
    if let Some(found) = index.floor_in_site(site_id, name) {
        return Some(found.to_string());
    }

    if options.unscoped_fallback
        && let Some(found) = index.floor_anywhere(name)
    {
        let parent_site_id: &str = index.site_of_floor(found).unwrap_or_default();
        debug!(floor = %name, site_id, floor_id = found, parent_site_id, "Floor matched outside the row's site");
        if parent_site_id != site_id {
            findings.push(ResolutionError::FloorOutsideSite {
                floor: name.clone(),
                floor_id: found.to_string(),
                parent_site_id: parent_site_id.to_string(),
                site_id: site_id.to_string(),
            });
        }
        return Some(found.to_string());
    }

    findings.push(ResolutionError::FloorNotInSite {
        floor: name.clone(),
        site_id: site_id.to_string(),
    });
    None
}

fn resolve_space(
    refs: &LocationRefs,
    floor_id: &str,
    index: &LookupIndex,
    options: &ValidationOptions,
    findings: &mut Vec<ResolutionError>,
) -> Option<String> {
    if let Some(id) = &refs.space_id {
        match index.floor_of_space(id) {
            Some(parent) if parent != floor_id => findings.push(ResolutionError::SpaceNotInFloor {
                space: id.clone(),
                floor_id: floor_id.to_string(),
            }),
            Some(_) => {}
            None => findings.push(ResolutionError::UnknownReference {
                kind: ReferenceKind::Space,
                id: id.clone(),
            }),
        }
        return Some(id.clone());
    }

    let name: &String = refs.space_name.as_ref()?;
    if let Some(found) = index.space_in_floor(floor_id, name) {
        return Some(found.to_string());
    }

    if options.unscoped_fallback
        && let Some(found) = index.space_anywhere(name)
    {
        let parent_floor_id: &str = index.floor_of_space(found).unwrap_or_default();
        debug!(space = %name, floor_id, space_id = found, parent_floor_id, "Space matched outside the row's floor");
        if parent_floor_id != floor_id {
            findings.push(ResolutionError::SpaceOutsideFloor {
                space: name.clone(),
                space_id: found.to_string(),
                parent_floor_id: parent_floor_id.to_string(),
                floor_id: floor_id.to_string(),
            });
        }
        return Some(found.to_string());
    }

    findings.push(ResolutionError::SpaceNotInFloor {
        space: name.clone(),
        floor_id: floor_id.to_string(),
    });
    None
}

/// One way of identifying an owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OwnerStrategy {
    EmployeeId,
    Name,
    Email,
}

/// What a single owner strategy produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrategyOutcome {
    /// The row does not carry this kind of reference.
    NotApplicable,
    Found(String),
    /// The reference was given but the index does not know it.
    NotFound(String),
}

impl OwnerStrategy {
    /// Strategies in the order they are tried.
    pub const ORDER: [Self; 3] = [Self::EmployeeId, Self::Name, Self::Email];

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::EmployeeId => "employee id",
            Self::Name => "name",
            Self::Email => "email",
        }
    }

    /// Attempts this strategy alone.
    ///
    /// An employee id is accepted verbatim, so it never reports `NotFound`.
    #[must_use]
    pub fn attempt(&self, owner: &OwnerRefs, index: &LookupIndex) -> StrategyOutcome {
        match self {
            Self::EmployeeId => owner
                .employee_id
                .clone()
                .map_or(StrategyOutcome::NotApplicable, StrategyOutcome::Found),
            Self::Name => lookup_with(owner.name.as_deref(), |n| index.user_by_name(n)),
            Self::Email => lookup_with(owner.email.as_deref(), |e| index.user_by_email(e)),
        }
    }
}

fn lookup_with<'a>(
    reference: Option<&str>,
    lookup: impl Fn(&str) -> Option<&'a str>,
) -> StrategyOutcome {
    match reference {
        None => StrategyOutcome::NotApplicable,
        Some(value) => lookup(value).map_or_else(
            || StrategyOutcome::NotFound(value.to_string()),
            |id| StrategyOutcome::Found(id.to_string()),
        ),
    }
}

/// Resolves the owner of a row by trying each [`OwnerStrategy`] in order.
#[must_use]
pub fn resolve_owner(owner: &OwnerRefs, index: &LookupIndex) -> Resolution {
    let mut resolution: Resolution = Resolution::default();
    if owner.is_empty() {
        resolution.findings.push(ResolutionError::MissingOwner);
        return resolution;
    }

    let mut tried: Vec<String> = Vec::new();
    for strategy in OwnerStrategy::ORDER {
        match strategy.attempt(owner, index) {
            StrategyOutcome::Found(id) => {
                if strategy == OwnerStrategy::EmployeeId && !index.has_user(&id) {
                    resolution.findings.push(ResolutionError::UnknownReference {
                        kind: ReferenceKind::Owner,
                        id: id.clone(),
                    });
                }
                resolution.ids.owner_id = Some(id);
                return resolution;
            }
            StrategyOutcome::NotFound(value) => {
                tried.push(format!("{} '{value}'", strategy.label()));
            }
            StrategyOutcome::NotApplicable => {}
        }
    }

    resolution
        .findings
        .push(ResolutionError::OwnerNotFound { tried });
    resolution
}
