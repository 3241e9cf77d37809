// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use roster_import_domain::{IssueCode, JobRow, LocationRefs, OwnerRefs, ResolvedIds, Severity};

use crate::tests::helpers::{create_test_index, create_test_row};
use crate::{
    LookupIndex, OwnerStrategy, ReferenceKind, Resolution, ResolutionError, StrategyOutcome,
    ValidationOptions, resolve, resolve_location, resolve_owner,
};

fn location(site: &str, floor: Option<&str>, space: Option<&str>) -> LocationRefs {
    LocationRefs {
        site_name: Some(String::from(site)),
        floor_name: floor.map(String::from),
        space_name: space.map(String::from),
        ..LocationRefs::default()
    }
}

#[test]
fn test_resolves_full_hierarchy_by_name() {
    let index: LookupIndex = create_test_index();
    let refs: LocationRefs = location("main building", Some("GROUND FLOOR"), Some(" Lobby "));

    let resolution: Resolution = resolve_location(&refs, &index, &ValidationOptions::default());

    assert!(resolution.findings.is_empty());
    assert_eq!(resolution.ids.site_id.as_deref(), Some("1"));
    assert_eq!(resolution.ids.floor_id.as_deref(), Some("10"));
    assert_eq!(resolution.ids.space_id.as_deref(), Some("100"));
}

#[test]
fn test_resolution_is_idempotent() {
    let index: LookupIndex = create_test_index();
    let row: JobRow = create_test_row(2);

    let first: Resolution = resolve(&row, &index, &ValidationOptions::default());
    let second: Resolution = resolve(&row, &index, &ValidationOptions::default());
    assert_eq!(first, second);
}

#[test]
fn test_same_floor_name_resolves_per_site() {
    let index: LookupIndex = create_test_index();
    let options: ValidationOptions = ValidationOptions::default();

    let main = resolve_location(&location("Main Building", Some("Ground Floor"), None), &index, &options);
    let annex = resolve_location(&location("Annex", Some("Ground Floor"), None), &index, &options);

    assert_eq!(main.ids.floor_id.as_deref(), Some("10"));
    assert_eq!(annex.ids.floor_id.as_deref(), Some("20"));
}

#[test]
fn test_floor_from_other_site_is_rejected_by_default() {
    let index: LookupIndex = create_test_index();
    let refs: LocationRefs = location("Annex", Some("First Floor"), None);

    let resolution: Resolution = resolve_location(&refs, &index, &ValidationOptions::default());

    assert_eq!(
        resolution.findings,
        vec![ResolutionError::FloorNotInSite {
            floor: String::from("First Floor"),
            site_id: String::from("2")
        }]
    );
    assert_eq!(resolution.ids.floor_id, None);
}

#[test]
fn test_unscoped_fallback_warns_with_actual_parent_site() {
    let index: LookupIndex = create_test_index();
    let options: ValidationOptions = ValidationOptions::default().with_unscoped_fallback(true);

    let unique: Resolution =
        resolve_location(&location("Annex", Some("First Floor"), None), &index, &options);

    assert_eq!(unique.ids.floor_id.as_deref(), Some("11"));
    assert_eq!(
        unique.findings,
        vec![ResolutionError::FloorOutsideSite {
            floor: String::from("First Floor"),
            floor_id: String::from("11"),
            parent_site_id: String::from("1"),
            site_id: String::from("2"),
        }]
    );
    assert_eq!(unique.findings[0].severity(), Severity::Warn);
    assert!(unique.findings[0].to_string().contains("site 1"));
    assert!(!unique.is_blocked());
}

#[test]
fn test_unscoped_space_fallback_warns_with_actual_parent_floor() {
    let index: LookupIndex = create_test_index();
    let options: ValidationOptions = ValidationOptions::default().with_unscoped_fallback(true);
    let refs: LocationRefs = location("Main Building", Some("Ground Floor"), Some("Server Room"));

    let resolution: Resolution = resolve_location(&refs, &index, &options);

    assert_eq!(resolution.ids.space_id.as_deref(), Some("110"));
    assert_eq!(resolution.findings.len(), 1);
    assert_eq!(resolution.findings[0].code(), IssueCode::SpaceOutsideFloor);
    assert!(resolution.findings[0].to_string().contains("floor 11"));
    assert!(resolution.into_result().is_ok());
}

#[test]
fn test_unknown_site_skips_floor_and_space() {
    let index: LookupIndex = create_test_index();
    let refs: LocationRefs = location("Warehouse", Some("Ground Floor"), Some("Lobby"));

    let resolution: Resolution = resolve_location(&refs, &index, &ValidationOptions::default());

    assert_eq!(
        resolution.findings,
        vec![ResolutionError::SiteNotFound {
            name: String::from("Warehouse")
        }]
    );
    assert_eq!(resolution.ids, ResolvedIds::default());
}

#[test]
fn test_missing_site_and_space_without_floor() {
    let index: LookupIndex = create_test_index();
    let refs: LocationRefs = LocationRefs {
        space_name: Some(String::from("Lobby")),
        ..LocationRefs::default()
    };

    let resolution: Resolution = resolve_location(&refs, &index, &ValidationOptions::default());

    assert_eq!(
        resolution.findings,
        vec![ResolutionError::SpaceWithoutFloor, ResolutionError::MissingSite]
    );
}

#[test]
fn test_space_name_is_scoped_to_floor() {
    let index: LookupIndex = create_test_index();
    let refs: LocationRefs = location("Main Building", Some("Ground Floor"), Some("Server Room"));

    let resolution: Resolution = resolve_location(&refs, &index, &ValidationOptions::default());

    assert_eq!(resolution.findings[0].code(), IssueCode::SpaceNotInFloor);
    assert_eq!(resolution.ids.floor_id.as_deref(), Some("10"));
    assert_eq!(resolution.ids.space_id, None);
}

#[test]
fn test_explicit_ids_are_used_verbatim() {
    let index: LookupIndex = create_test_index();
    let refs: LocationRefs = LocationRefs {
        site_id: Some(String::from("1")),
        site_name: Some(String::from("Annex")),
        floor_id: Some(String::from("11")),
        space_id: Some(String::from("110")),
        ..LocationRefs::default()
    };

    let resolution: Resolution = resolve_location(&refs, &index, &ValidationOptions::default());

    assert!(resolution.findings.is_empty());
    assert_eq!(resolution.ids.site_id.as_deref(), Some("1"));
    assert_eq!(resolution.ids.space_id.as_deref(), Some("110"));
}

#[test]
fn test_explicit_floor_id_from_other_site_is_reported() {
    let index: LookupIndex = create_test_index();
    let refs: LocationRefs = LocationRefs {
        site_id: Some(String::from("2")),
        floor_id: Some(String::from("10")),
        ..LocationRefs::default()
    };

    let resolution: Resolution = resolve_location(&refs, &index, &ValidationOptions::default());

    assert_eq!(resolution.findings.len(), 1);
    assert_eq!(resolution.findings[0].code(), IssueCode::FloorNotInSite);
}

#[test]
fn test_unknown_explicit_id_blocks_the_row() {
    let index: LookupIndex = create_test_index();
    let refs: LocationRefs = LocationRefs {
        site_id: Some(String::from("999")),
        ..LocationRefs::default()
    };

    let resolution: Resolution = resolve_location(&refs, &index, &ValidationOptions::default());

    assert_eq!(
        resolution.findings,
        vec![ResolutionError::UnknownReference {
            kind: ReferenceKind::Site,
            id: String::from("999")
        }]
    );
    assert_eq!(resolution.findings[0].severity(), Severity::Error);
    assert_eq!(resolution.ids.site_id.as_deref(), Some("999"));
    assert!(resolution.is_blocked());
    assert!(resolution.into_result().is_err());
}

#[test]
fn test_owner_strategies_individually() {
    let index: LookupIndex = create_test_index();
    let owner: OwnerRefs = OwnerRefs {
        name: Some(String::from("Nobody")),
        email: Some(String::from("bob@example.com")),
        ..OwnerRefs::default()
    };

    assert_eq!(
        OwnerStrategy::EmployeeId.attempt(&owner, &index),
        StrategyOutcome::NotApplicable
    );
    assert_eq!(
        OwnerStrategy::Name.attempt(&owner, &index),
        StrategyOutcome::NotFound(String::from("Nobody"))
    );
    assert_eq!(
        OwnerStrategy::Email.attempt(&owner, &index),
        StrategyOutcome::Found(String::from("501"))
    );
}

#[test]
fn test_owner_name_preferred_over_email() {
    let index: LookupIndex = create_test_index();
    let owner: OwnerRefs = OwnerRefs {
        name: Some(String::from("Jane Smith")),
        email: Some(String::from("bob@example.com")),
        ..OwnerRefs::default()
    };

    let resolution: Resolution = resolve_owner(&owner, &index);
    assert_eq!(resolution.ids.owner_id.as_deref(), Some("500"));
}

#[test]
fn test_owner_falls_through_to_email() {
    let index: LookupIndex = create_test_index();
    let owner: OwnerRefs = OwnerRefs {
        name: Some(String::from("J. Smith")),
        email: Some(String::from("jane@example.com")),
        ..OwnerRefs::default()
    };

    let resolution: Resolution = resolve_owner(&owner, &index);
    assert!(resolution.findings.is_empty());
    assert_eq!(resolution.ids.owner_id.as_deref(), Some("500"));
}

#[test]
fn test_owner_not_found_names_every_reference() {
    let index: LookupIndex = create_test_index();
    let owner: OwnerRefs = OwnerRefs {
        name: Some(String::from("Nobody")),
        email: Some(String::from("nobody@example.com")),
        ..OwnerRefs::default()
    };

    let resolution: Resolution = resolve_owner(&owner, &index);
    assert_eq!(resolution.findings.len(), 1);
    assert_eq!(
        resolution.findings[0].to_string(),
        "Owner not found by name 'Nobody' or email 'nobody@example.com'"
    );
}

#[test]
fn test_missing_owner() {
    let index: LookupIndex = create_test_index();
    let resolution: Resolution = resolve_owner(&OwnerRefs::default(), &index);
    assert_eq!(resolution.findings, vec![ResolutionError::MissingOwner]);
}

#[test]
fn test_failures_accumulate_across_fields() {
    let index: LookupIndex = create_test_index();
    let mut row: JobRow = create_test_row(2);
    row.location = location("Warehouse", None, None);
    row.owner = OwnerRefs {
        email: Some(String::from("ghost@example.com")),
        ..OwnerRefs::default()
    };

    let errors = resolve(&row, &index, &ValidationOptions::default())
        .into_result()
        .unwrap_err();

    let codes: Vec<IssueCode> = errors.iter().map(ResolutionError::code).collect();
    assert_eq!(codes, vec![IssueCode::SiteNotFound, IssueCode::OwnerNotFound]);
}
