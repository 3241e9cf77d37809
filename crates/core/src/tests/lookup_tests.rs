// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::sync::Arc;

use crate::tests::helpers::{create_test_index, create_test_reference_data};
use crate::{CoreError, LookupIndex, LookupStore, ReferenceData, RemoteId, SiteRecord};

#[test]
fn test_site_lookup_is_case_insensitive_and_trimmed() {
    let index: LookupIndex = create_test_index();

    for name in ["Main Building", "main building", " Main Building ", "MAIN BUILDING"] {
        assert_eq!(index.site_by_name(name), Some("1"));
    }
}

#[test]
fn test_lookup_does_not_match_partial_names() {
    let index: LookupIndex = create_test_index();
    assert_eq!(index.site_by_name("Main"), None);
    assert_eq!(index.site_by_name("Main  Building"), None);
}

#[test]
fn test_floor_lookup_is_scoped_to_site() {
    let index: LookupIndex = create_test_index();

    assert_eq!(index.floor_in_site("1", "ground floor"), Some("10"));
    assert_eq!(index.floor_in_site("2", "ground floor"), Some("20"));
    assert_eq!(index.floor_in_site("2", "First Floor"), None);
}

#[test]
fn test_unscoped_lookup_requires_unique_name() {
    let index: LookupIndex = create_test_index();

    assert_eq!(index.floor_anywhere("Ground Floor"), None);
    assert_eq!(index.floor_anywhere("First Floor"), Some("11"));
    assert_eq!(index.space_anywhere("server room"), Some("110"));
}

#[test]
fn test_parent_maps() {
    let index: LookupIndex = create_test_index();

    assert_eq!(index.site_of_floor("20"), Some("2"));
    assert_eq!(index.floor_of_space("100"), Some("10"));
    assert_eq!(index.floor_of_space("999"), None);
}

#[test]
fn test_user_lookup_by_name_and_email() {
    let index: LookupIndex = create_test_index();

    assert_eq!(index.user_by_name("jane smith"), Some("500"));
    assert_eq!(index.user_by_email(" BOB@example.com"), Some("501"));
    assert!(index.has_user("500"));
    assert!(!index.has_user("42"));
}

#[test]
fn test_duplicate_names_keep_first_entry() {
    let mut data: ReferenceData = create_test_reference_data();
    data.sites.push(SiteRecord {
        id: RemoteId::Number(3),
        name: String::from("main building"),
    });

    let index: LookupIndex = LookupIndex::build(&data);
    assert_eq!(index.site_by_name("Main Building"), Some("1"));
    assert!(index.has_site("3"));
}

#[test]
fn test_feed_records_accept_alternative_keys() {
    let json = r#"{
        "sites": [{"id": 7, "site_name": "Depot"}],
        "floors": [{"id": "8", "title": "Mezzanine", "siteId": 7}],
        "spaces": [{"id": 9, "name": "Cage", "floorId": "8"}],
        "users": [{"id": 10, "username": "Sam Lee"}, {"id": 11, "email": "ops@example.com"}]
    }"#;

    let data: ReferenceData = serde_json::from_str(json).unwrap();
    let index: LookupIndex = LookupIndex::build(&data);

    assert_eq!(index.site_by_name("depot"), Some("7"));
    assert_eq!(index.floor_in_site("7", "mezzanine"), Some("8"));
    assert_eq!(index.space_in_floor("8", "cage"), Some("9"));
    assert_eq!(index.user_by_name("sam lee"), Some("10"));
    assert_eq!(index.user_by_email("ops@example.com"), Some("11"));
}

#[test]
fn test_feed_records_with_several_spellings_take_the_first() {
    let json = r#"{
        "sites": [{"id": 1, "name": "Main", "title": "Main Campus"}, {"id": 2, "name": " ", "site_name": "Annex"}],
        "floors": [{"id": 3, "name": "Ground", "floor_name": "G", "siteId": 1, "site_id": 2, "location_id": 2}],
        "spaces": [{"id": 4, "space_name": "Lobby", "title": "Entrance", "floorId": null, "floor_id": 3}],
        "users": [{"id": 5, "user_name": "Jane Smith", "name": "J. Smith", "username": "jsmith"}]
    }"#;

    let data: ReferenceData = serde_json::from_str(json).unwrap();
    let index: LookupIndex = LookupIndex::build(&data);

    assert_eq!(data.sites[0].name, "Main");
    assert_eq!(index.site_by_name("annex"), Some("2"));
    assert_eq!(index.floor_in_site("1", "ground"), Some("3"));
    assert_eq!(index.space_in_floor("3", "lobby"), Some("4"));
    assert_eq!(data.users[0].user_name.as_deref(), Some("Jane Smith"));
}

#[test]
fn test_feed_record_without_parent_is_rejected() {
    let error = serde_json::from_str::<ReferenceData>(r#"{"floors": [{"id": 3, "name": "Ground"}]}"#)
        .unwrap_err();
    assert!(error.to_string().contains("floor record 3 has no site_id"));
}

#[test]
fn test_empty_store_is_unavailable() {
    let store: LookupStore = LookupStore::new();
    assert!(!store.is_loaded());
    assert_eq!(store.snapshot().unwrap_err(), CoreError::LookupUnavailable);
}

#[test]
fn test_replace_does_not_disturb_existing_snapshot() {
    let store: LookupStore = LookupStore::new();
    store.replace(create_test_index());
    let before: Arc<LookupIndex> = store.snapshot().unwrap();

    store.replace(LookupIndex::default());
    let after: Arc<LookupIndex> = store.snapshot().unwrap();

    assert_eq!(before.site_by_name("Main Building"), Some("1"));
    assert_eq!(after.site_by_name("Main Building"), None);
}
