// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chrono::NaiveDate;
use roster_import_domain::{JobRow, LocationRefs, OwnerRefs};

use crate::{
    FloorRecord, LookupIndex, ReferenceData, RemoteId, SiteRecord, SpaceRecord, UserRecord,
};

fn id(n: i64) -> RemoteId {
    RemoteId::Number(n)
}

/// Two sites that both have a "Ground Floor", one space per floor and two users.
pub fn create_test_reference_data() -> ReferenceData {
    ReferenceData {
        sites: vec![
            SiteRecord {
                id: id(1),
                name: String::from("Main Building"),
            },
            SiteRecord {
                id: id(2),
                name: String::from("Annex"),
            },
        ],
        floors: vec![
            FloorRecord {
                id: id(10),
                name: String::from("Ground Floor"),
                site_id: id(1),
            },
            FloorRecord {
                id: id(11),
                name: String::from("First Floor"),
                site_id: id(1),
            },
            FloorRecord {
                id: id(20),
                name: String::from("Ground Floor"),
                site_id: id(2),
            },
        ],
        spaces: vec![
            SpaceRecord {
                id: id(100),
                name: String::from("Lobby"),
                floor_id: id(10),
            },
            SpaceRecord {
                id: id(110),
                name: String::from("Server Room"),
                floor_id: id(11),
            },
        ],
        users: vec![
            UserRecord {
                id: id(500),
                user_name: Some(String::from("Jane Smith")),
                email: Some(String::from("jane@example.com")),
            },
            UserRecord {
                id: id(501),
                user_name: Some(String::from("Bob Jones")),
                email: Some(String::from("bob@example.com")),
            },
        ],
    }
}

pub fn create_test_index() -> LookupIndex {
    LookupIndex::build(&create_test_reference_data())
}

pub fn create_test_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
}

/// A valid one-off row on the Main Building ground floor.
pub fn create_test_row(row_number: usize) -> JobRow {
    JobRow {
        title: Some(String::from("Replace air filters")),
        date_start: Some(String::from("2026-11-05")),
        date_end: Some(String::from("2026-11-05")),
        hour_start: Some(String::from("9")),
        minute_start: Some(String::from("0")),
        hour_end: Some(String::from("10")),
        minute_end: Some(String::from("30")),
        location: LocationRefs {
            site_name: Some(String::from("Main Building")),
            floor_name: Some(String::from("Ground Floor")),
            ..LocationRefs::default()
        },
        owner: OwnerRefs {
            name: Some(String::from("Jane Smith")),
            ..OwnerRefs::default()
        },
        ..JobRow::new(row_number)
    }
}
