// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reference-data snapshot used by name resolution.
//!
//! A [`LookupIndex`] is built once from the site, floor, space and user feeds
//! and never mutated afterwards. [`LookupStore`] holds the current snapshot;
//! refreshing swaps in a new `Arc`, so a pass that already took a snapshot
//! keeps reading the index it started with.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::CoreError;

/// Normalizes a name for matching: trimmed and lowercased.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// An identifier as sent by the remote API, either a number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RemoteId {
    Number(i64),
    Text(String),
}

impl RemoteId {
    /// Returns the identifier in its canonical text form.
    #[must_use]
    pub fn as_key(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.trim().to_string(),
        }
    }
}

/// One entry of the sites feed.
///
/// Feeds spell keys differently; when a record carries several spellings the
/// first non-blank one wins, in the order listed on each field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSiteRecord")]
pub struct SiteRecord {
    pub id: RemoteId,
    /// `name`, `site_name`, `title`.
    pub name: String,
}

/// One entry of the floors feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawFloorRecord")]
pub struct FloorRecord {
    pub id: RemoteId,
    /// `name`, `floor_name`, `title`.
    pub name: String,
    /// `siteId`, `site_id`, `location_id`.
    pub site_id: RemoteId,
}

/// One entry of the spaces feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSpaceRecord")]
pub struct SpaceRecord {
    pub id: RemoteId,
    /// `name`, `space_name`, `title`.
    pub name: String,
    /// `floorId`, `floor_id`.
    pub floor_id: RemoteId,
}

/// One entry of the users feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawUserRecord")]
pub struct UserRecord {
    pub id: RemoteId,
    /// `user_name`, `username`, `name`.
    pub user_name: Option<String>,
    pub email: Option<String>,
}

#[derive(Deserialize)]
struct RawSiteRecord {
    id: RemoteId,
    name: Option<String>,
    site_name: Option<String>,
    title: Option<String>,
}

#[derive(Deserialize)]
struct RawFloorRecord {
    id: RemoteId,
    name: Option<String>,
    floor_name: Option<String>,
    title: Option<String>,
    #[serde(rename = "siteId")]
    site_id_camel: Option<RemoteId>,
    site_id: Option<RemoteId>,
    location_id: Option<RemoteId>,
}

#[derive(Deserialize)]
struct RawSpaceRecord {
    id: RemoteId,
    name: Option<String>,
    space_name: Option<String>,
    title: Option<String>,
    #[serde(rename = "floorId")]
    floor_id_camel: Option<RemoteId>,
    floor_id: Option<RemoteId>,
}

#[derive(Deserialize)]
struct RawUserRecord {
    id: RemoteId,
    user_name: Option<String>,
    username: Option<String>,
    name: Option<String>,
    email: Option<String>,
}

impl TryFrom<RawSiteRecord> for SiteRecord {
    type Error = CoreError;

    fn try_from(raw: RawSiteRecord) -> Result<Self, Self::Error> {
        let name: String = first_text([raw.name, raw.site_name, raw.title])
            .ok_or_else(|| missing_key("site", &raw.id, "name"))?;
        Ok(Self { id: raw.id, name })
    }
}

impl TryFrom<RawFloorRecord> for FloorRecord {
    type Error = CoreError;

    fn try_from(raw: RawFloorRecord) -> Result<Self, Self::Error> {
        let name: String = first_text([raw.name, raw.floor_name, raw.title])
            .ok_or_else(|| missing_key("floor", &raw.id, "name"))?;
        let site_id: RemoteId = first_id([raw.site_id_camel, raw.site_id, raw.location_id])
            .ok_or_else(|| missing_key("floor", &raw.id, "site_id"))?;
        Ok(Self {
            id: raw.id,
            name,
            site_id,
        })
    }
}

impl TryFrom<RawSpaceRecord> for SpaceRecord {
    type Error = CoreError;

    fn try_from(raw: RawSpaceRecord) -> Result<Self, Self::Error> {
        let name: String = first_text([raw.name, raw.space_name, raw.title])
            .ok_or_else(|| missing_key("space", &raw.id, "name"))?;
        let floor_id: RemoteId = first_id([raw.floor_id_camel, raw.floor_id])
            .ok_or_else(|| missing_key("space", &raw.id, "floor_id"))?;
        Ok(Self {
            id: raw.id,
            name,
            floor_id,
        })
    }
}

impl From<RawUserRecord> for UserRecord {
    fn from(raw: RawUserRecord) -> Self {
        Self {
            id: raw.id,
            user_name: first_text([raw.user_name, raw.username, raw.name]),
            email: raw.email,
        }
    }
}

/// The first non-blank spelling, else the first one present at all.
fn first_text<const N: usize>(spellings: [Option<String>; N]) -> Option<String> {
    let mut blank: Option<String> = None;
    for value in spellings.into_iter().flatten() {
        if !value.trim().is_empty() {
            return Some(value);
        }
        blank.get_or_insert(value);
    }
    blank
}

fn first_id<const N: usize>(spellings: [Option<RemoteId>; N]) -> Option<RemoteId> {
    spellings
        .into_iter()
        .flatten()
        .find(|id| !id.as_key().is_empty())
}

fn missing_key(record: &'static str, id: &RemoteId, key: &'static str) -> CoreError {
    CoreError::MissingFeedKey {
        record,
        id: id.as_key(),
        key,
    }
}

/// The four reference feeds, fully fetched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceData {
    #[serde(default)]
    pub sites: Vec<SiteRecord>,
    #[serde(default)]
    pub floors: Vec<FloorRecord>,
    #[serde(default)]
    pub spaces: Vec<SpaceRecord>,
    #[serde(default)]
    pub users: Vec<UserRecord>,
}

/// Immutable name to id snapshot of the remote reference data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupIndex {
    site_by_name: HashMap<String, String>,
    site_ids: HashSet<String>,
    floor_by_site_and_name: HashMap<(String, String), String>,
    floor_site: HashMap<String, String>,
    floors_by_name: HashMap<String, Vec<String>>,
    space_by_floor_and_name: HashMap<(String, String), String>,
    space_floor: HashMap<String, String>,
    spaces_by_name: HashMap<String, Vec<String>>,
    user_by_name: HashMap<String, String>,
    user_by_email: HashMap<String, String>,
    user_ids: HashSet<String>,
}

impl LookupIndex {
    /// Builds an index from the reference feeds.
    ///
    /// When two entries share a normalized name in the same scope the first
    /// one wins and a warning is logged.
    #[must_use]
    pub fn build(data: &ReferenceData) -> Self {
        let mut index: Self = Self::default();

        for site in &data.sites {
            let id: String = site.id.as_key();
            index.site_ids.insert(id.clone());
            keep_first(
                &mut index.site_by_name,
                normalize_name(&site.name),
                id,
                "site",
            );
        }

        for floor in &data.floors {
            let id: String = floor.id.as_key();
            let site_id: String = floor.site_id.as_key();
            let name: String = normalize_name(&floor.name);
            index.floor_site.insert(id.clone(), site_id.clone());
            index
                .floors_by_name
                .entry(name.clone())
                .or_default()
                .push(id.clone());
            keep_first(
                &mut index.floor_by_site_and_name,
                (site_id, name),
                id,
                "floor",
            );
        }

        for space in &data.spaces {
            let id: String = space.id.as_key();
            let floor_id: String = space.floor_id.as_key();
            let name: String = normalize_name(&space.name);
            index.space_floor.insert(id.clone(), floor_id.clone());
            index
                .spaces_by_name
                .entry(name.clone())
                .or_default()
                .push(id.clone());
            keep_first(
                &mut index.space_by_floor_and_name,
                (floor_id, name),
                id,
                "space",
            );
        }

        for user in &data.users {
            let id: String = user.id.as_key();
            index.user_ids.insert(id.clone());
            if let Some(name) = user.user_name.as_deref().filter(|n| !n.trim().is_empty()) {
                keep_first(&mut index.user_by_name, normalize_name(name), id.clone(), "user name");
            }
            if let Some(email) = user.email.as_deref().filter(|e| !e.trim().is_empty()) {
                keep_first(&mut index.user_by_email, normalize_name(email), id, "user email");
            }
        }

        info!(
            sites = index.site_ids.len(),
            floors = index.floor_site.len(),
            spaces = index.space_floor.len(),
            users = index.user_ids.len(),
            "Built lookup index"
        );

        index
    }

    /// Looks up a site id by name.
    #[must_use]
    pub fn site_by_name(&self, name: &str) -> Option<&str> {
        self.site_by_name.get(&normalize_name(name)).map(String::as_str)
    }

    /// Looks up a floor id by name within one site.
    #[must_use]
    pub fn floor_in_site(&self, site_id: &str, name: &str) -> Option<&str> {
        self.floor_by_site_and_name
            .get(&(site_id.to_string(), normalize_name(name)))
            .map(String::as_str)
    }

    /// Looks up a space id by name within one floor.
    #[must_use]
    pub fn space_in_floor(&self, floor_id: &str, name: &str) -> Option<&str> {
        self.space_by_floor_and_name
            .get(&(floor_id.to_string(), normalize_name(name)))
            .map(String::as_str)
    }

    /// Looks up a floor by name across all sites.
    ///
    /// Only answers when exactly one floor carries the name.
    #[must_use]
    pub fn floor_anywhere(&self, name: &str) -> Option<&str> {
        unique(self.floors_by_name.get(&normalize_name(name)))
    }

    /// Looks up a space by name across all floors.
    ///
    /// Only answers when exactly one space carries the name.
    #[must_use]
    pub fn space_anywhere(&self, name: &str) -> Option<&str> {
        unique(self.spaces_by_name.get(&normalize_name(name)))
    }

    /// Looks up a user id by display name.
    #[must_use]
    pub fn user_by_name(&self, name: &str) -> Option<&str> {
        self.user_by_name.get(&normalize_name(name)).map(String::as_str)
    }

    /// Looks up a user id by email address.
    #[must_use]
    pub fn user_by_email(&self, email: &str) -> Option<&str> {
        self.user_by_email.get(&normalize_name(email)).map(String::as_str)
    }

    #[must_use]
    pub fn has_site(&self, site_id: &str) -> bool {
        self.site_ids.contains(site_id)
    }

    #[must_use]
    pub fn has_user(&self, user_id: &str) -> bool {
        self.user_ids.contains(user_id)
    }

    /// Returns the site a floor belongs to, if the floor is known.
    #[must_use]
    pub fn site_of_floor(&self, floor_id: &str) -> Option<&str> {
        self.floor_site.get(floor_id).map(String::as_str)
    }

    /// Returns the floor a space belongs to, if the space is known.
    #[must_use]
    pub fn floor_of_space(&self, space_id: &str) -> Option<&str> {
        self.space_floor.get(space_id).map(String::as_str)
    }
}

fn keep_first<K>(map: &mut HashMap<K, String>, key: K, id: String, kind: &str)
where
    K: std::hash::Hash + Eq + std::fmt::Debug,
{
    match map.get(&key) {
        Some(existing) if *existing != id => {
            warn!(
                kind,
                key = ?key,
                kept = %existing,
                ignored = %id,
                "Duplicate name in reference data, keeping the first entry"
            );
        }
        Some(_) => {}
        None => {
            map.insert(key, id);
        }
    }
}

fn unique(ids: Option<&Vec<String>>) -> Option<&str> {
    match ids.map(Vec::as_slice) {
        Some([only]) => Some(only.as_str()),
        _ => None,
    }
}

/// Holder of the current [`LookupIndex`] snapshot.
#[derive(Debug, Default)]
pub struct LookupStore {
    current: RwLock<Option<Arc<LookupIndex>>>,
}

impl LookupStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Swaps in a new snapshot.
    pub fn replace(&self, index: LookupIndex) {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *current = Some(Arc::new(index));
    }

    /// Returns the current snapshot.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::LookupUnavailable` if no reference data has been loaded.
    pub fn snapshot(&self) -> Result<Arc<LookupIndex>, CoreError> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(CoreError::LookupUnavailable)
    }

    /// Returns whether a snapshot has been loaded.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}
