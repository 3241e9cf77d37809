// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Fetching the reference feeds and publishing a fresh lookup snapshot.

use async_trait::async_trait;
use roster_import::{
    FloorRecord, LookupIndex, LookupStore, ReferenceData, SiteRecord, SpaceRecord, UserRecord,
};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::error::ReferenceError;

/// Page size used for the users feed.
pub const USER_PAGE_LIMIT: u32 = 200;

/// A feed body: either a bare list or a list wrapped in `{"data": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Feed<T> {
    List(Vec<T>),
    Wrapped {
        #[serde(default = "Vec::new")]
        data: Vec<T>,
    },
}

impl<T> Feed<T> {
    #[must_use]
    pub fn into_records(self) -> Vec<T> {
        match self {
            Self::List(records) | Self::Wrapped { data: records } => records,
        }
    }
}

impl<T> Default for Feed<T> {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

/// Decodes a feed body.
///
/// # Errors
///
/// Returns `ReferenceError::Decode` if the body is neither a list nor a
/// `data`-wrapped list of records.
pub fn decode_feed<T: DeserializeOwned>(
    feed: &'static str,
    body: &str,
) -> Result<Vec<T>, ReferenceError> {
    serde_json::from_str::<Feed<T>>(body)
        .map(Feed::into_records)
        .map_err(|e| ReferenceError::Decode {
            feed,
            reason: e.to_string(),
        })
}

/// One page of the users feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPage {
    pub users: Vec<UserRecord>,
    /// Page count reported by the remote; at least 1.
    pub total_pages: u32,
}

#[derive(Deserialize)]
struct UserPageBody {
    #[serde(default)]
    data: Vec<UserRecord>,
    #[serde(default)]
    meta: PageMeta,
}

#[derive(Default, Deserialize)]
struct PageMeta {
    #[serde(default)]
    pagination: Pagination,
}

#[derive(Deserialize)]
struct Pagination {
    #[serde(default = "one")]
    total_pages: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self { total_pages: one() }
    }
}

const fn one() -> u32 {
    1
}

impl UserPage {
    /// Decodes a users page, `{"data": [...], "meta": {"pagination": {"total_pages": n}}}`.
    ///
    /// # Errors
    ///
    /// Returns `ReferenceError::Decode` if the body cannot be decoded.
    pub fn decode(body: &str) -> Result<Self, ReferenceError> {
        let page: UserPageBody =
            serde_json::from_str(body).map_err(|e| ReferenceError::Decode {
                feed: "users",
                reason: e.to_string(),
            })?;
        Ok(Self {
            users: page.data,
            total_pages: page.meta.pagination.total_pages.max(1),
        })
    }
}

/// The remote endpoints that publish reference data.
#[async_trait]
pub trait ReferenceSource: Send + Sync {
    /// # Errors
    ///
    /// Returns `ReferenceError` if the feed cannot be fetched.
    async fn sites(&self) -> Result<Vec<SiteRecord>, ReferenceError>;

    /// # Errors
    ///
    /// Returns `ReferenceError` if the feed cannot be fetched.
    async fn floors(&self) -> Result<Vec<FloorRecord>, ReferenceError>;

    /// # Errors
    ///
    /// Returns `ReferenceError` if the feed cannot be fetched.
    async fn spaces(&self) -> Result<Vec<SpaceRecord>, ReferenceError>;

    /// Fetches one 1-based page of users.
    ///
    /// # Errors
    ///
    /// Returns `ReferenceError` if the page cannot be fetched.
    async fn users_page(&self, page: u32, limit: u32) -> Result<UserPage, ReferenceError>;
}

/// Fetches every user page until the reported page count is reached.
///
/// # Errors
///
/// Returns the first `ReferenceError` raised by the source.
pub async fn fetch_users<R: ReferenceSource + ?Sized>(
    source: &R,
) -> Result<Vec<UserRecord>, ReferenceError> {
    let mut users: Vec<UserRecord> = Vec::new();
    let mut page: u32 = 1;

    loop {
        let fetched: UserPage = source.users_page(page, USER_PAGE_LIMIT).await?;
        debug!(page, total_pages = fetched.total_pages, count = fetched.users.len(), "Fetched user page");
        users.extend(fetched.users);
        if page >= fetched.total_pages {
            break;
        }
        page += 1;
    }

    Ok(users)
}

/// Fetches all four feeds.
///
/// # Errors
///
/// Returns the first `ReferenceError` raised by the source.
pub async fn fetch_reference_data<R: ReferenceSource + ?Sized>(
    source: &R,
) -> Result<ReferenceData, ReferenceError> {
    Ok(ReferenceData {
        sites: source.sites().await?,
        floors: source.floors().await?,
        spaces: source.spaces().await?,
        users: fetch_users(source).await?,
    })
}

/// Fetches the feeds, builds a new index and swaps it into the store.
///
/// The store keeps its previous snapshot if any feed fails.
///
/// # Errors
///
/// Returns the first `ReferenceError` raised by the source.
pub async fn load_reference_data<R: ReferenceSource + ?Sized>(
    source: &R,
    store: &LookupStore,
) -> Result<(), ReferenceError> {
    let data: ReferenceData = fetch_reference_data(source).await?;
    let index: LookupIndex = LookupIndex::build(&data);
    store.replace(index);
    info!("Reference data refreshed");
    Ok(())
}
