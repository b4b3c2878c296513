//! Document-level content store behind the persistence and view flows.
//!
//! Two backends implement [`ContentStore`]: an in-memory map used by tests
//! and local runs, and Redis for deployments. Reads come in two modes
//! because the view counter must never be computed from a cached value.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PitchRecord {
    pub id: String,
    pub author_id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub link: String,
    #[serde(rename = "pitch")]
    pub pitch_body: String,
    pub views: u64,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuthorProfile {
    pub id: String,
    pub name: String,
    pub avatar: String,
    pub bio: String,
}

/// `Cached` may serve a stale copy, `BypassCache` always reads the backing
/// document.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ReadMode {
    Cached,
    BypassCache,
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("document already exists: {0}")]
    Conflict(String),

    #[error("document not found: {0}")]
    Missing(String),

    #[error("store backend error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn fetch_pitch(
        &self,
        id: &str,
        mode: ReadMode,
    ) -> Result<Option<PitchRecord>, StoreError>;

    async fn fetch_author(&self, id: &str) -> Result<Option<AuthorProfile>, StoreError>;

    /// Newest first.
    async fn pitches_by_author(&self, author_id: &str) -> Result<Vec<PitchRecord>, StoreError>;

    /// Atomic create. Fails with [`StoreError::Conflict`] instead of
    /// overwriting an existing document.
    async fn create_pitch(&self, record: &PitchRecord) -> Result<(), StoreError>;

    async fn put_author(&self, author: &AuthorProfile) -> Result<(), StoreError>;

    async fn set_views(&self, id: &str, views: u64) -> Result<(), StoreError>;
}

impl dyn ContentStore {
    /// Start a document patch: `store.patch(id).set_views(n).commit()`.
    pub fn patch<'a>(&'a self, id: &str) -> Patch<'a> {
        Patch {
            store: self,
            id: id.to_string(),
            views: None,
        }
    }
}

/// Pending field updates for one document, applied atomically on commit.
pub struct Patch<'a> {
    store: &'a dyn ContentStore,
    id: String,
    views: Option<u64>,
}

impl Patch<'_> {
    pub fn set_views(mut self, views: u64) -> Self {
        self.views = Some(views);
        self
    }

    pub async fn commit(self) -> Result<(), StoreError> {
        if let Some(views) = self.views {
            self.store.set_views(&self.id, views).await?;
        }

        Ok(())
    }
}
