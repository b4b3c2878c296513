//! # Redis
//!
//! Backing store for deployments.
//!
//! Pitches and authors are JSON documents under `pitch:{id}` and
//! `author:{id}`, with a set per author indexing their pitch ids.
//!
//! ## Requirements
//!
//! - Fast lookups by id
//! - Small documents, modest write rate
//! - Create must not overwrite (`SET NX`)
use std::time::Duration;

use async_trait::async_trait;
use redis::{
    AsyncCommands, Client,
    aio::{ConnectionManager, ConnectionManagerConfig},
};

use crate::store::{AuthorProfile, ContentStore, PitchRecord, ReadMode, StoreError};

pub struct RedisStore {
    connection: ConnectionManager,
}

impl RedisStore {
    pub async fn connect(redis_url: &str) -> Self {
        let config = ConnectionManagerConfig::new()
            .set_number_of_retries(1)
            .set_connection_timeout(Duration::from_millis(100));

        let client = Client::open(redis_url).unwrap();
        let connection = client
            .get_connection_manager_with_config(config)
            .await
            .unwrap();

        Self { connection }
    }
}

fn pitch_key(id: &str) -> String {
    format!("pitch:{id}")
}

fn author_key(id: &str) -> String {
    format!("author:{id}")
}

fn author_index_key(id: &str) -> String {
    format!("author:{id}:pitches")
}

impl From<redis::RedisError> for StoreError {
    fn from(error: redis::RedisError) -> Self {
        StoreError::Backend(error.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(error: serde_json::Error) -> Self {
        StoreError::Backend(error.to_string())
    }
}

#[async_trait]
impl ContentStore for RedisStore {
    // Redis has no cache tier in front of it, both modes read the document.
    async fn fetch_pitch(
        &self,
        id: &str,
        _mode: ReadMode,
    ) -> Result<Option<PitchRecord>, StoreError> {
        let mut connection = self.connection.clone();

        let raw: Option<String> = connection.get(pitch_key(id)).await?;

        match raw {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn fetch_author(&self, id: &str) -> Result<Option<AuthorProfile>, StoreError> {
        let mut connection = self.connection.clone();

        let raw: Option<String> = connection.get(author_key(id)).await?;

        match raw {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn pitches_by_author(&self, author_id: &str) -> Result<Vec<PitchRecord>, StoreError> {
        let mut connection = self.connection.clone();

        let ids: Vec<String> = connection.smembers(author_index_key(author_id)).await?;

        let mut records = Vec::with_capacity(ids.len());
        for id in ids {
            let raw: Option<String> = connection.get(pitch_key(&id)).await?;
            if let Some(json) = raw {
                records.push(serde_json::from_str(&json)?);
            }
        }

        records.sort_by(|a: &PitchRecord, b: &PitchRecord| b.created_at.cmp(&a.created_at));

        Ok(records)
    }

    async fn create_pitch(&self, record: &PitchRecord) -> Result<(), StoreError> {
        let mut connection = self.connection.clone();

        let json = serde_json::to_string(record)?;

        let created: bool = connection.set_nx(pitch_key(&record.id), json).await?;
        if !created {
            return Err(StoreError::Conflict(record.id.clone()));
        }

        let _: () = connection
            .sadd(author_index_key(&record.author_id), &record.id)
            .await?;

        Ok(())
    }

    async fn put_author(&self, author: &AuthorProfile) -> Result<(), StoreError> {
        let mut connection = self.connection.clone();

        let json = serde_json::to_string(author)?;
        let _: () = connection.set(author_key(&author.id), json).await?;

        Ok(())
    }

    // Whole-document write: concurrent patches to the same pitch can lose
    // an update. A views counter kept in its own key under INCR would not.
    async fn set_views(&self, id: &str, views: u64) -> Result<(), StoreError> {
        let mut connection = self.connection.clone();

        let raw: Option<String> = connection.get(pitch_key(id)).await?;
        let mut record: PitchRecord = match raw {
            Some(json) => serde_json::from_str(&json)?,
            None => return Err(StoreError::Missing(id.to_string())),
        };

        record.views = views;

        let _: () = connection
            .set(pitch_key(id), serde_json::to_string(&record)?)
            .await?;

        Ok(())
    }
}
