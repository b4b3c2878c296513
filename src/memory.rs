//! In-memory content store.
//!
//! Backs tests and local runs. Keeps a fill-on-miss read cache next to the
//! primary maps so the two [`ReadMode`]s behave differently: cached reads
//! can return a view count from before the last write, bypass reads cannot.
use std::{
    collections::HashMap,
    sync::RwLock,
};

use async_trait::async_trait;

use crate::store::{AuthorProfile, ContentStore, PitchRecord, ReadMode, StoreError};

#[derive(Default)]
pub struct MemoryStore {
    pitches: RwLock<HashMap<String, PitchRecord>>,
    authors: RwLock<HashMap<String, AuthorProfile>>,
    read_cache: RwLock<HashMap<String, PitchRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pitch_count(&self) -> usize {
        self.pitches.read().unwrap().len()
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn fetch_pitch(
        &self,
        id: &str,
        mode: ReadMode,
    ) -> Result<Option<PitchRecord>, StoreError> {
        if mode == ReadMode::Cached {
            if let Some(cached) = self.read_cache.read().unwrap().get(id) {
                return Ok(Some(cached.clone()));
            }
        }

        let record = self.pitches.read().unwrap().get(id).cloned();

        if let Some(record) = &record {
            self.read_cache
                .write()
                .unwrap()
                .insert(id.to_string(), record.clone());
        }

        Ok(record)
    }

    async fn fetch_author(&self, id: &str) -> Result<Option<AuthorProfile>, StoreError> {
        Ok(self.authors.read().unwrap().get(id).cloned())
    }

    async fn pitches_by_author(&self, author_id: &str) -> Result<Vec<PitchRecord>, StoreError> {
        let mut records: Vec<PitchRecord> = self
            .pitches
            .read()
            .unwrap()
            .values()
            .filter(|record| record.author_id == author_id)
            .cloned()
            .collect();

        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(records)
    }

    async fn create_pitch(&self, record: &PitchRecord) -> Result<(), StoreError> {
        let mut pitches = self.pitches.write().unwrap();

        if pitches.contains_key(&record.id) {
            return Err(StoreError::Conflict(record.id.clone()));
        }

        pitches.insert(record.id.clone(), record.clone());

        Ok(())
    }

    async fn put_author(&self, author: &AuthorProfile) -> Result<(), StoreError> {
        self.authors
            .write()
            .unwrap()
            .insert(author.id.clone(), author.clone());

        Ok(())
    }

    async fn set_views(&self, id: &str, views: u64) -> Result<(), StoreError> {
        let mut pitches = self.pitches.write().unwrap();

        match pitches.get_mut(id) {
            Some(record) => {
                record.views = views;
                Ok(())
            }
            None => Err(StoreError::Missing(id.to_string())),
        }
    }
}
