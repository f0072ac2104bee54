//! In-memory record store

use std::collections::HashMap;

use async_trait::async_trait;
use cardvault_core::{OwnerId, RecordId, SecuredRecord};
use tokio::sync::RwLock;
use tracing::warn;

use crate::error::{Result, StoreError};
use crate::store::{Profile, RecordRow, RecordStore, StoredRecord};

/// Store that keeps sealed rows in memory, in insertion order
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: RwLock<Vec<RecordRow>>,
    profiles: RwLock<HashMap<OwnerId, Profile>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a row as-is, bypassing validation
    pub async fn insert_row(&self, row: RecordRow) {
        self.rows.write().await.push(row);
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert(&self, owner: &OwnerId, record: SecuredRecord) -> Result<StoredRecord> {
        let row = RecordRow::seal(owner, &record)?;
        let stored = StoredRecord {
            id: row.id,
            owner: owner.clone(),
            created_at: row.created_at,
            record,
        };
        self.rows.write().await.push(row);
        Ok(stored)
    }

    async fn list(&self, owner: &OwnerId) -> Result<Vec<StoredRecord>> {
        let rows = self.rows.read().await;
        let records = rows
            .iter()
            .rev()
            .filter(|row| &row.owner == owner)
            .filter_map(|row| match row.open() {
                Ok(stored) => Some(stored),
                Err(e) => {
                    warn!("Skipping unreadable record {}: {}", row.id.short(), e);
                    None
                }
            })
            .collect();
        Ok(records)
    }

    async fn get(&self, owner: &OwnerId, id: RecordId) -> Result<StoredRecord> {
        let rows = self.rows.read().await;
        rows.iter()
            .find(|row| row.id == id && &row.owner == owner)
            .ok_or(StoreError::NotFound(id))?
            .open()
    }

    async fn delete(&self, owner: &OwnerId, id: RecordId) -> Result<()> {
        let mut rows = self.rows.write().await;
        let index = rows
            .iter()
            .position(|row| row.id == id && &row.owner == owner)
            .ok_or(StoreError::NotFound(id))?;
        rows.remove(index);
        Ok(())
    }

    async fn delete_all(&self, owner: &OwnerId) -> Result<usize> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|row| &row.owner != owner);
        Ok(before - rows.len())
    }

    async fn get_profile(&self, owner: &OwnerId) -> Result<Option<Profile>> {
        Ok(self.profiles.read().await.get(owner).cloned())
    }

    async fn put_profile(&self, profile: &Profile) -> Result<()> {
        self.profiles
            .write()
            .await
            .insert(profile.owner.clone(), profile.clone());
        Ok(())
    }
}
