//! Record store interface
//!
//! A store is a table of sealed rows keyed by record ID and scoped by owner.
//! Records are validated and sealed on the way in and opened (decoded and
//! re-validated) on the way out, so nothing past this boundary ever sees a
//! malformed record.

use async_trait::async_trait;
use cardvault_core::{OwnerId, Pin, RecordId, SealedRecord, SecuredRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A decoded record together with its row metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    pub id: RecordId,
    pub owner: OwnerId,
    pub created_at: DateTime<Utc>,
    pub record: SecuredRecord,
}

/// A record in its at-rest shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordRow {
    pub id: RecordId,
    pub owner: OwnerId,
    pub created_at: DateTime<Utc>,
    pub sealed: SealedRecord,
}

impl RecordRow {
    /// Validate and seal a new record for `owner`
    pub fn seal(owner: &OwnerId, record: &SecuredRecord) -> Result<Self> {
        Ok(Self {
            id: RecordId::new(),
            owner: owner.clone(),
            created_at: Utc::now(),
            sealed: SealedRecord::seal(record)?,
        })
    }

    /// Decode the row back into a record
    pub fn open(&self) -> Result<StoredRecord> {
        Ok(StoredRecord {
            id: self.id,
            owner: self.owner.clone(),
            created_at: self.created_at,
            record: self.sealed.open()?,
        })
    }
}

/// Per-user profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub owner: OwnerId,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn new(owner: OwnerId) -> Self {
        Self {
            owner,
            email: None,
            display_name: None,
            updated_at: Utc::now(),
        }
    }
}

/// Owner-scoped record and profile storage
///
/// Every call names the owner it acts for. A record belonging to another
/// owner is reported as not found.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Validate, seal and store a record, returning it with its new ID
    async fn insert(&self, owner: &OwnerId, record: SecuredRecord) -> Result<StoredRecord>;

    /// Every readable record of `owner`, newest first.
    ///
    /// Rows that fail to decode are skipped.
    async fn list(&self, owner: &OwnerId) -> Result<Vec<StoredRecord>>;

    async fn get(&self, owner: &OwnerId, id: RecordId) -> Result<StoredRecord>;

    async fn delete(&self, owner: &OwnerId, id: RecordId) -> Result<()>;

    /// Delete every record of `owner`, returning how many were removed
    async fn delete_all(&self, owner: &OwnerId) -> Result<usize>;

    async fn get_profile(&self, owner: &OwnerId) -> Result<Option<Profile>>;

    async fn put_profile(&self, profile: &Profile) -> Result<()>;

    /// Set or clear the display name, creating the profile if needed
    async fn update_display_name(&self, owner: &OwnerId, name: Option<String>) -> Result<Profile> {
        let mut profile = self
            .get_profile(owner)
            .await?
            .unwrap_or_else(|| Profile::new(owner.clone()));
        profile.display_name = name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        profile.updated_at = Utc::now();
        self.put_profile(&profile).await?;
        Ok(profile)
    }

    /// The decoded gate PIN of a record, `None` for ungated documents
    async fn get_record_pin(&self, owner: &OwnerId, id: RecordId) -> Result<Option<Pin>> {
        let stored = self.get(owner, id).await?;
        Ok(stored.record.gate_pin().cloned())
    }
}
