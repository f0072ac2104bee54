//! Store client
//!
//! The client is built explicitly from a [`StoreConfig`] and passed to
//! whoever needs it. It owns the backend, tracks the signed-in user and
//! scopes every call to that user. After [`StoreClient::close`] every call
//! fails with [`StoreError::Closed`].

use std::sync::Arc;

use cardvault_core::{CardRecord, Pin, RecordId, SecuredRecord, VaultStats};
use cardvault_reveal::RevealPolicy;
use chrono::NaiveDate;
use tracing::{debug, info};

use crate::config::StoreConfig;
use crate::error::{Result, StoreError};
use crate::file::FileStore;
use crate::memory::MemoryStore;
use crate::session::UserSession;
use crate::store::{Profile, RecordStore, StoredRecord};

/// Vault client bound to one backend
pub struct StoreClient {
    config: StoreConfig,
    backend: Option<Arc<dyn RecordStore>>,
    session: Option<UserSession>,
}

impl StoreClient {
    /// Open the file store described by `config`.
    ///
    /// Signs in as `config.owner` when set.
    pub async fn open(config: StoreConfig) -> Result<Self> {
        config.validate()?;
        config.ensure_directories()?;
        let backend = FileStore::open(config.records_dir()).await?;
        info!("Vault opened at {:?}", config.data_dir);
        Ok(Self::with_backend(config, Arc::new(backend)))
    }

    /// Client over a fresh in-memory store
    pub fn in_memory(config: StoreConfig) -> Self {
        Self::with_backend(config, Arc::new(MemoryStore::new()))
    }

    /// Client over any backend
    pub fn with_backend(config: StoreConfig, backend: Arc<dyn RecordStore>) -> Self {
        let session = config.owner.clone().map(UserSession::new);
        Self {
            config,
            backend: Some(backend),
            session,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Policies reveal sessions should run under
    pub fn reveal_policy(&self) -> RevealPolicy {
        self.config.reveal_policy()
    }

    pub fn sign_in(&mut self, session: UserSession) -> Result<()> {
        self.backend()?;
        debug!("Signed in as {}", session.user_id);
        self.session = Some(session);
        Ok(())
    }

    pub fn sign_out(&mut self) {
        if let Some(session) = self.session.take() {
            debug!("Signed out {}", session.user_id);
        }
    }

    /// The signed-in user
    pub fn session(&self) -> Result<&UserSession> {
        self.backend()?;
        self.session.as_ref().ok_or(StoreError::NotAuthenticated)
    }

    pub fn is_closed(&self) -> bool {
        self.backend.is_none()
    }

    /// Release the backend and sign out
    pub fn close(&mut self) {
        if self.backend.take().is_some() {
            self.session = None;
            info!("Vault closed");
        }
    }

    fn backend(&self) -> Result<&Arc<dyn RecordStore>> {
        self.backend.as_ref().ok_or(StoreError::Closed)
    }

    fn scoped(&self) -> Result<(&Arc<dyn RecordStore>, &UserSession)> {
        let backend = self.backend()?;
        let session = self.session.as_ref().ok_or(StoreError::NotAuthenticated)?;
        Ok((backend, session))
    }

    pub async fn add(&self, record: impl Into<SecuredRecord>) -> Result<StoredRecord> {
        let (backend, session) = self.scoped()?;
        let stored = backend.insert(session.owner(), record.into()).await?;
        info!("Added {} {}", stored.record.kind(), stored.id.short());
        Ok(stored)
    }

    /// Every record, newest first
    pub async fn list(&self) -> Result<Vec<StoredRecord>> {
        let (backend, session) = self.scoped()?;
        backend.list(session.owner()).await
    }

    pub async fn cards(&self) -> Result<Vec<StoredRecord>> {
        let mut records = self.list().await?;
        records.retain(|r| r.record.as_card().is_some());
        Ok(records)
    }

    pub async fn documents(&self) -> Result<Vec<StoredRecord>> {
        let mut records = self.list().await?;
        records.retain(|r| r.record.as_document().is_some());
        Ok(records)
    }

    pub async fn get(&self, id: RecordId) -> Result<StoredRecord> {
        let (backend, session) = self.scoped()?;
        backend.get(session.owner(), id).await
    }

    /// Gate PIN for a reveal, `None` for ungated documents
    pub async fn record_pin(&self, id: RecordId) -> Result<Option<Pin>> {
        let (backend, session) = self.scoped()?;
        backend.get_record_pin(session.owner(), id).await
    }

    pub async fn delete(&self, id: RecordId) -> Result<()> {
        let (backend, session) = self.scoped()?;
        backend.delete(session.owner(), id).await?;
        info!("Deleted record {}", id.short());
        Ok(())
    }

    pub async fn delete_all(&self) -> Result<usize> {
        let (backend, session) = self.scoped()?;
        let removed = backend.delete_all(session.owner()).await?;
        info!("Deleted {} records", removed);
        Ok(removed)
    }

    /// Profile of the signed-in user, defaulted from the session if none
    /// was saved yet
    pub async fn profile(&self) -> Result<Profile> {
        let (backend, session) = self.scoped()?;
        let profile = backend
            .get_profile(session.owner())
            .await?
            .unwrap_or_else(|| {
                let mut profile = Profile::new(session.user_id.clone());
                profile.email = session.email.clone();
                profile
            });
        Ok(profile)
    }

    pub async fn set_display_name(&self, name: Option<String>) -> Result<Profile> {
        let (backend, session) = self.scoped()?;
        backend.update_display_name(session.owner(), name).await
    }

    /// Card statistics relative to `as_of`
    pub async fn stats(&self, as_of: NaiveDate) -> Result<VaultStats> {
        let records = self.list().await?;
        let cards: Vec<&CardRecord> = records.iter().filter_map(|r| r.record.as_card()).collect();
        Ok(VaultStats::from_cards(cards, as_of))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardvault_core::OwnerId;

    #[tokio::test]
    async fn test_requires_sign_in() {
        let client = StoreClient::in_memory(StoreConfig::default());
        assert!(matches!(client.list().await, Err(StoreError::NotAuthenticated)));
        assert!(matches!(client.session(), Err(StoreError::NotAuthenticated)));
    }

    #[tokio::test]
    async fn test_owner_from_config_signs_in() {
        let mut config = StoreConfig::default();
        config.owner = Some(OwnerId::new("bob").unwrap());
        let client = StoreClient::in_memory(config);

        assert_eq!(client.session().unwrap().user_id.as_str(), "bob");
        assert!(client.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_close_rejects_everything() {
        let mut client = StoreClient::in_memory(StoreConfig::default());
        client
            .sign_in(UserSession::new(OwnerId::new("bob").unwrap()))
            .unwrap();
        client.close();

        assert!(client.is_closed());
        assert!(matches!(client.list().await, Err(StoreError::Closed)));
        assert!(matches!(
            client.sign_in(UserSession::new(OwnerId::new("bob").unwrap())),
            Err(StoreError::Closed)
        ));
    }

    #[tokio::test]
    async fn test_default_profile_uses_session_email() {
        let mut client = StoreClient::in_memory(StoreConfig::default());
        client
            .sign_in(UserSession::with_email(
                OwnerId::new("bob").unwrap(),
                "bob@example.com",
            ))
            .unwrap();

        let profile = client.profile().await.unwrap();
        assert_eq!(profile.email.as_deref(), Some("bob@example.com"));
        assert!(profile.display_name.is_none());
    }
}
