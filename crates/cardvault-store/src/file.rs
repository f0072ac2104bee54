//! File-backed record store
//!
//! Layout under the root directory:
//!
//! ```text
//! <root>/<owner>/records/<record-id>.json
//! <root>/<owner>/profile.json
//! ```
//!
//! Writes go to a temp file that is renamed into place. Files are readable
//! by the current user only, and deleted rows are overwritten with zeros
//! before removal.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use cardvault_core::{OwnerId, RecordId, SecuredRecord};
use tokio::fs;
use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::error::{Result, StoreError};
use crate::store::{Profile, RecordRow, RecordStore, StoredRecord};

const RECORDS_DIR: &str = "records";
const PROFILE_FILE: &str = "profile.json";

/// Store keeping one JSON file per record
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `root`, creating it if needed
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        debug!("Opened file store at {:?}", root);
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn owner_dir(&self, owner: &OwnerId) -> PathBuf {
        self.root.join(owner.as_str())
    }

    fn records_dir(&self, owner: &OwnerId) -> PathBuf {
        self.owner_dir(owner).join(RECORDS_DIR)
    }

    fn record_path(&self, owner: &OwnerId, id: RecordId) -> PathBuf {
        self.records_dir(owner).join(format!("{}.json", id))
    }

    fn profile_path(&self, owner: &OwnerId) -> PathBuf {
        self.owner_dir(owner).join(PROFILE_FILE)
    }

    async fn read_row(&self, path: &Path) -> Result<RecordRow> {
        let content = Zeroizing::new(fs::read_to_string(path).await?);
        Ok(serde_json::from_str(&content)?)
    }

    async fn remove_row(&self, path: &Path) -> Result<()> {
        // Overwrite with zeros before deletion
        let len = fs::metadata(path).await?.len() as usize;
        fs::write(path, vec![0u8; len]).await?;
        fs::remove_file(path).await?;
        Ok(())
    }
}

/// Write to a temp file first, then rename for atomicity
async fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    let temp_path = path.with_extension("json.tmp");
    fs::write(&temp_path, content).await?;

    // Set restrictive permissions (Unix only)
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&temp_path, std::fs::Permissions::from_mode(0o600)).await?;
    }

    fs::rename(&temp_path, path).await?;
    Ok(())
}

#[async_trait]
impl RecordStore for FileStore {
    async fn insert(&self, owner: &OwnerId, record: SecuredRecord) -> Result<StoredRecord> {
        let row = RecordRow::seal(owner, &record)?;
        let content = Zeroizing::new(serde_json::to_vec_pretty(&row)?);
        write_atomic(&self.record_path(owner, row.id), &content).await?;
        debug!("Stored {} {}", record.kind(), row.id.short());

        Ok(StoredRecord {
            id: row.id,
            owner: owner.clone(),
            created_at: row.created_at,
            record,
        })
    }

    async fn list(&self, owner: &OwnerId) -> Result<Vec<StoredRecord>> {
        let dir = self.records_dir(owner);
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut records = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().map(|e| e != "json").unwrap_or(true) {
                continue;
            }

            let opened = match self.read_row(&path).await {
                Ok(row) if &row.owner == owner => row.open(),
                Ok(row) => {
                    warn!("Ignoring record {} filed under another owner", row.id.short());
                    continue;
                }
                Err(e) => Err(e),
            };
            match opened {
                Ok(stored) => records.push(stored),
                Err(e) => warn!("Skipping unreadable record {:?}: {}", path.file_name(), e),
            }
        }

        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    async fn get(&self, owner: &OwnerId, id: RecordId) -> Result<StoredRecord> {
        let path = self.record_path(owner, id);
        let row = match self.read_row(&path).await {
            Ok(row) => row,
            Err(StoreError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(id))
            }
            Err(e) => return Err(e),
        };
        if &row.owner != owner || row.id != id {
            return Err(StoreError::NotFound(id));
        }
        row.open()
    }

    async fn delete(&self, owner: &OwnerId, id: RecordId) -> Result<()> {
        let path = self.record_path(owner, id);
        if !fs::try_exists(&path).await? {
            return Err(StoreError::NotFound(id));
        }
        self.remove_row(&path).await?;
        debug!("Deleted record {}", id.short());
        Ok(())
    }

    async fn delete_all(&self, owner: &OwnerId) -> Result<usize> {
        let dir = self.records_dir(owner);
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let mut removed = 0;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().map(|e| e == "json").unwrap_or(false) {
                self.remove_row(&path).await?;
                removed += 1;
            }
        }
        debug!("Deleted {} records", removed);
        Ok(removed)
    }

    async fn get_profile(&self, owner: &OwnerId) -> Result<Option<Profile>> {
        let path = self.profile_path(owner);
        match fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn put_profile(&self, profile: &Profile) -> Result<()> {
        let content = serde_json::to_vec_pretty(profile)?;
        write_atomic(&self.profile_path(&profile.owner), &content).await
    }
}
