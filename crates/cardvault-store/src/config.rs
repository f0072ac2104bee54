//! Vault configuration

use std::path::{Path, PathBuf};
use std::time::Duration;

use cardvault_core::OwnerId;
use cardvault_reveal::{DisclosurePolicy, LockoutPolicy, RevealPolicy, MAX_POLICY_DURATION};
use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};

/// Environment variable pointing at an alternative config file
pub const CONFIG_ENV: &str = "CARDVAULT_CONFIG";

/// Environment variable overriding the signed-in owner
pub const OWNER_ENV: &str = "CARDVAULT_OWNER";

/// Configuration file name
const CONFIG_FILE_NAME: &str = "config.json";

/// Directory name under the platform config and data dirs
const APP_DIR_NAME: &str = "cardvault";

/// Vault configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Where records and profiles are kept
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// User signed in on startup
    #[serde(default)]
    pub owner: Option<OwnerId>,

    /// Wrong PINs allowed before a reveal locks
    #[serde(default = "default_max_attempts")]
    pub lockout_max_attempts: u32,

    /// Lockout length (seconds)
    #[serde(default = "default_lockout_secs")]
    pub lockout_duration_secs: u64,

    /// How long revealed fields stay visible (seconds)
    #[serde(default = "default_disclosure_secs")]
    pub disclosure_secs: u64,
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

fn default_max_attempts() -> u32 {
    3
}

fn default_lockout_secs() -> u64 {
    30
}

fn default_disclosure_secs() -> u64 {
    60
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            owner: None,
            lockout_max_attempts: default_max_attempts(),
            lockout_duration_secs: default_lockout_secs(),
            disclosure_secs: default_disclosure_secs(),
        }
    }
}

impl StoreConfig {
    /// Config rooted at `data_dir` with default policies
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Config file path: `$CARDVAULT_CONFIG`, else the platform config dir
    pub fn default_path() -> PathBuf {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return PathBuf::from(path);
        }
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, falling back to defaults when the file is missing.
    ///
    /// The flag is `true` when defaults were used.
    pub fn load_or_default(path: &Path) -> Result<(Self, bool)> {
        if path.exists() {
            Ok((Self::load(path)?, false))
        } else {
            Ok((Self::default(), true))
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply `CARDVAULT_OWNER` if set
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(owner) = std::env::var(OWNER_ENV) {
            let owner = OwnerId::new(owner).map_err(|e| StoreError::Config(e.to_string()))?;
            self.owner = Some(owner);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.lockout_max_attempts == 0 {
            return Err(StoreError::Config(
                "lockout_max_attempts must be at least 1".to_string(),
            ));
        }
        if self.disclosure_secs == 0 {
            return Err(StoreError::Config(
                "disclosure_secs must be at least 1".to_string(),
            ));
        }
        let max_secs = MAX_POLICY_DURATION.as_secs();
        for (name, secs) in [
            ("lockout_duration_secs", self.lockout_duration_secs),
            ("disclosure_secs", self.disclosure_secs),
        ] {
            if secs > max_secs {
                return Err(StoreError::Config(format!(
                    "{} must be at most {}",
                    name, max_secs
                )));
            }
        }
        Ok(())
    }

    /// Create directories if they don't exist
    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.data_dir)?;
        Ok(())
    }

    /// Records directory under the data dir
    pub fn records_dir(&self) -> PathBuf {
        self.data_dir.join("records")
    }

    /// Log file used by the terminal UI
    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join("cardvault-tui.log")
    }

    /// Policies for reveal sessions
    pub fn reveal_policy(&self) -> RevealPolicy {
        RevealPolicy::new(
            LockoutPolicy::new(
                self.lockout_max_attempts,
                Duration::from_secs(self.lockout_duration_secs),
            ),
            DisclosurePolicy::new(Duration::from_secs(self.disclosure_secs)),
        )
    }
}
