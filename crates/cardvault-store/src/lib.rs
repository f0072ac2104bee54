//! Card Vault Store - Owner-scoped persistence for secured records
//!
//! This crate provides:
//! - Vault configuration and reveal policy settings
//! - The authenticated user session
//! - The async [`RecordStore`] interface with in-memory and file backends
//! - [`StoreClient`], the explicitly constructed entry point hosts use

pub mod client;
pub mod config;
pub mod error;
pub mod file;
pub mod memory;
pub mod session;
pub mod store;

pub use client::StoreClient;
pub use config::StoreConfig;
pub use error::{Result, StoreError};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use session::UserSession;
pub use store::{Profile, RecordRow, RecordStore, StoredRecord};
