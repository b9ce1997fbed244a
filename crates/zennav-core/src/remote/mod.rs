//! Remote snapshot store
//!
//! The remote side of sync is one document per account, stored under a fixed
//! filename. An account is addressed only by its credential, so a new device
//! can find an existing snapshot without any locally cached id.
//!
//! ## Implementations
//!
//! - [`GistClient`]: GitHub Gists over HTTPS
//! - [`MemorySnapshotStore`]: in-memory, with call accounting and failure
//!   injection for tests

mod gist;
mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::SiteConfig;

pub use gist::GistClient;
pub use memory::{CallLog, MemorySnapshotStore};

/// Filename of the snapshot within the account
pub const SNAPSHOT_FILENAME: &str = "zennav_config.json";

/// Description attached to newly created snapshots
pub const SNAPSHOT_DESCRIPTION: &str = "ZenNav Configuration Sync";

/// Reference to an existing remote snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRef {
    /// Remote identifier (gist id)
    pub id: String,
}

impl SnapshotRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl std::fmt::Display for SnapshotRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.id)
    }
}

/// Result of looking up the account's snapshot
///
/// A failed listing is kept distinct from a genuine absence so callers can
/// choose their own policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotLookup {
    Found(SnapshotRef),
    NotFound,
    Failed(String),
}

/// Errors from snapshot writes and reads
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// Create or update was rejected or never reached the store
    #[error("Failed to write snapshot: {0}")]
    Write(String),

    /// Snapshot could not be fetched or parsed
    #[error("Failed to read snapshot: {0}")]
    Read(String),
}

/// Operations against the account's remote snapshot
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Locate the snapshot by its fixed filename
    async fn find_snapshot(&self, credential: &str) -> SnapshotLookup;

    /// Create a new snapshot holding `config`
    async fn create_snapshot(
        &self,
        credential: &str,
        config: &SiteConfig,
    ) -> Result<SnapshotRef, RemoteError>;

    /// Overwrite an existing snapshot with `config`
    async fn update_snapshot(
        &self,
        credential: &str,
        snapshot: &SnapshotRef,
        config: &SiteConfig,
    ) -> Result<SnapshotRef, RemoteError>;

    /// Fetch and parse the snapshot's document
    async fn read_snapshot(
        &self,
        credential: &str,
        snapshot: &SnapshotRef,
    ) -> Result<SiteConfig, RemoteError>;
}

/// Serialize the document the way it is stored remotely
pub(crate) fn snapshot_content(config: &SiteConfig) -> Result<String, RemoteError> {
    serde_json::to_string_pretty(config).map_err(|e| RemoteError::Write(e.to_string()))
}

/// Parse remote snapshot content
pub(crate) fn parse_snapshot(content: &str) -> Result<SiteConfig, RemoteError> {
    serde_json::from_str(content)
        .map_err(|e| RemoteError::Read(format!("invalid snapshot content: {}", e)))
}
