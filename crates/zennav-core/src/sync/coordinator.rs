//! Synchronization coordinator
//!
//! Owns the committed configuration and sequences every sync operation:
//!
//! - **commit_and_mirror**: save the draft locally, then best-effort mirror it
//!   to the remote snapshot. The local write is complete before any remote
//!   call starts and is never rolled back.
//! - **push**: upload the committed configuration.
//! - **pull**: download the remote snapshot into an edit session's draft.
//!
//! Remote problems never surface as `Err`; every operation resolves to a
//! [`SyncOutcome`]. Only a failed local save is returned as an error.

use tokio::sync::watch;
use tracing::{info, warn};

use super::outcome::{RemoteAction, SyncError, SyncOperation, SyncOutcome, SyncStatus};
use crate::config::LookupFailurePolicy;
use crate::models::SiteConfig;
use crate::remote::{SnapshotLookup, SnapshotStore};
use crate::session::EditSession;
use crate::storage::{KeyValueStore, LocalPersistence, StorageResult};

/// Coordinates local commits with the remote snapshot
pub struct SyncCoordinator<S, R> {
    local: LocalPersistence<S>,
    remote: R,
    committed: SiteConfig,
    lookup_policy: LookupFailurePolicy,
    status: watch::Sender<SyncStatus>,
}

impl<S: KeyValueStore, R: SnapshotStore> SyncCoordinator<S, R> {
    /// Load the committed configuration and set up the coordinator
    pub fn open(local: LocalPersistence<S>, remote: R) -> Self {
        let committed = local.load();
        let (status, _) = watch::channel(SyncStatus::Idle);

        Self {
            local,
            remote,
            committed,
            lookup_policy: LookupFailurePolicy::default(),
            status,
        }
    }

    /// Choose what push and auto-mirror do when the lookup itself fails
    pub fn with_lookup_policy(mut self, policy: LookupFailurePolicy) -> Self {
        self.lookup_policy = policy;
        self
    }

    /// The configuration currently committed locally
    pub fn committed(&self) -> &SiteConfig {
        &self.committed
    }

    pub fn local(&self) -> &LocalPersistence<S> {
        &self.local
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    /// Current status
    pub fn status(&self) -> SyncStatus {
        *self.status.borrow()
    }

    /// Subscribe to status changes
    pub fn subscribe_status(&self) -> watch::Receiver<SyncStatus> {
        self.status.subscribe()
    }

    /// Mark the terminal status as seen and return to `Idle`
    ///
    /// Returns the status that was acknowledged.
    pub fn acknowledge(&mut self) -> SyncStatus {
        let previous = self.status();
        if previous != SyncStatus::InProgress {
            self.set_status(SyncStatus::Idle);
        }
        previous
    }

    /// Start editing a copy of the committed configuration
    pub fn begin_edit(&self) -> EditSession {
        EditSession::new(&self.committed)
    }

    /// Re-read the committed configuration from local storage
    pub fn reload(&mut self) -> &SiteConfig {
        self.committed = self.local.load();
        &self.committed
    }

    /// Drop the stored configuration and fall back to the default document
    ///
    /// Nothing is sent remotely; the next save or push overwrites the snapshot.
    pub fn reset(&mut self) -> StorageResult<&SiteConfig> {
        self.committed = self.local.reset()?;
        Ok(&self.committed)
    }

    /// Commit `draft` locally, then mirror it to the remote snapshot
    ///
    /// Returns `Err` only when the local save fails, in which case no remote
    /// call is made. Without a credential the mirror is skipped.
    pub async fn commit_and_mirror(&mut self, draft: &SiteConfig) -> StorageResult<SyncOutcome> {
        self.local.save(draft)?;
        self.committed = draft.clone();
        info!("Committed configuration locally");

        let credential = self.local.credential();
        if credential.is_empty() {
            return Ok(SyncOutcome::new(
                SyncOperation::Mirror,
                Ok(RemoteAction::Skipped),
            ));
        }

        self.set_status(SyncStatus::InProgress);
        let result = self.upload(&credential, &self.committed).await;
        Ok(self.finish(SyncOperation::Mirror, result))
    }

    /// Upload the committed configuration
    ///
    /// The credential is checked before the upload starts: without one the
    /// status goes straight to `Failed`, never `InProgress`, and the remote is
    /// not called.
    pub async fn push(&mut self) -> SyncOutcome {
        let credential = self.local.credential();
        if credential.is_empty() {
            return self.finish(SyncOperation::Push, Err(SyncError::MissingCredential));
        }

        self.set_status(SyncStatus::InProgress);
        let result = self.upload(&credential, &self.committed).await;
        self.finish(SyncOperation::Push, result)
    }

    /// Replace the session's draft with the remote snapshot
    ///
    /// The committed configuration is untouched until the draft is saved. On
    /// any failure the draft is left as it was. A missing credential fails
    /// before the download starts, like [`push`](Self::push).
    pub async fn pull(&mut self, session: &mut EditSession) -> SyncOutcome {
        let credential = self.local.credential();
        if credential.is_empty() {
            return self.finish(SyncOperation::Pull, Err(SyncError::MissingCredential));
        }

        self.set_status(SyncStatus::InProgress);
        let result = match self.remote.find_snapshot(&credential).await {
            SnapshotLookup::Found(snapshot) => {
                match self.remote.read_snapshot(&credential, &snapshot).await {
                    Ok(config) => {
                        session.replace_draft(config);
                        Ok(RemoteAction::Fetched(snapshot))
                    }
                    Err(e) => Err(SyncError::from(e)),
                }
            }
            SnapshotLookup::NotFound => Err(SyncError::RemoteNotFound),
            SnapshotLookup::Failed(reason) => Err(SyncError::LookupFailed(reason)),
        };

        self.finish(SyncOperation::Pull, result)
    }

    /// Find the snapshot, then update it or create one
    async fn upload(&self, credential: &str, config: &SiteConfig) -> Result<RemoteAction, SyncError> {
        let existing = match self.remote.find_snapshot(credential).await {
            SnapshotLookup::Found(snapshot) => Some(snapshot),
            SnapshotLookup::NotFound => None,
            SnapshotLookup::Failed(reason) => match self.lookup_policy {
                LookupFailurePolicy::Fail => return Err(SyncError::LookupFailed(reason)),
                LookupFailurePolicy::AssumeAbsent => {
                    warn!("Snapshot lookup failed ({}), creating a new snapshot", reason);
                    None
                }
            },
        };

        match existing {
            Some(snapshot) => self
                .remote
                .update_snapshot(credential, &snapshot, config)
                .await
                .map(RemoteAction::Updated)
                .map_err(SyncError::from),
            None => self
                .remote
                .create_snapshot(credential, config)
                .await
                .map(RemoteAction::Created)
                .map_err(SyncError::from),
        }
    }

    fn finish(
        &self,
        operation: SyncOperation,
        result: Result<RemoteAction, SyncError>,
    ) -> SyncOutcome {
        let outcome = SyncOutcome::new(operation, result);
        match outcome.error() {
            Some(e) => warn!("Sync {} failed: {}", operation.as_str(), e),
            None => info!("Sync {} succeeded", operation.as_str()),
        }
        self.set_status(outcome.status());
        outcome
    }

    fn set_status(&self, status: SyncStatus) {
        self.status.send_replace(status);
    }
}
