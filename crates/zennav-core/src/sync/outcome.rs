//! Sync status and outcomes

use thiserror::Error;

use crate::remote::{RemoteError, SnapshotRef};

/// Status of the current sync operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    /// Nothing running, nothing to report
    Idle,
    /// A remote call is outstanding
    InProgress,
    /// Last operation succeeded (until acknowledged)
    Succeeded,
    /// Last operation failed (until acknowledged)
    Failed,
}

impl SyncStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncStatus::Idle => "idle",
            SyncStatus::InProgress => "in_progress",
            SyncStatus::Succeeded => "succeeded",
            SyncStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which user action triggered the sync
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOperation {
    /// Automatic mirror after a save
    Mirror,
    /// Explicit upload of the committed configuration
    Push,
    /// Explicit download into the draft
    Pull,
}

impl SyncOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncOperation::Mirror => "mirror",
            SyncOperation::Push => "push",
            SyncOperation::Pull => "pull",
        }
    }
}

/// What happened remotely
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteAction {
    /// No credential, nothing was sent
    Skipped,
    /// A new snapshot was created
    Created(SnapshotRef),
    /// The existing snapshot was overwritten
    Updated(SnapshotRef),
    /// The snapshot was downloaded into the draft
    Fetched(SnapshotRef),
}

/// Why a sync operation failed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// Push or pull without a stored credential
    #[error("No sync token configured. Set one with `zennav token set <token>`.")]
    MissingCredential,

    /// Pull found no snapshot for the account
    #[error("No ZenNav snapshot found for this account.")]
    RemoteNotFound,

    /// Listing the account's snapshots failed
    #[error("Could not look up the remote snapshot: {0}")]
    LookupFailed(String),

    /// Create, update or read failed
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

/// Result of one sync operation, as shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    pub operation: SyncOperation,
    pub result: Result<RemoteAction, SyncError>,
}

impl SyncOutcome {
    pub(crate) fn new(operation: SyncOperation, result: Result<RemoteAction, SyncError>) -> Self {
        Self { operation, result }
    }

    /// Terminal status of the operation
    ///
    /// A skipped mirror never left `Idle`.
    pub fn status(&self) -> SyncStatus {
        match &self.result {
            Ok(RemoteAction::Skipped) => SyncStatus::Idle,
            Ok(_) => SyncStatus::Succeeded,
            Err(_) => SyncStatus::Failed,
        }
    }

    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// The failure, if any
    pub fn error(&self) -> Option<&SyncError> {
        self.result.as_ref().err()
    }

    /// True when a failed auto-mirror must be acknowledged by the user,
    /// since it happened during an otherwise successful save
    pub fn needs_ack(&self) -> bool {
        self.operation == SyncOperation::Mirror && self.result.is_err()
    }

    /// Human-readable status message
    pub fn message(&self) -> String {
        match (&self.operation, &self.result) {
            (_, Ok(RemoteAction::Skipped)) => "Saved locally. Cloud sync is not configured.".to_string(),
            (SyncOperation::Mirror, Ok(_)) => "Saved locally and synced to the cloud.".to_string(),
            (SyncOperation::Mirror, Err(e)) => format!(
                "Saved locally, but cloud sync failed. Check your network or token. ({})",
                e
            ),
            (SyncOperation::Push, Ok(_)) => {
                "Upload complete. Other devices can now pull this configuration.".to_string()
            }
            (SyncOperation::Push, Err(SyncError::MissingCredential)) => {
                SyncError::MissingCredential.to_string()
            }
            (SyncOperation::Push, Err(e)) => {
                format!("Upload failed. Check the token's gist permission. ({})", e)
            }
            (SyncOperation::Pull, Ok(_)) => {
                "Download complete. The draft now holds the cloud configuration.".to_string()
            }
            (SyncOperation::Pull, Err(e @ (SyncError::MissingCredential | SyncError::RemoteNotFound))) => {
                e.to_string()
            }
            (SyncOperation::Pull, Err(e)) => {
                format!("Download failed. Check your network or token. ({})", e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_result() {
        let ok = SyncOutcome::new(
            SyncOperation::Push,
            Ok(RemoteAction::Created(SnapshotRef::new("g1"))),
        );
        assert_eq!(ok.status(), SyncStatus::Succeeded);
        assert!(!ok.needs_ack());

        let skipped = SyncOutcome::new(SyncOperation::Mirror, Ok(RemoteAction::Skipped));
        assert_eq!(skipped.status(), SyncStatus::Idle);

        let failed = SyncOutcome::new(
            SyncOperation::Mirror,
            Err(SyncError::Remote(RemoteError::Write("HTTP 401".to_string()))),
        );
        assert_eq!(failed.status(), SyncStatus::Failed);
        assert!(failed.needs_ack());
        assert!(failed.message().contains("Saved locally"));
        assert!(failed.message().contains("HTTP 401"));
    }

    #[test]
    fn test_pull_not_found_message_is_distinct() {
        let not_found = SyncOutcome::new(SyncOperation::Pull, Err(SyncError::RemoteNotFound));
        let transport = SyncOutcome::new(
            SyncOperation::Pull,
            Err(SyncError::Remote(RemoteError::Read("HTTP 502".to_string()))),
        );

        assert_eq!(not_found.message(), "No ZenNav snapshot found for this account.");
        assert_ne!(not_found.message(), transport.message());
        assert!(!not_found.needs_ack());
    }
}
