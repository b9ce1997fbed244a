//! Configuration sync
//!
//! Keeps the committed configuration, the local store and the remote snapshot
//! consistent. Sync is whole-document and last-writer-wins: a push or
//! auto-mirror overwrites the remote snapshot, a pull overwrites the draft.
//!
//! ## Usage
//!
//! ```ignore
//! let mut coordinator = SyncCoordinator::open(local, GistClient::from_config(&config)?);
//! let mut session = coordinator.begin_edit();
//! session.add_category("Tools");
//! let outcome = coordinator.commit_and_mirror(session.draft()).await?;
//! ```

mod coordinator;
mod outcome;

pub use coordinator::SyncCoordinator;
pub use outcome::{RemoteAction, SyncError, SyncOperation, SyncOutcome, SyncStatus};
