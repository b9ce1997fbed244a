//! ZenNav Core Library
//!
//! This crate provides the core of ZenNav, a personal start page that
//! organizes links into categories and can back its configuration up to a
//! GitHub Gist for reuse on other devices.
//!
//! # Architecture
//!
//! - **Committed configuration**: the last successfully saved document, owned
//!   by the [`SyncCoordinator`]
//! - **Draft**: a private copy edited through an [`EditSession`]
//! - **Snapshot**: a single JSON file in a gist, overwritten on every push
//!
//! Saving always writes locally first; mirroring to the snapshot is a
//! best-effort second step whose failure never undoes the local write.
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let local = LocalPersistence::from_config(&config);
//! let mut coordinator = SyncCoordinator::open(local, GistClient::from_config(&config)?);
//!
//! let mut session = coordinator.begin_edit();
//! let cat = session.add_category("Tools");
//! session.add_link(0, LinkItem::new("Docs", "https://docs.rs"))?;
//!
//! let outcome = coordinator.commit_and_mirror(session.draft()).await?;
//! println!("{}", outcome.message());
//! ```
//!
//! # Modules
//!
//! - `models`: Configuration document, categories and links
//! - `storage`: Key/value slots for the document, theme and sync token
//! - `remote`: Snapshot store trait and the GitHub Gists client
//! - `sync`: Commit, mirror, push and pull
//! - `session`: Draft editing and reordering
//! - `metadata`: Link analysis
//! - `search`: Search engines and in-site filtering
//! - `config`: Application configuration

pub mod config;
pub mod metadata;
pub mod models;
pub mod remote;
pub mod search;
pub mod session;
pub mod storage;
pub mod sync;

pub use config::{Config, LookupFailurePolicy};
pub use metadata::{HtmlAnalyzer, LinkAnalyzer, LinkMetadata};
pub use models::{Category, LinkItem, SiteConfig, ThemeMode};
pub use remote::{GistClient, MemorySnapshotStore, RemoteError, SnapshotStore};
pub use search::{filter_categories, SearchEngine};
pub use session::{EditSession, LinkField, Panel, SessionError, SiteField};
pub use storage::{FileStore, KeyValueStore, LocalPersistence, MemoryStore, StorageError};
pub use sync::{RemoteAction, SyncCoordinator, SyncError, SyncOperation, SyncOutcome, SyncStatus};
