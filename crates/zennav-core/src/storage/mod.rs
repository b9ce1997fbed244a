//! Storage layer
//!
//! Local, device-only persistence of the configuration document, the theme
//! preference and the sync credential.
//!
//! ## Architecture
//!
//! - **KeyValueStore**: raw string slots (files on disk, or memory in tests)
//! - **LocalPersistence**: typed adapter with fallback-to-default semantics

pub mod error;
pub mod kv;
pub mod persistence;

pub use error::{StorageError, StorageResult};
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use persistence::{LocalPersistence, CONFIG_KEY, CREDENTIAL_KEY, THEME_KEY};
