//! In-memory snapshot store
//!
//! Keeps one snapshot per credential and records every call, so sync logic
//! can be checked for which remote paths it took.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::{RemoteError, SnapshotLookup, SnapshotRef, SnapshotStore};
use crate::models::SiteConfig;

/// Number of calls made to each operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallLog {
    pub find: usize,
    pub create: usize,
    pub update: usize,
    pub read: usize,
}

impl CallLog {
    pub fn total(&self) -> usize {
        self.find + self.create + self.update + self.read
    }
}

#[derive(Debug, Default)]
struct Inner {
    snapshots: HashMap<String, (SnapshotRef, SiteConfig)>,
    calls: CallLog,
    last_written: Option<SiteConfig>,
    next_id: u64,
    fail_lookup: bool,
    fail_writes: bool,
    fail_reads: bool,
}

/// Snapshot store kept in memory
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    inner: Mutex<Inner>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a snapshot for `credential`
    pub fn with_snapshot(self, credential: &str, config: SiteConfig) -> Self {
        {
            let mut inner = self.lock();
            let snapshot = next_ref(&mut inner);
            inner
                .snapshots
                .insert(credential.to_string(), (snapshot, config));
        }
        self
    }

    /// Make every lookup report a failed listing
    pub fn fail_lookup(&self, fail: bool) {
        self.lock().fail_lookup = fail;
    }

    /// Make create and update fail
    pub fn fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    /// Make reads fail
    pub fn fail_reads(&self, fail: bool) {
        self.lock().fail_reads = fail;
    }

    /// Calls made so far
    pub fn calls(&self) -> CallLog {
        self.lock().calls
    }

    /// Document currently stored for `credential`
    pub fn snapshot(&self, credential: &str) -> Option<SiteConfig> {
        self.lock()
            .snapshots
            .get(credential)
            .map(|(_, config)| config.clone())
    }

    /// Document sent by the most recent successful create or update
    pub fn last_written(&self) -> Option<SiteConfig> {
        self.lock().last_written.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn next_ref(inner: &mut Inner) -> SnapshotRef {
    inner.next_id += 1;
    SnapshotRef::new(format!("mem-{}", inner.next_id))
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn find_snapshot(&self, credential: &str) -> SnapshotLookup {
        let mut inner = self.lock();
        inner.calls.find += 1;

        if inner.fail_lookup {
            return SnapshotLookup::Failed("listing unavailable".to_string());
        }

        match inner.snapshots.get(credential) {
            Some((snapshot, _)) => SnapshotLookup::Found(snapshot.clone()),
            None => SnapshotLookup::NotFound,
        }
    }

    async fn create_snapshot(
        &self,
        credential: &str,
        config: &SiteConfig,
    ) -> Result<SnapshotRef, RemoteError> {
        let mut inner = self.lock();
        inner.calls.create += 1;

        if inner.fail_writes {
            return Err(RemoteError::Write("HTTP 500 Internal Server Error".to_string()));
        }

        let snapshot = next_ref(&mut inner);
        inner
            .snapshots
            .insert(credential.to_string(), (snapshot.clone(), config.clone()));
        inner.last_written = Some(config.clone());
        Ok(snapshot)
    }

    async fn update_snapshot(
        &self,
        credential: &str,
        snapshot: &SnapshotRef,
        config: &SiteConfig,
    ) -> Result<SnapshotRef, RemoteError> {
        let mut inner = self.lock();
        inner.calls.update += 1;

        if inner.fail_writes {
            return Err(RemoteError::Write("HTTP 500 Internal Server Error".to_string()));
        }

        match inner.snapshots.get_mut(credential) {
            Some((existing, stored)) if existing == snapshot => {
                *stored = config.clone();
            }
            _ => return Err(RemoteError::Write("HTTP 404 Not Found".to_string())),
        }
        inner.last_written = Some(config.clone());
        Ok(snapshot.clone())
    }

    async fn read_snapshot(
        &self,
        credential: &str,
        snapshot: &SnapshotRef,
    ) -> Result<SiteConfig, RemoteError> {
        let mut inner = self.lock();
        inner.calls.read += 1;

        if inner.fail_reads {
            return Err(RemoteError::Read("HTTP 502 Bad Gateway".to_string()));
        }

        match inner.snapshots.get(credential) {
            Some((existing, config)) if existing == snapshot => Ok(config.clone()),
            _ => Err(RemoteError::Read("snapshot file not found".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_then_find_and_read() {
        let store = MemorySnapshotStore::new();
        assert_eq!(store.find_snapshot("tok").await, SnapshotLookup::NotFound);

        let config = SiteConfig::default();
        let snapshot = store.create_snapshot("tok", &config).await.unwrap();

        assert_eq!(
            store.find_snapshot("tok").await,
            SnapshotLookup::Found(snapshot.clone())
        );
        assert_eq!(store.read_snapshot("tok", &snapshot).await.unwrap(), config);
        assert_eq!(
            store.calls(),
            CallLog {
                find: 2,
                create: 1,
                update: 0,
                read: 1
            }
        );
    }

    #[tokio::test]
    async fn test_snapshots_scoped_by_credential() {
        let store = MemorySnapshotStore::new().with_snapshot("a", SiteConfig::default());
        assert!(matches!(store.find_snapshot("a").await, SnapshotLookup::Found(_)));
        assert_eq!(store.find_snapshot("b").await, SnapshotLookup::NotFound);
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let store = MemorySnapshotStore::new();
        store.fail_lookup(true);
        assert!(matches!(
            store.find_snapshot("tok").await,
            SnapshotLookup::Failed(_)
        ));

        store.fail_writes(true);
        let err = store
            .create_snapshot("tok", &SiteConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RemoteError::Write(_)));
        assert!(store.snapshot("tok").is_none());
        assert!(store.last_written().is_none());
    }
}
