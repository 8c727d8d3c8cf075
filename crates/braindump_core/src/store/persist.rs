//! Persistence listener mirroring store changes into snapshot blobs.
//!
//! # Invariants
//! - Every notification writes the whole snapshot (last-write-wins).
//! - A failed write is logged and dropped; it never aborts the session.

use super::{ItemsListener, ProfileListener};
use crate::model::item::Item;
use crate::model::profile::UserProfile;
use crate::repo::kv_repo::{KvRepository, RepoResult};
use crate::repo::snapshot_repo::SnapshotRepository;
use log::{debug, error};
use std::sync::{Arc, Mutex};

/// Shared writer attached to both stores.
pub struct SnapshotPersister<R: KvRepository> {
    repo: Arc<Mutex<SnapshotRepository<R>>>,
}

impl<R: KvRepository> Clone for SnapshotPersister<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
        }
    }
}

impl<R: KvRepository> SnapshotPersister<R> {
    pub fn new(repo: SnapshotRepository<R>) -> Self {
        Self {
            repo: Arc::new(Mutex::new(repo)),
        }
    }

    fn write(&self, blob: &'static str, f: impl FnOnce(&SnapshotRepository<R>) -> RepoResult<()>) {
        let guard = match self.repo.lock() {
            Ok(guard) => guard,
            Err(_) => {
                error!(
                    "event=snapshot_write module=store status=error blob={blob} error_code=lock_poisoned"
                );
                return;
            }
        };
        match f(&guard) {
            Ok(()) => debug!("event=snapshot_write module=store status=ok blob={blob}"),
            Err(err) => error!(
                "event=snapshot_write module=store status=error blob={blob} error_code=write_failed error={err}"
            ),
        }
    }
}

impl<R: KvRepository + Send> ItemsListener for SnapshotPersister<R> {
    fn items_changed(&self, items: &[Item]) {
        self.write("items", |repo| repo.save_items(items));
    }
}

impl<R: KvRepository + Send> ProfileListener for SnapshotPersister<R> {
    fn profile_changed(&self, profile: &UserProfile) {
        self.write("profile", |repo| repo.save_profile(profile));
    }
}
