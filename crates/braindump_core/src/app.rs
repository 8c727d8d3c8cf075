//! Root application context.
//!
//! # Responsibility
//! - Own the item and profile stores for the process lifetime.
//! - Reload persisted snapshots at startup and attach the persistence
//!   listener to both stores.
//!
//! # Invariants
//! - Missing snapshots resolve to defaults and are not written until the
//!   first change.
//! - A corrupt snapshot fails startup instead of being overwritten.

use crate::repo::kv_repo::{KvRepository, RepoResult, SqliteKvRepository};
use crate::repo::snapshot_repo::SnapshotRepository;
use crate::store::item_store::ItemStore;
use crate::store::persist::SnapshotPersister;
use crate::store::profile_store::ProfileStore;
use log::info;
use std::path::Path;

pub struct AppContext {
    items: ItemStore,
    profile: ProfileStore,
}

impl AppContext {
    /// Loads both snapshots from `repo` and mirrors later changes back to it.
    pub fn open<R>(repo: R) -> RepoResult<Self>
    where
        R: KvRepository + Send + 'static,
    {
        let snapshots = SnapshotRepository::new(repo);
        let items = snapshots.load_items()?;
        let profile = snapshots.load_profile()?;
        info!(
            "event=app_context_open module=app status=ok items={}",
            items.len()
        );

        let mut context = Self {
            items: ItemStore::from_items(items)?,
            profile: ProfileStore::new(profile),
        };
        let persister = SnapshotPersister::new(snapshots);
        context.items.subscribe(Box::new(persister.clone()));
        context.profile.subscribe(Box::new(persister));
        Ok(context)
    }

    /// Opens the SQLite database at `path` and loads the snapshots from it.
    pub fn open_at(path: impl AsRef<Path>) -> RepoResult<Self> {
        Self::open(SqliteKvRepository::open(path)?)
    }

    pub fn items(&self) -> &ItemStore {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut ItemStore {
        &mut self.items
    }

    pub fn profile(&self) -> &ProfileStore {
        &self.profile
    }

    pub fn profile_mut(&mut self) -> &mut ProfileStore {
        &mut self.profile
    }

    /// Personal AI context from preferences, owned so callers can keep
    /// mutating the item store while a request is in flight.
    pub fn ai_context(&self) -> Option<String> {
        self.profile.preferences().context().map(str::to_owned)
    }
}
