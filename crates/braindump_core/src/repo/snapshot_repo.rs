//! Snapshot (de)serialization for the two persisted application blobs.
//!
//! # Responsibility
//! - Map the item collection and user profile to named JSON blobs.
//! - Resolve missing blobs to defaults on load.
//!
//! # Invariants
//! - Snapshots are written whole; there is no partial-write recovery.
//! - A present but undecodable blob is an error, never silently replaced.

use crate::model::item::{Item, ItemValidationError};
use crate::model::profile::UserProfile;
use crate::repo::kv_repo::{KvRepository, RepoError, RepoResult};
use serde::de::DeserializeOwned;
use std::collections::HashSet;

/// Blob key holding the full item collection.
pub const ITEMS_KEY: &str = "brain_backup_items";
/// Blob key holding the user profile.
pub const PROFILE_KEY: &str = "brain_backup_user";

/// Typed snapshot access on top of any key-value repository.
pub struct SnapshotRepository<R: KvRepository> {
    repo: R,
}

impl<R: KvRepository> SnapshotRepository<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn inner(&self) -> &R {
        &self.repo
    }

    /// Loads the item collection; a missing blob yields an empty list.
    pub fn load_items(&self) -> RepoResult<Vec<Item>> {
        let items: Vec<Item> = self.load_json(ITEMS_KEY)?.unwrap_or_default();
        validate_collection(&items)?;
        Ok(items)
    }

    pub fn save_items(&self, items: &[Item]) -> RepoResult<()> {
        let json = serde_json::to_string(items).map_err(RepoError::Encode)?;
        self.repo.put(ITEMS_KEY, &json)
    }

    /// Loads the profile; a missing blob yields the default profile.
    pub fn load_profile(&self) -> RepoResult<UserProfile> {
        Ok(self.load_json(PROFILE_KEY)?.unwrap_or_default())
    }

    pub fn save_profile(&self, profile: &UserProfile) -> RepoResult<()> {
        let json = serde_json::to_string(profile).map_err(RepoError::Encode)?;
        self.repo.put(PROFILE_KEY, &json)
    }

    fn load_json<T: DeserializeOwned>(&self, key: &str) -> RepoResult<Option<T>> {
        let Some(raw) = self.repo.get(key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|err| RepoError::InvalidData {
                key: key.to_string(),
                message: err.to_string(),
            })
    }
}

/// Checks per-item invariants and id uniqueness across the collection.
pub fn validate_collection(items: &[Item]) -> Result<(), ItemValidationError> {
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        item.validate()?;
        if !seen.insert(item.id.as_str()) {
            return Err(ItemValidationError::DuplicateId(item.id.clone()));
        }
    }
    Ok(())
}
