//! In-memory user profile with partial-update merge.

use super::ProfileListener;
use crate::model::profile::{Preferences, PreferencesPatch, ProfilePatch, UserProfile};
use log::debug;

#[derive(Default)]
pub struct ProfileStore {
    profile: UserProfile,
    listeners: Vec<Box<dyn ProfileListener>>,
}

impl ProfileStore {
    pub fn new(profile: UserProfile) -> Self {
        Self {
            profile,
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn ProfileListener>) {
        self.listeners.push(listener);
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn preferences(&self) -> &Preferences {
        &self.profile.preferences
    }

    /// Merges `patch` into the profile. Empty patches are ignored.
    pub fn update(&mut self, patch: &ProfilePatch) -> &UserProfile {
        if !patch.is_empty() {
            patch.apply_to(&mut self.profile);
            debug!("event=profile_update module=store status=ok");
            self.notify();
        }
        &self.profile
    }

    pub fn update_preferences(&mut self, patch: &PreferencesPatch) -> &Preferences {
        self.update(&ProfilePatch {
            preferences: Some(patch.clone()),
            ..ProfilePatch::default()
        });
        &self.profile.preferences
    }

    fn notify(&self) {
        for listener in &self.listeners {
            listener.profile_changed(&self.profile);
        }
    }
}
