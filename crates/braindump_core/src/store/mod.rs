//! In-process state containers and their change listeners.
//!
//! # Responsibility
//! - Own the item collection and the user profile for one process.
//! - Notify attached listeners after every state change.
//!
//! # Invariants
//! - Stores are mutated only through their methods; listeners see the full
//!   post-change state.
//! - A listener failure never rolls back an in-memory change.

use crate::model::item::{Item, ItemId, ItemValidationError};
use crate::model::profile::UserProfile;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod item_store;
pub mod persist;
pub mod profile_store;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    NotFound(ItemId),
    Validation(ItemValidationError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "item not found: {id}"),
            Self::Validation(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) => None,
        }
    }
}

impl From<ItemValidationError> for StoreError {
    fn from(value: ItemValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Receives the full item collection after each change.
pub trait ItemsListener: Send {
    fn items_changed(&self, items: &[Item]);
}

/// Receives the full profile after each change.
pub trait ProfileListener: Send {
    fn profile_changed(&self, profile: &UserProfile);
}
