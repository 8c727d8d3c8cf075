//! Domain model for captured items and the user profile.
//!
//! # Responsibility
//! - Define the data structures persisted as JSON blobs.
//! - Keep wire naming stable across storage and FFI layers.
//!
//! # Invariants
//! - Every item is identified by a unique, non-empty `ItemId`.
//! - Deletion is a hard removal from the collection.

pub mod item;
pub mod profile;
pub mod view;
