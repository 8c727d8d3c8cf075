//! Derived, read-only views over the item collection.
//!
//! # Responsibility
//! - Filter and sort items for the Library view.
//! - Project pending tasks and wins for the Tasks and Wins views.
//!
//! # Invariants
//! - Every function here is pure; none touches a store or storage.

pub mod filter;
pub mod views;
