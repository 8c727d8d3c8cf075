//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define named-blob storage contracts.
//! - Isolate SQLite and JSON details from stores and workflows.
//!
//! # Invariants
//! - Loaded item collections pass `validate_collection` before use.
//! - Repository APIs return semantic errors (`InvalidData`, `InvalidKey`) in
//!   addition to DB transport errors.

pub mod kv_repo;
pub mod snapshot_repo;
