//! Use-case workflows layered over the stores and the AI clients.
//!
//! # Responsibility
//! - Drive multi-step user flows that commit into the item store.
//! - Keep FFI and CLI layers free of state-machine details.

pub mod capture;
