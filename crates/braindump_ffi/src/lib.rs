//! Flutter bridge surface for the brain-dump core.

pub mod api;
