//! File-backed store implementations.

pub mod collection_store;
pub mod settings_store;
