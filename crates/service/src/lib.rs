//! Service layer: per-user JSON stores behind the plugin endpoints.
//! - `SettingsStore`: one document per user, missing reads as `{}`.
//! - `CollectionStore`: a directory of named JSON documents.
//! - Plugin profiles bind both to concrete file and route names.

pub mod errors;
pub mod model;
pub mod root;
pub mod runtime;
pub mod storage;
pub mod store;
pub mod file;
pub mod profile;
