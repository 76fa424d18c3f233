//! Storage abstractions for service layer
//!
//! Low-level JSON file helpers shared by the settings and collection stores,
//! so both agree on encoding, missing-file handling and replace semantics.

pub mod json_file;
