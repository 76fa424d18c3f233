//! Shared building blocks for the workspace: logging setup, startup
//! environment checks and small wire types used by more than one crate.

pub mod types;
pub mod utils;
pub mod env;
