use async_trait::async_trait;
use serde_json::Value;

use crate::errors::ServiceError;
use crate::model::{ItemInput, NamedItem, ResourceLabels};
use crate::root::ResourceRoot;

/// Single JSON document per user.
/// Implementations can be file-backed, database-backed, or remote KV.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Current document, or an empty object if none was ever written.
    async fn read(&self, root: &ResourceRoot) -> Result<Value, ServiceError>;
    /// Replace the document wholesale.
    async fn write(&self, root: &ResourceRoot, value: &Value) -> Result<(), ServiceError>;
}

/// Directory-like collection of named JSON payloads per user.
#[async_trait]
pub trait CollectionStore: Send + Sync {
    fn labels(&self) -> &ResourceLabels;
    async fn list(&self, root: &ResourceRoot) -> Result<Vec<NamedItem>, ServiceError>;
    async fn get(&self, root: &ResourceRoot, name: &str) -> Result<NamedItem, ServiceError>;
    /// Create or overwrite; there is no distinct "already exists" outcome.
    async fn put(&self, root: &ResourceRoot, input: ItemInput) -> Result<(), ServiceError>;
    async fn delete(&self, root: &ResourceRoot, name: &str) -> Result<(), ServiceError>;
}
