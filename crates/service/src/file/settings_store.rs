use serde_json::{Map, Value};
use tracing::debug;

use crate::errors::ServiceError;
use crate::root::ResourceRoot;
use crate::storage::json_file;
use crate::store::SettingsStore;

/// Settings document kept as `<root>/<file_name>`.
#[derive(Clone, Debug)]
pub struct FileSettingsStore {
    file_name: String,
}

impl FileSettingsStore {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self { file_name: file_name.into() }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Load the document; a missing file reads as `{}`.
    pub async fn read(&self, root: &ResourceRoot) -> Result<Value, ServiceError> {
        let path = root.join(&self.file_name);
        match json_file::read_json(&path).await? {
            Some(value) => Ok(value),
            None => {
                debug!(path = %path.display(), "settings file missing, using empty document");
                Ok(Value::Object(Map::new()))
            }
        }
    }

    /// Persist `value` as pretty JSON. The root itself is never created here.
    pub async fn write(&self, root: &ResourceRoot, value: &Value) -> Result<(), ServiceError> {
        json_file::write_json_pretty(&root.join(&self.file_name), value).await
    }
}

#[async_trait::async_trait]
impl SettingsStore for FileSettingsStore {
    async fn read(&self, root: &ResourceRoot) -> Result<Value, ServiceError> { self.read(root).await }
    async fn write(&self, root: &ResourceRoot, value: &Value) -> Result<(), ServiceError> { self.write(root, value).await }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    async fn temp_root() -> Result<ResourceRoot, anyhow::Error> {
        let dir = std::env::temp_dir().join(format!("svc_settings_{}", Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir).await?;
        Ok(ResourceRoot::new(dir))
    }

    #[tokio::test]
    async fn missing_settings_read_as_empty_object() -> Result<(), anyhow::Error> {
        let root = temp_root().await?;
        let store = FileSettingsStore::new("NeoSettings.json");

        assert_eq!(store.read(&root).await?, json!({}));
        // reading never creates the file
        assert!(tokio::fs::metadata(root.join("NeoSettings.json")).await.is_err());

        let _ = tokio::fs::remove_dir_all(root.path()).await;
        Ok(())
    }

    #[tokio::test]
    async fn write_replaces_whole_document() -> Result<(), anyhow::Error> {
        let root = temp_root().await?;
        let store = FileSettingsStore::new("v2Settings.json");

        store.write(&root, &json!({"theme": "dark", "fontSize": 14})).await?;
        store.write(&root, &json!({"theme": "light"})).await?;
        assert_eq!(store.read(&root).await?, json!({"theme": "light"}));

        let text = tokio::fs::read_to_string(root.join("v2Settings.json")).await?;
        assert_eq!(text, "{\n  \"theme\": \"light\"\n}");

        // reset by writing an empty document
        store.write(&root, &json!({})).await?;
        assert_eq!(store.read(&root).await?, json!({}));

        let _ = tokio::fs::remove_dir_all(root.path()).await;
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_or_unrooted_settings_fail() -> Result<(), anyhow::Error> {
        let root = temp_root().await?;
        let store = FileSettingsStore::new("NeoSettings.json");
        tokio::fs::write(root.join("NeoSettings.json"), b"{oops").await?;
        assert!(store.read(&root).await.unwrap_err().is_internal());

        // the root is not created on write
        let missing = ResourceRoot::new(root.join("no-such-user"));
        assert!(matches!(store.write(&missing, &json!({})).await, Err(ServiceError::Io(_))));
        assert!(tokio::fs::metadata(missing.path()).await.is_err());

        let _ = tokio::fs::remove_dir_all(root.path()).await;
        Ok(())
    }
}
