use std::{io, path::{Path, PathBuf}};

use serde::{de::DeserializeOwned, Serialize};
use tokio::fs;
use uuid::Uuid;

use crate::errors::ServiceError;

/// Read and parse a JSON file.
///
/// Returns `Ok(None)` when the file does not exist; every other read or parse
/// failure is an error.
pub async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, ServiceError> {
    match fs::read(path).await {
        Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Serialize `value` as pretty JSON (2-space indent) and replace `path` with it.
///
/// Content goes to a hidden sibling first and is renamed over the target, so
/// readers see either the old or the new document. The parent directory must
/// already exist.
pub async fn write_json_pretty<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), ServiceError> {
    let data = serde_json::to_vec_pretty(value)?;
    let tmp = temp_sibling(path);
    if let Err(e) = fs::write(&tmp, &data).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(e.into());
    }
    if let Err(e) = fs::rename(&tmp, path).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(e.into());
    }
    Ok(())
}

// Unique per writer so concurrent puts of the same name never share a temp file.
fn temp_sibling(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{file_name}.{}.tmp", Uuid::new_v4()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[tokio::test]
    async fn write_then_read_pretty_json() -> Result<(), anyhow::Error> {
        let dir = std::env::temp_dir().join(format!("json_file_{}", Uuid::new_v4()));
        fs::create_dir_all(&dir).await?;
        let path = dir.join("doc.json");

        // missing file
        assert!(read_json::<Value>(&path).await?.is_none());

        write_json_pretty(&path, &json!({"a": {"b": 1}})).await?;
        let text = fs::read_to_string(&path).await?;
        assert_eq!(text, "{\n  \"a\": {\n    \"b\": 1\n  }\n}");
        assert_eq!(read_json::<Value>(&path).await?, Some(json!({"a": {"b": 1}})));

        // replace leaves no temp files behind
        write_json_pretty(&path, &json!([1, 2])).await?;
        let mut entries = fs::read_dir(&dir).await?;
        let mut names = Vec::new();
        while let Some(e) = entries.next_entry().await? {
            names.push(e.file_name().to_string_lossy().into_owned());
        }
        assert_eq!(names, vec!["doc.json".to_string()]);

        let _ = fs::remove_dir_all(&dir).await;
        Ok(())
    }

    #[tokio::test]
    async fn malformed_json_is_an_error() -> Result<(), anyhow::Error> {
        let dir = std::env::temp_dir().join(format!("json_file_{}", Uuid::new_v4()));
        fs::create_dir_all(&dir).await?;
        let path = dir.join("broken.json");
        fs::write(&path, b"{not json").await?;

        assert!(matches!(read_json::<Value>(&path).await, Err(ServiceError::Json(_))));

        let _ = fs::remove_dir_all(&dir).await;
        Ok(())
    }

    #[tokio::test]
    async fn write_into_missing_directory_fails() -> Result<(), anyhow::Error> {
        let path = std::env::temp_dir()
            .join(format!("json_file_missing_{}", Uuid::new_v4()))
            .join("doc.json");
        assert!(matches!(write_json_pretty(&path, &json!({})).await, Err(ServiceError::Io(_))));
        Ok(())
    }
}
