use std::{io, path::PathBuf};

use serde_json::Value;
use tokio::fs;
use tracing::debug;

use crate::errors::ServiceError;
use crate::model::{ensure_item_name, ItemInput, NamedItem, ResourceLabels, ValidationRule, ITEM_SUFFIX};
use crate::root::ResourceRoot;
use crate::storage::json_file;
use crate::store::CollectionStore;

/// What distinguishes one collection from another: where it lives under the
/// user root, how it is named in messages and what a write must carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollectionKind {
    pub dir_name: &'static str,
    pub labels: ResourceLabels,
    pub rule: ValidationRule,
}

/// Collection kept as one `<name>.json` file per item in
/// `<root>/<dir_name>/`. The directory is created on first write; until then
/// the collection is simply empty.
#[derive(Clone, Debug)]
pub struct FileCollectionStore {
    kind: CollectionKind,
}

impl FileCollectionStore {
    pub fn new(kind: CollectionKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> &CollectionKind {
        &self.kind
    }

    fn dir(&self, root: &ResourceRoot) -> PathBuf {
        root.join(self.kind.dir_name)
    }

    fn item_path(&self, root: &ResourceRoot, name: &str) -> PathBuf {
        self.dir(root).join(format!("{name}{ITEM_SUFFIX}"))
    }

    /// All items in the collection, sorted by name.
    ///
    /// Only regular `.json` files directly inside the directory count;
    /// subdirectories and other files are ignored.
    pub async fn list(&self, root: &ResourceRoot) -> Result<Vec<NamedItem>, ServiceError> {
        let dir = self.dir(root);
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut items = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str().and_then(|n| n.strip_suffix(ITEM_SUFFIX)) else {
                continue;
            };
            // `x.json.json` is not reachable through get/put/delete
            if name.is_empty() || name.ends_with(ITEM_SUFFIX) {
                continue;
            }
            match json_file::read_json::<Value>(&entry.path()).await? {
                Some(preset) => items.push(NamedItem { name: name.to_owned(), preset }),
                // deleted between read_dir and read
                None => debug!(collection = self.kind.dir_name, %name, "item vanished while listing"),
            }
        }
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }

    pub async fn get(&self, root: &ResourceRoot, name: &str) -> Result<NamedItem, ServiceError> {
        let name = ensure_item_name(name, &self.kind.labels)?;
        match json_file::read_json(&self.item_path(root, name)).await? {
            Some(preset) => Ok(NamedItem { name: name.to_owned(), preset }),
            None => Err(ServiceError::not_found(self.kind.labels.title)),
        }
    }

    /// Validate, then create the directory if needed and overwrite the item.
    pub async fn put(&self, root: &ResourceRoot, input: ItemInput) -> Result<(), ServiceError> {
        let (name, payload) = self.kind.rule.check(input, &self.kind.labels)?;
        let name = ensure_item_name(&name, &self.kind.labels)?;
        fs::create_dir_all(self.dir(root)).await?;
        json_file::write_json_pretty(&self.item_path(root, name), &payload).await
    }

    pub async fn delete(&self, root: &ResourceRoot, name: &str) -> Result<(), ServiceError> {
        let name = ensure_item_name(name, &self.kind.labels)?;
        match fs::remove_file(self.item_path(root, name)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(ServiceError::not_found(self.kind.labels.title)),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait::async_trait]
impl CollectionStore for FileCollectionStore {
    fn labels(&self) -> &ResourceLabels { &self.kind.labels }
    async fn list(&self, root: &ResourceRoot) -> Result<Vec<NamedItem>, ServiceError> { self.list(root).await }
    async fn get(&self, root: &ResourceRoot, name: &str) -> Result<NamedItem, ServiceError> { self.get(root, name).await }
    async fn put(&self, root: &ResourceRoot, input: ItemInput) -> Result<(), ServiceError> { self.put(root, input).await }
    async fn delete(&self, root: &ResourceRoot, name: &str) -> Result<(), ServiceError> { self.delete(root, name).await }
}
