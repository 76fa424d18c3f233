//! Built-in plugin profiles.
//!
//! Both plugins share one implementation; they only differ in their
//! descriptor, route segments and on-disk names.

use std::sync::Arc;

use serde::Serialize;

use crate::file::{collection_store::{CollectionKind, FileCollectionStore}, settings_store::FileSettingsStore};
use crate::model::{ValidationRule, PRESET_LABELS, THEME_LABELS};
use crate::store::{CollectionStore, SettingsStore};

/// Descriptor a plugin registers with the host.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct PluginInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

/// A collection as seen from HTTP (`route`) and from disk (`kind`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollectionLayout {
    pub route: &'static str,
    pub kind: CollectionKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PluginProfile {
    pub info: PluginInfo,
    pub settings_file: &'static str,
    pub presets: CollectionLayout,
    pub themes: CollectionLayout,
}

pub const LEGACY: PluginProfile = PluginProfile {
    info: PluginInfo {
        id: "v2",
        name: "V2 Server",
        description: "Allows you to connect to a V2 server",
    },
    settings_file: "v2Settings.json",
    presets: CollectionLayout {
        route: "v2ExperimentalSamplerPreset",
        kind: CollectionKind {
            dir_name: "v2ExperimentalSamplerPreset",
            labels: PRESET_LABELS,
            rule: ValidationRule::NameRequired,
        },
    },
    themes: CollectionLayout {
        route: "themes",
        kind: CollectionKind {
            dir_name: "v2Themes",
            labels: THEME_LABELS,
            rule: ValidationRule::NameAndPayloadRequired,
        },
    },
};

pub const CURRENT: PluginProfile = PluginProfile {
    info: PluginInfo {
        id: "neo",
        name: "Neo Server",
        description: "Allows you to connect to a Neo server",
    },
    settings_file: "NeoSettings.json",
    presets: CollectionLayout {
        route: "samplers",
        kind: CollectionKind {
            dir_name: "NeoSamplers",
            labels: PRESET_LABELS,
            rule: ValidationRule::NameRequired,
        },
    },
    themes: CollectionLayout {
        route: "themes",
        kind: CollectionKind {
            dir_name: "NeoThemes",
            labels: THEME_LABELS,
            rule: ValidationRule::NameAndPayloadRequired,
        },
    },
};

pub const BUILTIN: [PluginProfile; 2] = [LEGACY, CURRENT];

pub fn find_profile(id: &str) -> Option<PluginProfile> {
    BUILTIN.iter().copied().find(|p| p.info.id == id)
}

/// The three stores backing one plugin instance.
#[derive(Clone)]
pub struct PluginStores {
    pub settings: Arc<dyn SettingsStore>,
    pub presets: Arc<dyn CollectionStore>,
    pub themes: Arc<dyn CollectionStore>,
}

impl PluginStores {
    pub fn file_backed(profile: &PluginProfile) -> Self {
        Self {
            settings: Arc::new(FileSettingsStore::new(profile.settings_file)),
            presets: Arc::new(FileCollectionStore::new(profile.presets.kind)),
            themes: Arc::new(FileCollectionStore::new(profile.themes.kind)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ItemInput;
    use crate::root::ResourceRoot;
    use serde_json::json;

    #[test]
    fn builtin_profiles_are_distinct() {
        assert_eq!(find_profile("v2"), Some(LEGACY));
        assert_eq!(find_profile("neo"), Some(CURRENT));
        assert_eq!(find_profile("v3"), None);
        assert_ne!(LEGACY.presets.kind.dir_name, CURRENT.presets.kind.dir_name);
        assert_ne!(LEGACY.themes.kind.dir_name, CURRENT.themes.kind.dir_name);
    }

    #[tokio::test]
    async fn profiles_do_not_share_files() -> Result<(), anyhow::Error> {
        let dir = std::env::temp_dir().join(format!("svc_profiles_{}", uuid::Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir).await?;
        let root = ResourceRoot::new(&dir);
        let legacy = PluginStores::file_backed(&LEGACY);
        let current = PluginStores::file_backed(&CURRENT);

        legacy.settings.write(&root, &json!({"a": 1})).await?;
        legacy.themes.put(&root, ItemInput::new("dark", json!({}))).await?;

        assert_eq!(current.settings.read(&root).await?, json!({}));
        assert!(current.themes.list(&root).await?.is_empty());
        assert!(tokio::fs::metadata(dir.join("v2Settings.json")).await.is_ok());
        assert!(tokio::fs::metadata(dir.join("v2Themes").join("dark.json")).await.is_ok());

        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }
}
