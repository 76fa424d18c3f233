//! Plugin registration: descriptors, route attachment and teardown.

use std::sync::Arc;

use axum::Router;
use configs::PluginsConfig;
use service::profile::{find_profile, PluginInfo, PluginProfile, PluginStores};
use tracing::info;

use crate::errors::StartupError;
use crate::routes::{collections, settings};

/// Prefix every plugin is mounted under, followed by its id.
pub const PLUGIN_PREFIX: &str = "/api/plugins";

/// A server extension the registry can load.
pub trait ServerPlugin: Send + Sync {
    fn info(&self) -> PluginInfo;
    /// Attach the plugin's routes to `router`, relative to the plugin mount point.
    fn init(&self, router: Router) -> Router;
    fn exit(&self) {}
}

/// Settings + presets + themes endpoints for one profile.
pub struct StorePlugin {
    profile: PluginProfile,
    stores: PluginStores,
}

impl StorePlugin {
    pub fn new(profile: PluginProfile, stores: PluginStores) -> Self {
        Self { profile, stores }
    }

    pub fn file_backed(profile: PluginProfile) -> Self {
        let stores = PluginStores::file_backed(&profile);
        Self::new(profile, stores)
    }
}

impl ServerPlugin for StorePlugin {
    fn info(&self) -> PluginInfo {
        self.profile.info
    }

    fn init(&self, router: Router) -> Router {
        router
            .merge(settings::routes(self.stores.settings.clone()))
            .nest(
                &format!("/{}", self.profile.presets.route),
                collections::routes(self.stores.presets.clone()),
            )
            .nest(
                &format!("/{}", self.profile.themes.route),
                collections::routes(self.stores.themes.clone()),
            )
    }
}

#[derive(Clone, Default)]
pub struct PluginRegistry {
    plugins: Vec<Arc<dyn ServerPlugin>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in file-backed plugins, in the order they are enabled.
    pub fn from_config(cfg: &PluginsConfig) -> Result<Self, StartupError> {
        let mut registry = Self::new();
        for id in &cfg.enabled {
            let profile = find_profile(id)
                .ok_or_else(|| StartupError::InvalidConfig(format!("unknown plugin id {id:?}")))?;
            registry.register(Arc::new(StorePlugin::file_backed(profile)))?;
        }
        Ok(registry)
    }

    pub fn register(&mut self, plugin: Arc<dyn ServerPlugin>) -> Result<(), StartupError> {
        let id = plugin.info().id;
        if self.plugins.iter().any(|p| p.info().id == id) {
            return Err(StartupError::InvalidConfig(format!("plugin {id:?} registered twice")));
        }
        self.plugins.push(plugin);
        Ok(())
    }

    pub fn infos(&self) -> Vec<PluginInfo> {
        self.plugins.iter().map(|p| p.info()).collect()
    }

    /// One router with every plugin nested under `/api/plugins/<id>`.
    pub fn mount(&self) -> Router {
        self.plugins.iter().fold(Router::new(), |router, plugin| {
            let info = plugin.info();
            info!(plugin = info.id, name = info.name, "plugin loaded");
            router.nest(&format!("{PLUGIN_PREFIX}/{}", info.id), plugin.init(Router::new()))
        })
    }

    pub fn shutdown(&self) {
        for plugin in &self.plugins {
            plugin.exit();
            info!(plugin = plugin.info().id, "plugin exited");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use service::profile::{CURRENT, LEGACY};

    #[test]
    fn registry_follows_config_order() {
        let cfg = PluginsConfig { enabled: vec!["neo".into(), "v2".into()] };
        let registry = PluginRegistry::from_config(&cfg).unwrap();
        assert_eq!(registry.infos(), vec![CURRENT.info, LEGACY.info]);
    }

    #[test]
    fn rejects_unknown_and_duplicate_plugins() {
        let cfg = PluginsConfig { enabled: vec!["v9".into()] };
        assert!(PluginRegistry::from_config(&cfg).is_err());

        let cfg = PluginsConfig { enabled: vec!["v2".into(), "v2".into()] };
        assert!(PluginRegistry::from_config(&cfg).is_err());
    }
}
