use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;
use common::utils::path::is_safe_segment;

/// Plugin ids this build knows how to mount.
pub const KNOWN_PLUGINS: &[&str] = &["v2", "neo"];

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub plugins: PluginsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            worker_threads: Some(4),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_root")]
    pub data_root: String,
    #[serde(default = "default_user")]
    pub default_user: String,
    #[serde(default = "default_user_header")]
    pub user_header: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_root: default_data_root(),
            default_user: default_user(),
            user_header: default_user_header(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PluginsConfig {
    #[serde(default = "default_enabled_plugins")]
    pub enabled: Vec<String>,
}

impl Default for PluginsConfig {
    fn default() -> Self {
        Self { enabled: default_enabled_plugins() }
    }
}

fn default_host() -> String { "127.0.0.1".into() }
fn default_port() -> u16 { 8080 }
fn default_max_body_bytes() -> usize { 10 * 1024 * 1024 }
fn default_data_root() -> String { "data".into() }
fn default_user() -> String { "default-user".into() }
fn default_user_header() -> String { "x-user-handle".into() }
fn default_enabled_plugins() -> Vec<String> { KNOWN_PLUGINS.iter().map(|s| s.to_string()).collect() }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Like [`AppConfig::load_and_validate`], but a missing config file falls
    /// back to defaults plus `SERVER_HOST`/`SERVER_PORT`/`DATA_ROOT` overrides.
    pub fn load_or_env() -> Result<Self> {
        let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        let mut cfg = if std::path::Path::new(&path).exists() {
            load_from_file(&path)?
        } else {
            AppConfig::default()
        };
        cfg.apply_env_overrides();
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            self.server.port = port;
        }
        if let Ok(root) = std::env::var("DATA_ROOT") {
            self.storage.data_root = root;
        }
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        // 归一化 server
        self.server.normalize()?;
        self.storage.validate()?;
        self.plugins.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        match self.worker_threads {
            Some(w) if w > 0 => {}
            _ => self.worker_threads = Some(4),
        }
        if self.max_body_bytes == 0 {
            self.max_body_bytes = default_max_body_bytes();
        }
        Ok(())
    }
}

impl StorageConfig {
    pub fn validate(&self) -> Result<()> {
        if self.data_root.trim().is_empty() {
            return Err(anyhow!("storage.data_root is empty; set it in config.toml or DATA_ROOT"));
        }
        if !is_safe_segment(&self.default_user) {
            return Err(anyhow!("storage.default_user must be a single path segment"));
        }
        if self.user_header.trim().is_empty() {
            return Err(anyhow!("storage.user_header is empty"));
        }
        Ok(())
    }
}

impl PluginsConfig {
    pub fn validate(&self) -> Result<()> {
        if let Some(unknown) = self.enabled.iter().find(|id| !KNOWN_PLUGINS.contains(&id.as_str())) {
            return Err(anyhow!("plugins.enabled contains unknown plugin id {unknown:?}"));
        }
        Ok(())
    }

    pub fn is_enabled(&self, id: &str) -> bool {
        self.enabled.iter().any(|e| e == id)
    }
}
