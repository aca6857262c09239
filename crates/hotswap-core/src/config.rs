//! hotswap.toml configuration parser.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::types::Platform;

pub const DEFAULT_PORT: u16 = 3007;
pub const DEFAULT_HOST: &str = "0.0.0.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotswapConfig {
    pub catalog: CatalogConfig,
    pub server: Option<ServerConfig>,
    pub defaults: Option<DefaultsConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Path of the redb catalog file, relative to the config file.
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Fallbacks for CLI flags. Never consulted by the resolver itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    pub platform: Option<Platform>,
}

impl HotswapConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config: HotswapConfig = toml::from_str(&content)?;
        if config.catalog.path.is_relative() {
            if let Some(dir) = path.parent() {
                config.catalog.path = dir.join(&config.catalog.path);
            }
        }
        Ok(config)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Scaffold a minimal hotswap.toml.
    pub fn scaffold(platform: Option<Platform>) -> Self {
        HotswapConfig {
            catalog: CatalogConfig {
                path: PathBuf::from("hotswap.redb"),
            },
            server: Some(ServerConfig {
                host: Some(DEFAULT_HOST.to_string()),
                port: Some(DEFAULT_PORT),
            }),
            defaults: Some(DefaultsConfig { platform }),
        }
    }

    pub fn host(&self) -> &str {
        self.server
            .as_ref()
            .and_then(|s| s.host.as_deref())
            .unwrap_or(DEFAULT_HOST)
    }

    pub fn port(&self) -> u16 {
        self.server
            .as_ref()
            .and_then(|s| s.port)
            .unwrap_or(DEFAULT_PORT)
    }

    pub fn default_platform(&self) -> Option<Platform> {
        self.defaults.as_ref().and_then(|d| d.platform)
    }
}
