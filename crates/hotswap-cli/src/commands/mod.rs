pub mod admin;
pub mod check;
pub mod init;
pub mod list;
pub mod publish;
pub mod serve;

use std::path::Path;

use anyhow::{Context, Result, bail};
use hotswap_catalog::CatalogStore;
use hotswap_core::{HotswapConfig, Platform};

/// Load hotswap.toml and open the catalog it points at.
pub fn open_catalog(config_path: &Path) -> Result<(HotswapConfig, CatalogStore)> {
    let config = HotswapConfig::from_file(config_path)
        .with_context(|| format!("reading {} (run `hotswap init`?)", config_path.display()))?;
    let store = CatalogStore::open(&config.catalog.path)
        .with_context(|| format!("opening catalog {}", config.catalog.path.display()))?;
    Ok((config, store))
}

/// `--platform`, falling back to `[defaults] platform`.
pub fn platform_or_default(flag: Option<Platform>, config: &HotswapConfig) -> Result<Platform> {
    match flag.or_else(|| config.default_platform()) {
        Some(platform) => Ok(platform),
        None => bail!("no platform given: pass --platform or set [defaults] platform"),
    }
}
