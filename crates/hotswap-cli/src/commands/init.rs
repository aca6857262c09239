use std::path::Path;

use anyhow::{Result, bail};
use hotswap_core::{HotswapConfig, Platform};
use tracing::info;

/// `hotswap init`: write a scaffold config next to an empty catalog path.
pub fn init(config_path: &Path, platform: Option<Platform>, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        );
    }

    let config = HotswapConfig::scaffold(platform);
    std::fs::write(config_path, config.to_toml_string()?)?;
    info!(path = %config_path.display(), "config written");
    println!("✓ Generated {}", config_path.display());
    Ok(())
}
