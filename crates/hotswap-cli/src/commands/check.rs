use std::path::Path;

use anyhow::Result;
use hotswap_core::{BundleId, CheckRequest, Platform, UpdateDecision};
use hotswap_resolver::check_for_update;

use super::{open_catalog, platform_or_default};

/// `hotswap check`: answer an update check the way the server would.
pub fn check(
    config_path: &Path,
    platform: Option<Platform>,
    app_version: &str,
    bundle_id: Option<BundleId>,
) -> Result<()> {
    let decision = resolve_locally(config_path, platform, app_version, bundle_id)?;
    println!("{}", serde_json::to_string_pretty(&decision)?);
    Ok(())
}

fn resolve_locally(
    config_path: &Path,
    platform: Option<Platform>,
    app_version: &str,
    bundle_id: Option<BundleId>,
) -> Result<UpdateDecision> {
    let (config, store) = open_catalog(config_path)?;
    let platform = platform_or_default(platform, &config)?;
    let request = CheckRequest::new(platform, app_version, bundle_id.unwrap_or_default());

    let resolution = check_for_update(&store, &request)?;
    for warning in &resolution.warnings {
        eprintln!("warning: {warning}");
    }
    Ok(resolution.decision)
}
