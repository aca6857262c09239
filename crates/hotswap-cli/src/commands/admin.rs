use std::path::Path;

use anyhow::Result;
use hotswap_core::{Bundle, BundleId, BundlePatch};

use super::open_catalog;

/// `hotswap enable` / `hotswap disable`
pub fn set_enabled(config_path: &Path, id: &BundleId, enabled: bool) -> Result<()> {
    let bundle = apply(config_path, id, &BundlePatch::enabled(enabled))?;
    let state = if bundle.enabled { "enabled" } else { "disabled" };
    println!("✓ {} {state}", bundle.id);
    Ok(())
}

/// `hotswap force <id> on|off`
pub fn set_force_update(config_path: &Path, id: &BundleId, force_update: bool) -> Result<()> {
    let bundle = apply(config_path, id, &BundlePatch::force_update(force_update))?;
    let state = if bundle.force_update { "on" } else { "off" };
    println!("✓ {} force update {state}", bundle.id);
    Ok(())
}

fn apply(config_path: &Path, id: &BundleId, patch: &BundlePatch) -> Result<Bundle> {
    let (_, store) = open_catalog(config_path)?;
    Ok(store.update_bundle(id, patch)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testutil::write_config;
    use hotswap_catalog::CatalogStore;
    use hotswap_core::Platform;

    fn seed(dir: &Path) -> BundleId {
        let store = CatalogStore::open(&dir.join("hotswap.redb")).unwrap();
        let bundle = Bundle {
            id: BundleId::generate(),
            platform: Platform::Ios,
            target_version: "1.0".to_string(),
            file_url: None,
            file_hash: None,
            force_update: false,
            enabled: true,
            git_commit_hash: None,
            message: None,
        };
        store.append_bundle(&bundle).unwrap();
        bundle.id
    }

    #[test]
    fn toggles_flags() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_config(dir.path(), None);
        let id = seed(dir.path());

        let bundle = apply(&config, &id, &BundlePatch::enabled(false)).unwrap();
        assert!(!bundle.enabled);
        let bundle = apply(&config, &id, &BundlePatch::force_update(true)).unwrap();
        assert!(bundle.force_update);
        assert!(!bundle.enabled);
    }

    #[test]
    fn unknown_bundle_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_config(dir.path(), None);
        let err = set_enabled(&config, &BundleId::parse("missing").unwrap(), true).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
