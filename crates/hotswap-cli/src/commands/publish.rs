use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use hotswap_core::{Bundle, BundleId, Platform, VersionRange};
use sha2::{Digest, Sha256};
use tracing::debug;

use super::{open_catalog, platform_or_default};

pub struct PublishArgs {
    pub platform: Option<Platform>,
    pub target_version: String,
    pub file: Option<PathBuf>,
    pub file_url: Option<String>,
    pub force_update: bool,
    pub enabled: bool,
    pub message: Option<String>,
    pub git_commit_hash: Option<String>,
}

/// `hotswap publish`: append a bundle with a freshly minted id.
pub fn publish(config_path: &Path, args: PublishArgs) -> Result<()> {
    let bundle = publish_bundle(config_path, args)?;
    println!("✓ Published {} ({})", bundle.id, bundle.platform);
    if !bundle.enabled {
        println!("  disabled: run `hotswap enable {}` to start serving it", bundle.id);
    }
    Ok(())
}

fn publish_bundle(config_path: &Path, args: PublishArgs) -> Result<Bundle> {
    let (config, store) = open_catalog(config_path)?;
    let platform = platform_or_default(args.platform, &config)?;

    let range = VersionRange::parse(&args.target_version)?;

    let file_hash = match &args.file {
        Some(path) => Some(
            sha256_file(path).with_context(|| format!("hashing {}", path.display()))?,
        ),
        None => None,
    };

    let bundle = Bundle {
        id: BundleId::generate(),
        platform,
        target_version: range.as_str().to_string(),
        file_url: args.file_url,
        file_hash,
        force_update: args.force_update,
        enabled: args.enabled,
        git_commit_hash: args.git_commit_hash,
        message: args.message,
    };
    store.append_bundle(&bundle)?;
    Ok(bundle)
}

/// Hex-encoded SHA-256 of a file's contents.
pub fn sha256_file(path: &Path) -> Result<String> {
    let mut file = std::fs::File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    let digest = hex::encode(hasher.finalize());
    debug!(path = %path.display(), %digest, "payload hashed");
    Ok(digest)
}
