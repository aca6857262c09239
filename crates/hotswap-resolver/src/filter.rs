//! Candidate filter: narrows a catalog snapshot to one platform and app version.

use std::collections::HashMap;
use std::fmt;

use hotswap_core::{Bundle, BundleId, Platform, VersionError, VersionRange};
use semver::Version;
use tracing::warn;

/// A bundle whose `targetVersion` could not be parsed.
///
/// The bundle is treated as non-matching; the warning is handed back to
/// the caller so the bad catalog entry can be fixed.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeWarning {
    pub bundle_id: BundleId,
    pub target_version: String,
    pub reason: String,
}

impl fmt::Display for RangeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "bundle {} has unusable target version {:?}: {}",
            self.bundle_id, self.target_version, self.reason
        )
    }
}

/// Bundles that passed the filter, in catalog order.
#[derive(Debug, Clone, Default)]
pub struct Candidates<'a> {
    pub bundles: Vec<&'a Bundle>,
    pub warnings: Vec<RangeWarning>,
}

/// Keep the bundles built for `platform` whose target range admits `app_version`.
///
/// Both enabled and disabled bundles are kept; callers decide what
/// `enabled` means for them.
pub fn filter_candidates<'a>(
    bundles: &'a [Bundle],
    platform: Platform,
    app_version: &Version,
) -> Candidates<'a> {
    // Catalogs repeat the same handful of ranges; parse each once.
    let mut ranges: HashMap<&str, Result<VersionRange, VersionError>> = HashMap::new();
    let mut candidates = Candidates::default();

    for bundle in bundles.iter().filter(|b| b.platform == platform) {
        let range = ranges
            .entry(bundle.target_version.as_str())
            .or_insert_with(|| VersionRange::parse(&bundle.target_version));

        match range {
            Ok(range) => {
                if range.matches(app_version) {
                    candidates.bundles.push(bundle);
                }
            }
            Err(e) => {
                warn!(
                    bundle_id = %bundle.id,
                    target_version = %bundle.target_version,
                    error = %e,
                    "skipping bundle with malformed target version"
                );
                candidates.warnings.push(RangeWarning {
                    bundle_id: bundle.id.clone(),
                    target_version: bundle.target_version.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    candidates
}
