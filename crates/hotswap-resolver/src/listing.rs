//! Catalog listings for operators.
//!
//! Unlike [`crate::resolve`], a listing keeps disabled bundles and may be
//! taken without an app version, in which case every bundle of the
//! platform is shown.

use hotswap_core::{Bundle, Platform};
use semver::Version;

use crate::filter::{RangeWarning, filter_candidates};

#[derive(Debug, Clone, Default)]
pub struct Listing {
    /// Newest first.
    pub rows: Vec<Bundle>,
    pub warnings: Vec<RangeWarning>,
}

pub fn eligible_bundles(
    bundles: &[Bundle],
    platform: Platform,
    app_version: Option<&Version>,
) -> Listing {
    let (mut rows, warnings): (Vec<Bundle>, _) = match app_version {
        Some(version) => {
            let candidates = filter_candidates(bundles, platform, version);
            (
                candidates.bundles.into_iter().cloned().collect(),
                candidates.warnings,
            )
        }
        None => (
            bundles
                .iter()
                .filter(|b| b.platform == platform)
                .cloned()
                .collect(),
            Vec::new(),
        ),
    };
    rows.sort_by(|a, b| b.id.cmp(&a.id));
    Listing { rows, warnings }
}
