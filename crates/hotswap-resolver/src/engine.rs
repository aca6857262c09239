//! Resolution engine: maps a check request and a catalog snapshot to a
//! single [`UpdateDecision`].
//!
//! [`resolve`] does no I/O and holds no state between calls.
//!
//! # Decision table
//!
//! `latest` is the enabled candidate with the greatest id; `rollback` is
//! [`is_rollback`] over the version-filtered set, before the `enabled`
//! restriction.
//!
//! | latest | rollback | id order           | decision                       |
//! |--------|----------|--------------------|--------------------------------|
//! | none   | yes      | -                  | rollback to the embedded bundle|
//! | none   | no       | -                  | none                           |
//! | some   | yes      | latest == current  | none                           |
//! | some   | yes      | latest >  current  | update to latest               |
//! | some   | yes      | latest <  current  | rollback to latest (forced)    |
//! | some   | no       | latest >  current  | update to latest               |
//! | some   | no       | otherwise          | none                           |

use hotswap_core::{
    Bundle, BundleId, BundleSource, CheckRequest, UpdateDecision, VersionError, parse_app_version,
};
use thiserror::Error;
use tracing::debug;

use crate::filter::{RangeWarning, filter_candidates};
use crate::rollback::is_rollback;

/// A decision plus any catalog data-quality problems seen on the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub decision: UpdateDecision,
    pub warnings: Vec<RangeWarning>,
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    InvalidAppVersion(#[from] VersionError),
}

#[derive(Debug, Error)]
pub enum CheckError<E: std::error::Error + 'static> {
    #[error("catalog snapshot unavailable: {0}")]
    Source(#[source] E),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Resolve `request` against a catalog snapshot.
///
/// Fails only when the request's app version cannot be parsed.
pub fn resolve(snapshot: &[Bundle], request: &CheckRequest) -> Result<Resolution, ResolveError> {
    let app_version = parse_app_version(&request.app_version)?;

    let candidates = filter_candidates(snapshot, request.platform, &app_version);
    let rollback = is_rollback(&candidates.bundles, &request.bundle_id);
    let latest = candidates
        .bundles
        .iter()
        .copied()
        .filter(|b| b.enabled)
        .max_by(|a, b| a.id.cmp(&b.id));

    let decision = decide(latest, rollback, &request.bundle_id);

    debug!(
        platform = %request.platform,
        app_version = %app_version,
        current = %request.bundle_id,
        candidates = candidates.bundles.len(),
        latest = latest.map(|b| b.id.as_str()),
        rollback,
        status = ?decision.status(),
        "update check resolved"
    );

    Ok(Resolution {
        decision,
        warnings: candidates.warnings,
    })
}

/// Fetch a snapshot from `source`, then [`resolve`] against it.
pub fn check_for_update<S: BundleSource + ?Sized>(
    source: &S,
    request: &CheckRequest,
) -> Result<Resolution, CheckError<S::Error>> {
    let snapshot = source.list_bundles().map_err(CheckError::Source)?;
    Ok(resolve(&snapshot, request)?)
}

/// The decision table itself.
pub fn decide(latest: Option<&Bundle>, rollback: bool, current: &BundleId) -> UpdateDecision {
    let Some(latest) = latest else {
        return if rollback {
            UpdateDecision::rollback_to_embedded()
        } else {
            UpdateDecision::None
        };
    };

    if rollback {
        match latest.id.cmp(current) {
            std::cmp::Ordering::Equal => UpdateDecision::None,
            std::cmp::Ordering::Greater => UpdateDecision::update_to(latest),
            std::cmp::Ordering::Less => UpdateDecision::rollback_to(latest),
        }
    } else if latest.id > *current {
        UpdateDecision::update_to(latest)
    } else {
        UpdateDecision::None
    }
}
