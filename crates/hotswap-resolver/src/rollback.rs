//! Rollback detector.
//!
//! A client whose current bundle is no longer among the version-filtered
//! candidates has drifted outside the servable window (the bundle was
//! pulled, or the app itself was downgraded below the bundle's range).
//! Membership is by identity only; `enabled` is not consulted, so merely
//! disabling a bundle does not make its users stale.

use hotswap_core::{Bundle, BundleId};

/// True when `current` is a real bundle that none of `filtered` carries.
pub fn is_rollback(filtered: &[&Bundle], current: &BundleId) -> bool {
    if current.is_nil() {
        return false;
    }
    !filtered.iter().any(|b| b.id == *current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hotswap_core::Platform;

    fn bundle(id: &str, enabled: bool) -> Bundle {
        Bundle {
            id: BundleId::parse(id).unwrap(),
            platform: Platform::Ios,
            target_version: "1.0".to_string(),
            file_url: None,
            file_hash: None,
            force_update: false,
            enabled,
            git_commit_hash: None,
            message: None,
        }
    }

    #[test]
    fn nil_is_never_a_rollback() {
        assert!(!is_rollback(&[], &BundleId::nil()));
        let b = bundle("1", true);
        assert!(!is_rollback(&[&b], &BundleId::nil()));
    }

    #[test]
    fn missing_current_bundle_is_a_rollback() {
        let b = bundle("1", true);
        assert!(is_rollback(&[&b], &BundleId::parse("2").unwrap()));
        assert!(is_rollback(&[], &BundleId::parse("2").unwrap()));
    }

    #[test]
    fn present_current_bundle_is_not_a_rollback() {
        let a = bundle("1", true);
        let b = bundle("2", true);
        assert!(!is_rollback(&[&a, &b], &BundleId::parse("2").unwrap()));
    }

    #[test]
    fn membership_ignores_enabled_flag() {
        let disabled = bundle("2", false);
        assert!(!is_rollback(&[&disabled], &BundleId::parse("2").unwrap()));
    }
}
