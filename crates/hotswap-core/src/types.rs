//! Shared types used across hotswap crates.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::id::BundleId;

/// Target platform of a bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Ios,
    Android,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported platform {0:?} (expected ios or android)")]
pub struct PlatformError(pub String);

impl Platform {
    pub const ALL: [Platform; 2] = [Platform::Ios, Platform::Android];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Ios => "ios",
            Platform::Android => "android",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ios" => Ok(Platform::Ios),
            "android" => Ok(Platform::Android),
            _ => Err(PlatformError(s.to_string())),
        }
    }
}

// ── Bundle ────────────────────────────────────────────────────────

/// A published payload descriptor as stored in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    pub id: BundleId,
    pub platform: Platform,
    /// Range of app versions this bundle may run on, e.g. `1.x.x`.
    pub target_version: String,
    /// `None` means "no payload" (the app's embedded bundle).
    pub file_url: Option<String>,
    /// Opaque digest of the payload, verified by the client.
    pub file_hash: Option<String>,
    pub force_update: bool,
    /// Disabled bundles stay in the catalog but are never served.
    pub enabled: bool,
    #[serde(default)]
    pub git_commit_hash: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// The fields of a bundle that may change after publish.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundlePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_update: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl BundlePatch {
    pub fn enabled(enabled: bool) -> Self {
        Self {
            enabled: Some(enabled),
            ..Default::default()
        }
    }

    pub fn force_update(force_update: bool) -> Self {
        Self {
            force_update: Some(force_update),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.enabled.is_none() && self.force_update.is_none() && self.message.is_none()
    }

    pub fn apply(&self, bundle: &mut Bundle) {
        if let Some(enabled) = self.enabled {
            bundle.enabled = enabled;
        }
        if let Some(force_update) = self.force_update {
            bundle.force_update = force_update;
        }
        if let Some(message) = &self.message {
            bundle.message = Some(message.clone());
        }
    }
}

// ── Check request / decision ──────────────────────────────────────

/// What a client reports when asking for an update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckRequest {
    pub platform: Platform,
    pub app_version: String,
    /// The bundle the client currently runs; NIL for the embedded one.
    #[serde(default)]
    pub bundle_id: BundleId,
}

impl CheckRequest {
    pub fn new(platform: Platform, app_version: impl Into<String>, bundle_id: BundleId) -> Self {
        Self {
            platform,
            app_version: app_version.into(),
            bundle_id,
        }
    }
}

/// The bundle a client should switch to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTarget {
    pub id: BundleId,
    pub file_url: Option<String>,
    pub file_hash: Option<String>,
    pub force_update: bool,
}

/// Outcome of resolving a [`CheckRequest`] against a catalog snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateDecision {
    /// Keep running the current bundle.
    None,
    /// Adopt a newer bundle.
    Update(UpdateTarget),
    /// Go back to an older bundle, or to the embedded one. Always forced.
    Rollback(UpdateTarget),
}

impl UpdateDecision {
    /// Force the client back onto the payload embedded in the app.
    pub fn rollback_to_embedded() -> Self {
        UpdateDecision::Rollback(UpdateTarget {
            id: BundleId::nil(),
            file_url: None,
            file_hash: None,
            force_update: true,
        })
    }

    pub fn update_to(bundle: &Bundle) -> Self {
        UpdateDecision::Update(UpdateTarget {
            id: bundle.id.clone(),
            file_url: bundle.file_url.clone(),
            file_hash: bundle.file_hash.clone(),
            force_update: bundle.force_update,
        })
    }

    pub fn rollback_to(bundle: &Bundle) -> Self {
        UpdateDecision::Rollback(UpdateTarget {
            id: bundle.id.clone(),
            file_url: bundle.file_url.clone(),
            file_hash: bundle.file_hash.clone(),
            force_update: true,
        })
    }

    pub fn is_none(&self) -> bool {
        matches!(self, UpdateDecision::None)
    }

    pub fn target(&self) -> Option<&UpdateTarget> {
        match self {
            UpdateDecision::None => None,
            UpdateDecision::Update(t) | UpdateDecision::Rollback(t) => Some(t),
        }
    }

    pub fn status(&self) -> Option<UpdateStatus> {
        match self {
            UpdateDecision::None => None,
            UpdateDecision::Update(_) => Some(UpdateStatus::Update),
            UpdateDecision::Rollback(_) => Some(UpdateStatus::Rollback),
        }
    }

    /// Wire form sent to clients; `None` becomes an absent payload.
    pub fn to_response(&self) -> Option<UpdateResponse> {
        let target = self.target()?;
        let status = self.status()?;
        Some(UpdateResponse {
            id: target.id.clone(),
            force_update: target.force_update,
            file_url: target.file_url.clone(),
            file_hash: target.file_hash.clone(),
            status,
        })
    }
}

impl Serialize for UpdateDecision {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_response().serialize(serializer)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UpdateStatus {
    Update,
    Rollback,
}

/// JSON payload returned to clients for an update or rollback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResponse {
    pub id: BundleId,
    pub force_update: bool,
    pub file_url: Option<String>,
    pub file_hash: Option<String>,
    pub status: UpdateStatus,
}
