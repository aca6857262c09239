//! Sortable bundle identifiers.
//!
//! A bundle id is assigned once, at publish time, and is the only field
//! used to decide whether one bundle is newer than another. Freshly minted
//! ids are UUIDv7 strings: fixed width, lowercase, with the millisecond
//! timestamp in the leading bytes, so byte-wise order is creation order.
//!
//! The NIL id stands for "the payload that shipped inside the app" and
//! sorts below every other id, including ids that were not minted by
//! [`BundleId::generate`] (hand-written catalogs sometimes use `"5"` or
//! timestamps like `"20240722210327"`).

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// String form of the NIL bundle id.
pub const NIL_BUNDLE_ID: &str = "00000000-0000-0000-0000-000000000000";

/// Identifier of a published bundle.
///
/// Deserialization goes through [`BundleId::parse`], so every `BundleId`
/// in memory is non-empty and free of whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BundleId(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BundleIdError {
    #[error("bundle id must not be empty")]
    Empty,
    #[error("bundle id must not contain whitespace: {0:?}")]
    Whitespace(String),
}

impl BundleId {
    /// The id of the payload embedded in the application binary.
    pub fn nil() -> Self {
        Self(NIL_BUNDLE_ID.to_string())
    }

    /// Mint a new id. Within one process, successive calls are strictly
    /// increasing even inside the same millisecond.
    pub fn generate() -> Self {
        Self(Uuid::now_v7().hyphenated().to_string())
    }

    /// Accept an id received from a client or a catalog record.
    pub fn parse(raw: &str) -> Result<Self, BundleIdError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(BundleIdError::Empty);
        }
        if raw.chars().any(char::is_whitespace) {
            return Err(BundleIdError::Whitespace(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn is_nil(&self) -> bool {
        self.0 == NIL_BUNDLE_ID
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for BundleId {
    fn default() -> Self {
        Self::nil()
    }
}

impl Ord for BundleId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.is_nil(), other.is_nil()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => self.0.as_bytes().cmp(other.0.as_bytes()),
        }
    }
}

impl PartialOrd for BundleId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for BundleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for BundleId {
    type Err = BundleIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for BundleId {
    type Error = BundleIdError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw)
    }
}

impl From<BundleId> for String {
    fn from(id: BundleId) -> Self {
        id.0
    }
}

impl AsRef<str> for BundleId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
