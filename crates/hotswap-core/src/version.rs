//! Target-version range matching.
//!
//! Bundle publishers write npm-style ranges (`1.x.x`, `~1.2`, `^0.4.1`,
//! `>=1.0 <2`, `1.2 - 1.4`, alternatives joined with `||`). Each range is
//! desugared into comparator sets over [`semver::Version`]; a version
//! matches when every comparator of at least one set holds.
//!
//! App versions come from store metadata and are often shortened, so
//! [`parse_app_version`] coerces `1.0` to `1.0.0`.

use std::fmt;
use std::str::FromStr;

use semver::{BuildMetadata, Prerelease, Version};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("invalid app version {0:?}")]
    InvalidVersion(String),
    #[error("invalid version range {range:?}: {reason}")]
    InvalidRange { range: String, reason: String },
}

/// Parse the version a client reports for itself.
///
/// Missing minor/patch segments default to zero; wildcards are rejected
/// because a running app always has a concrete version.
pub fn parse_app_version(input: &str) -> Result<Version, VersionError> {
    let invalid = || VersionError::InvalidVersion(input.to_string());
    let partial = Partial::parse(input.trim()).map_err(|_| invalid())?;
    if partial.wildcard {
        return Err(invalid());
    }
    let major = partial.major.ok_or_else(invalid)?;
    Ok(Version {
        major,
        minor: partial.minor.unwrap_or(0),
        patch: partial.patch.unwrap_or(0),
        pre: partial.pre,
        build: BuildMetadata::EMPTY,
    })
}

/// Check `app_version` against a raw range expression.
pub fn matches(app_version: &Version, range: &str) -> Result<bool, VersionError> {
    Ok(VersionRange::parse(range)?.matches(app_version))
}

/// A parsed range expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRange {
    raw: String,
    sets: Vec<ComparatorSet>,
}

impl VersionRange {
    pub fn parse(input: &str) -> Result<Self, VersionError> {
        let sets = input
            .split("||")
            .map(|alt| ComparatorSet::parse(alt.trim()))
            .collect::<Result<Vec<_>, String>>()
            .map_err(|reason| VersionError::InvalidRange {
                range: input.to_string(),
                reason,
            })?;
        Ok(Self {
            raw: input.trim().to_string(),
            sets,
        })
    }

    pub fn matches(&self, version: &Version) -> bool {
        self.sets.iter().any(|set| set.test(version))
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl FromStr for VersionRange {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

// ── Comparators ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Eq,
    Lt,
    Le,
    Gt,
    Ge,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Comparator {
    op: Op,
    version: Version,
}

impl Comparator {
    fn new(op: Op, version: Version) -> Self {
        Self { op, version }
    }

    /// Matches nothing: no version sorts below `0.0.0-0`.
    fn never() -> Self {
        Self::new(Op::Lt, floor(0, 0, 0))
    }

    fn test(&self, v: &Version) -> bool {
        match self.op {
            Op::Eq => *v == self.version,
            Op::Lt => *v < self.version,
            Op::Le => *v <= self.version,
            Op::Gt => *v > self.version,
            Op::Ge => *v >= self.version,
        }
    }
}

/// Comparators that must all hold. Empty means "any release".
#[derive(Debug, Clone, PartialEq, Eq)]
struct ComparatorSet {
    comparators: Vec<Comparator>,
}

impl ComparatorSet {
    fn parse(input: &str) -> Result<Self, String> {
        let tokens = tokenize(input);

        if tokens.len() == 3 && tokens[1] == "-" {
            let lower = Partial::parse(&tokens[0])?;
            let upper = Partial::parse(&tokens[2])?;
            return Ok(Self {
                comparators: hyphen(&lower, &upper)?,
            });
        }

        let mut comparators = Vec::new();
        for token in &tokens {
            comparators.extend(desugar(token)?);
        }
        Ok(Self { comparators })
    }

    fn test(&self, version: &Version) -> bool {
        if !self.comparators.iter().all(|c| c.test(version)) {
            return false;
        }
        if version.pre.is_empty() {
            return true;
        }
        // A pre-release only matches when the range opts into pre-releases
        // of that exact major.minor.patch.
        self.comparators.iter().any(|c| {
            !c.version.pre.is_empty()
                && c.version.major == version.major
                && c.version.minor == version.minor
                && c.version.patch == version.patch
        })
    }
}

const OPERATORS: [&str; 8] = [">=", "<=", ">", "<", "=", "~>", "~", "^"];

/// Split on whitespace, gluing a bare operator to the version after it.
fn tokenize(input: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    let mut pending_op: Option<&str> = None;
    for word in input.split_whitespace() {
        if let Some(op) = OPERATORS.iter().find(|op| **op == word) {
            pending_op = Some(*op);
            continue;
        }
        match pending_op.take() {
            Some(op) => tokens.push(format!("{op}{word}")),
            None => tokens.push(word.to_string()),
        }
    }
    if let Some(op) = pending_op {
        tokens.push(op.to_string());
    }
    tokens
}

fn desugar(token: &str) -> Result<Vec<Comparator>, String> {
    if let Some(rest) = token.strip_prefix("~>").or_else(|| token.strip_prefix('~')) {
        return tilde(&Partial::parse(rest)?);
    }
    if let Some(rest) = token.strip_prefix('^') {
        return caret(&Partial::parse(rest)?);
    }
    let (op, rest) = if let Some(rest) = token.strip_prefix(">=") {
        (Op::Ge, rest)
    } else if let Some(rest) = token.strip_prefix("<=") {
        (Op::Le, rest)
    } else if let Some(rest) = token.strip_prefix('>') {
        (Op::Gt, rest)
    } else if let Some(rest) = token.strip_prefix('<') {
        (Op::Lt, rest)
    } else {
        (Op::Eq, token)
    };
    primitive(op, &Partial::parse(rest)?)
}

fn tilde(p: &Partial) -> Result<Vec<Comparator>, String> {
    let Some(major) = p.major else {
        return Ok(Vec::new());
    };
    Ok(match (p.minor, p.patch) {
        (None, _) => bounded(floor_release(major, 0, 0), floor(bump(major)?, 0, 0)),
        (Some(minor), None) => {
            bounded(floor_release(major, minor, 0), floor(major, bump(minor)?, 0))
        }
        (Some(minor), Some(_)) => bounded(p.lower(), floor(major, bump(minor)?, 0)),
    })
}

fn caret(p: &Partial) -> Result<Vec<Comparator>, String> {
    let Some(major) = p.major else {
        return Ok(Vec::new());
    };
    Ok(match (p.minor, p.patch) {
        (None, _) => bounded(floor_release(major, 0, 0), floor(bump(major)?, 0, 0)),
        (Some(minor), None) if major == 0 => {
            bounded(floor_release(0, minor, 0), floor(0, bump(minor)?, 0))
        }
        (Some(minor), None) => bounded(floor_release(major, minor, 0), floor(bump(major)?, 0, 0)),
        (Some(minor), Some(patch)) => {
            let upper = if major != 0 {
                floor(bump(major)?, 0, 0)
            } else if minor != 0 {
                floor(0, bump(minor)?, 0)
            } else {
                floor(0, 0, bump(patch)?)
            };
            bounded(p.lower(), upper)
        }
    })
}

fn primitive(op: Op, p: &Partial) -> Result<Vec<Comparator>, String> {
    if let Some(full) = p.full() {
        return Ok(vec![Comparator::new(op, full)]);
    }
    let Some(major) = p.major else {
        return Ok(match op {
            Op::Gt | Op::Lt => vec![Comparator::never()],
            _ => Vec::new(),
        });
    };
    // Partial version: the unset segments are a wildcard.
    let minor = p.minor.unwrap_or(0);
    let next = match p.minor {
        None => floor_release(bump(major)?, 0, 0),
        Some(minor) => floor_release(major, bump(minor)?, 0),
    };
    Ok(match op {
        Op::Eq => bounded(floor_release(major, minor, 0), as_floor(&next)),
        Op::Gt => vec![Comparator::new(Op::Ge, next)],
        Op::Ge => vec![Comparator::new(Op::Ge, floor_release(major, minor, 0))],
        Op::Lt => vec![Comparator::new(Op::Lt, floor(major, minor, 0))],
        Op::Le => vec![Comparator::new(Op::Lt, as_floor(&next))],
    })
}

fn hyphen(lower: &Partial, upper: &Partial) -> Result<Vec<Comparator>, String> {
    let mut comparators = Vec::new();
    if lower.major.is_some() {
        comparators.push(Comparator::new(Op::Ge, lower.lower()));
    }
    if let Some(major) = upper.major {
        let bound = match (upper.minor, upper.full()) {
            (None, _) => Comparator::new(Op::Lt, floor(bump(major)?, 0, 0)),
            (Some(_), Some(full)) => Comparator::new(Op::Le, full),
            (Some(minor), None) => Comparator::new(Op::Lt, floor(major, bump(minor)?, 0)),
        };
        comparators.push(bound);
    }
    Ok(comparators)
}

/// The next value of a wildcarded segment, for exclusive upper bounds.
fn bump(segment: u64) -> Result<u64, String> {
    segment
        .checked_add(1)
        .ok_or_else(|| format!("segment {segment} has no upper bound"))
}

fn bounded(lower: Version, upper: Version) -> Vec<Comparator> {
    vec![
        Comparator::new(Op::Ge, lower),
        Comparator::new(Op::Lt, upper),
    ]
}

fn floor_release(major: u64, minor: u64, patch: u64) -> Version {
    Version::new(major, minor, patch)
}

/// The lowest version of a `major.minor.patch` tuple, `X.Y.Z-0`, used as
/// an exclusive upper bound so pre-releases of the next tuple are excluded.
fn floor(major: u64, minor: u64, patch: u64) -> Version {
    as_floor(&Version::new(major, minor, patch))
}

fn as_floor(v: &Version) -> Version {
    let mut v = v.clone();
    v.pre = Prerelease::new("0").expect("`0` is a valid pre-release identifier");
    v
}

// ── Partial versions ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
struct Partial {
    major: Option<u64>,
    minor: Option<u64>,
    patch: Option<u64>,
    pre: Prerelease,
    /// An explicit `x`, `X` or `*` segment was present.
    wildcard: bool,
}

impl Partial {
    fn parse(input: &str) -> Result<Self, String> {
        let s = input.strip_prefix('=').unwrap_or(input).trim();
        let s = s.strip_prefix(['v', 'V']).unwrap_or(s);

        let s = s.split_once('+').map_or(s, |(core, _build)| core);
        let (core, pre) = match s.split_once('-') {
            Some((core, pre)) => (core, Some(pre)),
            None => (s, None),
        };

        if core.is_empty() {
            return Err(format!("missing version in {input:?}"));
        }
        let parts: Vec<&str> = core.split('.').collect();
        if parts.len() > 3 {
            return Err(format!("too many segments in {input:?}"));
        }

        let mut segments: [Option<u64>; 3] = [None; 3];
        let mut wildcard = false;
        for (slot, part) in segments.iter_mut().zip(&parts) {
            if matches!(*part, "x" | "X" | "*") {
                wildcard = true;
                continue;
            }
            if wildcard {
                // `1.x.3` reads as `1.x`.
                continue;
            }
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(format!("invalid segment {part:?} in {input:?}"));
            }
            *slot = Some(
                part.parse::<u64>()
                    .map_err(|e| format!("segment {part:?} in {input:?}: {e}"))?,
            );
        }

        let pre = match pre {
            Some("") => return Err(format!("empty pre-release in {input:?}")),
            Some(pre) => Prerelease::new(pre)
                .map_err(|e| format!("invalid pre-release in {input:?}: {e}"))?,
            None => Prerelease::EMPTY,
        };

        let [major, minor, patch] = segments;
        Ok(Self {
            major,
            minor,
            patch,
            pre,
            wildcard,
        })
    }

    fn full(&self) -> Option<Version> {
        Some(Version {
            major: self.major?,
            minor: self.minor?,
            patch: self.patch?,
            pre: self.pre.clone(),
            build: BuildMetadata::EMPTY,
        })
    }

    /// Inclusive lower bound, with unset segments read as zero.
    fn lower(&self) -> Version {
        self.full().unwrap_or_else(|| {
            floor_release(
                self.major.unwrap_or(0),
                self.minor.unwrap_or(0),
                self.patch.unwrap_or(0),
            )
        })
    }
}
