//! Check identifiers and semantic version ordering.
//!
//! A custom check is identified logically by its `(owner, module, name)`
//! triple. The working draft and every published snapshot derive their
//! document ids from that triple; published ids additionally carry the
//! version so each publish point is addressable on its own.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

/// Lifecycle state of a stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordState {
    Working,
    Published,
}

impl RecordState {
    /// Single-letter prefix used in custom check ids.
    pub fn code(self) -> char {
        match self {
            Self::Working => 'W',
            Self::Published => 'P',
        }
    }

    /// Path segment used in blob paths.
    pub fn segment(self) -> &'static str {
        match self {
            Self::Working => "working",
            Self::Published => "published",
        }
    }
}

/// Logical identity shared by a working check and all of its published versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckIdentity<'a> {
    pub owner_id: &'a str,
    pub module: &'a str,
    pub name: &'a str,
}

impl<'a> CheckIdentity<'a> {
    pub fn new(owner_id: &'a str, module: &'a str, name: &'a str) -> Self {
        Self {
            owner_id,
            module,
            name,
        }
    }

    fn prefixed(&self, state: RecordState) -> String {
        format!(
            "{}-{}-{}-{}",
            state.code(),
            self.owner_id,
            self.module,
            self.name
        )
    }

    pub fn working_id(&self) -> String {
        self.prefixed(RecordState::Working)
    }

    /// Prefix shared by every published version of this check.
    pub fn published_prefix(&self) -> String {
        self.prefixed(RecordState::Published)
    }

    pub fn published_id(&self, version: &str) -> String {
        format!("{}-{}", self.published_prefix(), version)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed version '{version}': {reason}")]
pub struct MalformedVersionError {
    pub version: String,
    pub reason: String,
}

impl MalformedVersionError {
    fn new(version: &str, reason: impl Into<String>) -> Self {
        Self {
            version: version.to_string(),
            reason: reason.into(),
        }
    }
}

/// Parsed `major.minor.patch` version. Missing trailing components are zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct CheckVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl CheckVersion {
    pub const INITIAL: CheckVersion = CheckVersion {
        major: 0,
        minor: 1,
        patch: 0,
    };

    pub fn parse(raw: &str) -> Result<Self, MalformedVersionError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(MalformedVersionError::new(raw, "version is empty"));
        }

        let mut components = [0u64; 3];
        for (index, part) in trimmed.split('.').enumerate() {
            if index >= components.len() {
                return Err(MalformedVersionError::new(
                    raw,
                    "at most three components are allowed",
                ));
            }
            if part.is_empty() || !part.bytes().all(|byte| byte.is_ascii_digit()) {
                return Err(MalformedVersionError::new(
                    raw,
                    format!("component '{part}' is not numeric"),
                ));
            }
            components[index] = part.parse::<u64>().map_err(|_| {
                MalformedVersionError::new(raw, format!("component '{part}' is out of range"))
            })?;
        }

        Ok(Self {
            major: components[0],
            minor: components[1],
            patch: components[2],
        })
    }

    /// The following patch version; fails when the patch component is
    /// already at its maximum.
    pub fn next_patch(self) -> Result<Self, MalformedVersionError> {
        let patch = self.patch.checked_add(1).ok_or_else(|| {
            MalformedVersionError::new(&self.to_string(), "patch component cannot be incremented")
        })?;
        Ok(Self { patch, ..self })
    }
}

impl FromStr for CheckVersion {
    type Err = MalformedVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for CheckVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Compare two dotted version strings numerically, component by component.
pub fn compare_versions(left: &str, right: &str) -> Result<Ordering, MalformedVersionError> {
    Ok(CheckVersion::parse(left)?.cmp(&CheckVersion::parse(right)?))
}

/// Accepts versions stored either as strings or as bare numbers.
pub(crate) fn deserialize_version<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawVersion {
        Text(String),
        Integer(u64),
        Float(f64),
    }

    Ok(match RawVersion::deserialize(deserializer)? {
        RawVersion::Text(text) => text,
        RawVersion::Integer(value) => value.to_string(),
        RawVersion::Float(value) => value.to_string(),
    })
}
