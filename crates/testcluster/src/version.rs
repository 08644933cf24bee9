use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionParseError {
    #[error("version string is empty")]
    Empty,
    #[error("invalid {part} component {value:?} in version {input:?}")]
    InvalidComponent {
        part: &'static str,
        value: String,
        input: String,
    },
    #[error("too many dotted components in version {0:?}")]
    TooManyComponents(String),
}

/// Release identity of a cluster node (or of the mock).
///
/// Ordering and equality only look at `(major, minor, patch, build)`; the
/// qualifier and the mock marker ride along for reporting.
#[derive(Debug, Clone)]
pub struct NodeVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub build: u32,
    pub qualifier: String,
    pub is_mock: bool,
}

impl NodeVersion {
    pub const fn new(major: u32, minor: u32, patch: u32, build: u32) -> Self {
        Self {
            major,
            minor,
            patch,
            build,
            qualifier: String::new(),
            is_mock: false,
        }
    }

    pub const fn mock(major: u32, minor: u32, patch: u32, build: u32) -> Self {
        let mut version = Self::new(major, minor, patch, build);
        version.is_mock = true;
        version
    }

    /// Same ordinals, marked as the mock.
    pub fn into_mock(mut self) -> Self {
        self.is_mock = true;
        self
    }

    /// Same ordinals, marked as a real server.
    pub fn into_server(mut self) -> Self {
        self.is_mock = false;
        self
    }

    fn ordinals(&self) -> (u32, u32, u32, u32) {
        (self.major, self.minor, self.patch, self.build)
    }

    pub fn lower(&self, other: &NodeVersion) -> bool {
        self.ordinals() < other.ordinals()
    }

    pub fn equal(&self, other: &NodeVersion) -> bool {
        self.ordinals() == other.ordinals()
    }

    /// Derived as "not lower"; `lower` and `equal` are the primitives.
    pub fn at_least(&self, other: &NodeVersion) -> bool {
        !self.lower(other)
    }
}

impl PartialEq for NodeVersion {
    fn eq(&self, other: &Self) -> bool {
        self.equal(other)
    }
}

impl Eq for NodeVersion {}

impl Hash for NodeVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ordinals().hash(state);
    }
}

impl PartialOrd for NodeVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NodeVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ordinals().cmp(&other.ordinals())
    }
}

impl fmt::Display for NodeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if self.build != 0 {
            write!(f, "-{}", self.build)?;
        }
        if !self.qualifier.is_empty() {
            write!(f, "-{}", self.qualifier)?;
        }
        Ok(())
    }
}

/// Parses `MAJOR[.MINOR[.PATCH]][-BUILD][-QUALIFIER]`, e.g.
/// `6.5.0-4960-enterprise`. Missing ordinals are zero.
impl FromStr for NodeVersion {
    type Err = VersionParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(VersionParseError::Empty);
        }

        let mut sections = trimmed.splitn(2, '-');
        let dotted = sections.next().unwrap_or_default();
        let rest = sections.next();

        let mut ordinals = [0u32; 3];
        let parts: Vec<&str> = dotted.split('.').collect();
        if parts.len() > ordinals.len() {
            return Err(VersionParseError::TooManyComponents(input.to_string()));
        }
        const NAMES: [&str; 3] = ["major", "minor", "patch"];
        for (idx, part) in parts.iter().enumerate() {
            ordinals[idx] = parse_ordinal(NAMES[idx], part, input)?;
        }

        let mut version = NodeVersion::new(ordinals[0], ordinals[1], ordinals[2], 0);
        if let Some(rest) = rest {
            match rest.split_once('-') {
                Some((build, qualifier)) if is_ordinal(build) => {
                    version.build = parse_ordinal("build", build, input)?;
                    version.qualifier = qualifier.to_string();
                }
                None if is_ordinal(rest) => {
                    version.build = parse_ordinal("build", rest, input)?;
                }
                _ => version.qualifier = rest.to_string(),
            }
        }
        Ok(version)
    }
}

fn is_ordinal(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}

fn parse_ordinal(part: &'static str, value: &str, input: &str) -> Result<u32, VersionParseError> {
    value
        .parse::<u32>()
        .map_err(|_| VersionParseError::InvalidComponent {
            part,
            value: value.to_string(),
            input: input.to_string(),
        })
}

impl From<&semver::Version> for NodeVersion {
    fn from(version: &semver::Version) -> Self {
        let clamp = |v: u64| u32::try_from(v).unwrap_or(u32::MAX);
        let mut out = NodeVersion::new(
            clamp(version.major),
            clamp(version.minor),
            clamp(version.patch),
            0,
        );
        let pre = version.pre.as_str();
        match pre.split_once('.') {
            Some((build, qualifier)) if is_ordinal(build) => {
                out.build = build.parse().unwrap_or(0);
                out.qualifier = qualifier.to_string();
            }
            _ if is_ordinal(pre) => out.build = pre.parse().unwrap_or(0),
            _ => out.qualifier = pre.to_string(),
        }
        out
    }
}

impl Serialize for NodeVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for NodeVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
