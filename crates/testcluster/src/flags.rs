use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::features::{FeatureCode, UnknownFeature};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid feature flag {item:?}: {source}")]
pub struct FlagParseError {
    pub item: String,
    #[source]
    pub source: UnknownFeature,
}

/// One explicit override: force `feature` (or every feature, for `*`) on or off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureFlag {
    pub feature: FeatureCode,
    pub enabled: bool,
}

impl FeatureFlag {
    pub fn enable(feature: FeatureCode) -> Self {
        Self {
            feature,
            enabled: true,
        }
    }

    pub fn disable(feature: FeatureCode) -> Self {
        Self {
            feature,
            enabled: false,
        }
    }

    fn targets(&self, feature: FeatureCode) -> bool {
        self.feature == feature || self.feature == FeatureCode::All
    }
}

impl fmt::Display for FeatureFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.enabled {
            write!(f, "{}", self.feature)
        } else {
            write!(f, "-{}", self.feature)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagState {
    Enabled,
    Disabled,
    Unset,
}

/// Ordered override list. The last flag that targets a feature decides,
/// whether it names the feature directly or is the wildcard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureFlags(Vec<FeatureFlag>);

impl FeatureFlags {
    pub fn new(flags: Vec<FeatureFlag>) -> Self {
        Self(flags)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeatureFlag> {
        self.0.iter()
    }

    pub fn push(&mut self, flag: FeatureFlag) {
        self.0.push(flag);
    }

    // List position is the only precedence between wildcard and specific flags.
    pub fn resolve(&self, feature: FeatureCode) -> FlagState {
        let mut state = FlagState::Unset;
        for flag in self.0.iter().filter(|flag| flag.targets(feature)) {
            state = if flag.enabled {
                FlagState::Enabled
            } else {
                FlagState::Disabled
            };
        }
        state
    }
}

impl From<Vec<FeatureFlag>> for FeatureFlags {
    fn from(flags: Vec<FeatureFlag>) -> Self {
        Self(flags)
    }
}

impl fmt::Display for FeatureFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&parts.join(","))
    }
}

/// Parses the command-line form: `*,-query,+subdoc`. A leading `-` disables,
/// `+` or no prefix enables; blank items are skipped.
impl FromStr for FeatureFlags {
    type Err = FlagParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let mut flags = Vec::new();
        for item in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let (enabled, token) = match item.strip_prefix('-') {
                Some(rest) => (false, rest),
                None => (true, item.strip_prefix('+').unwrap_or(item)),
            };
            let feature = token.parse().map_err(|source| FlagParseError {
                item: item.to_string(),
                source,
            })?;
            flags.push(FeatureFlag { feature, enabled });
        }
        Ok(Self(flags))
    }
}
