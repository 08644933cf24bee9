use serde::Serialize;
use tracing::debug;

use crate::features::{FeatureCode, catalog_supports};
use crate::flags::{FeatureFlags, FlagState};
use crate::version::NodeVersion;

/// Deployment identity plus configured overrides. Built once at suite setup
/// and only read afterwards.
#[derive(Debug, Clone)]
pub struct FeatureResolver {
    version: NodeVersion,
    flags: FeatureFlags,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeatureDecision {
    pub feature: FeatureCode,
    pub supported: bool,
    pub flag: FlagState,
}

impl FeatureResolver {
    pub fn new(version: NodeVersion, flags: FeatureFlags) -> Self {
        Self { version, flags }
    }

    pub fn version(&self) -> &NodeVersion {
        &self.version
    }

    pub fn flags(&self) -> &FeatureFlags {
        &self.flags
    }

    pub fn is_mock(&self) -> bool {
        self.version.is_mock
    }

    pub fn supports(&self, feature: FeatureCode) -> bool {
        match self.flags.resolve(feature) {
            FlagState::Enabled => {
                debug!(%feature, "feature forced on by flag");
                true
            }
            FlagState::Disabled => {
                debug!(%feature, "feature forced off by flag");
                false
            }
            FlagState::Unset => catalog_supports(feature, &self.version),
        }
    }

    pub fn not_supports(&self, feature: FeatureCode) -> bool {
        !self.supports(feature)
    }

    /// String entry point; tokens that name no known feature are unsupported.
    pub fn supports_token(&self, token: &str) -> bool {
        match token.parse::<FeatureCode>() {
            Ok(feature) => self.supports(feature),
            Err(err) => {
                debug!(%err, "treating unknown feature as unsupported");
                false
            }
        }
    }

    pub fn decide(&self, feature: FeatureCode) -> FeatureDecision {
        FeatureDecision {
            feature,
            supported: self.supports(feature),
            flag: self.flags.resolve(feature),
        }
    }

    /// Decisions for every known feature, in catalog order.
    pub fn report(&self) -> Vec<FeatureDecision> {
        FeatureCode::KNOWN
            .into_iter()
            .map(|feature| self.decide(feature))
            .collect()
    }
}
