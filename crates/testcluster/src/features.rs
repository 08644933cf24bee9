use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::version::NodeVersion;

const SRV_VER_180: NodeVersion = NodeVersion::new(1, 8, 0, 0);
const SRV_VER_200: NodeVersion = NodeVersion::new(2, 0, 0, 0);
const SRV_VER_400: NodeVersion = NodeVersion::new(4, 0, 0, 0);
const SRV_VER_450: NodeVersion = NodeVersion::new(4, 5, 0, 0);
const SRV_VER_500: NodeVersion = NodeVersion::new(5, 0, 0, 0);
const SRV_VER_551: NodeVersion = NodeVersion::new(5, 5, 1, 0);
const SRV_VER_552: NodeVersion = NodeVersion::new(5, 5, 2, 0);
const SRV_VER_553: NodeVersion = NodeVersion::new(5, 5, 3, 0);
const SRV_VER_600: NodeVersion = NodeVersion::new(6, 0, 0, 0);
const SRV_VER_650: NodeVersion = NodeVersion::new(6, 5, 0, 0);
const SRV_VER_700: NodeVersion = NodeVersion::new(7, 0, 0, 0);
const MOCK_VER_156: NodeVersion = NodeVersion::mock(1, 5, 6, 0);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown feature code {0:?}")]
pub struct UnknownFeature(pub String);

/// Optional behaviours a test may require. `All` is the `*` wildcard used by
/// feature flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FeatureCode {
    #[serde(rename = "keyvalue")]
    KeyValue,
    #[serde(rename = "view")]
    View,
    #[serde(rename = "query")]
    Query,
    #[serde(rename = "subdoc")]
    Subdoc,
    #[serde(rename = "rbac")]
    Rbac,
    #[serde(rename = "search")]
    Search,
    #[serde(rename = "searchindex")]
    SearchIndex,
    #[serde(rename = "analytics")]
    Analytics,
    #[serde(rename = "xattrs")]
    Xattr,
    #[serde(rename = "collections")]
    Collections,
    #[serde(rename = "subdocmockbug")]
    SubdocMockBug,
    #[serde(rename = "adjoin")]
    Adjoin,
    #[serde(rename = "expandmacros")]
    ExpandMacros,
    #[serde(rename = "durability")]
    Durability,
    #[serde(rename = "usergroup")]
    UserGroup,
    #[serde(rename = "usermanager")]
    UserManager,
    #[serde(rename = "analyticsindex")]
    AnalyticsIndex,
    #[serde(rename = "bucketmgr")]
    BucketMgr,
    #[serde(rename = "searchanalyze")]
    SearchAnalyze,
    #[serde(rename = "analyticspending")]
    AnalyticsIndexPendingMutations,
    #[serde(rename = "getmeta")]
    GetMeta,
    #[serde(rename = "ping")]
    Ping,
    #[serde(rename = "viewinsertupsertbug")]
    ViewIndexUpsertBug,
    #[serde(rename = "replicas")]
    Replicas,
    #[serde(rename = "*")]
    All,
}

impl FeatureCode {
    /// Every concrete feature, excluding the wildcard.
    pub const KNOWN: [FeatureCode; 24] = [
        FeatureCode::KeyValue,
        FeatureCode::View,
        FeatureCode::Query,
        FeatureCode::Subdoc,
        FeatureCode::Rbac,
        FeatureCode::Search,
        FeatureCode::SearchIndex,
        FeatureCode::Analytics,
        FeatureCode::Xattr,
        FeatureCode::Collections,
        FeatureCode::SubdocMockBug,
        FeatureCode::Adjoin,
        FeatureCode::ExpandMacros,
        FeatureCode::Durability,
        FeatureCode::UserGroup,
        FeatureCode::UserManager,
        FeatureCode::AnalyticsIndex,
        FeatureCode::BucketMgr,
        FeatureCode::SearchAnalyze,
        FeatureCode::AnalyticsIndexPendingMutations,
        FeatureCode::GetMeta,
        FeatureCode::Ping,
        FeatureCode::ViewIndexUpsertBug,
        FeatureCode::Replicas,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureCode::KeyValue => "keyvalue",
            FeatureCode::View => "view",
            FeatureCode::Query => "query",
            FeatureCode::Subdoc => "subdoc",
            FeatureCode::Rbac => "rbac",
            FeatureCode::Search => "search",
            FeatureCode::SearchIndex => "searchindex",
            FeatureCode::Analytics => "analytics",
            FeatureCode::Xattr => "xattrs",
            FeatureCode::Collections => "collections",
            FeatureCode::SubdocMockBug => "subdocmockbug",
            FeatureCode::Adjoin => "adjoin",
            FeatureCode::ExpandMacros => "expandmacros",
            FeatureCode::Durability => "durability",
            FeatureCode::UserGroup => "usergroup",
            FeatureCode::UserManager => "usermanager",
            FeatureCode::AnalyticsIndex => "analyticsindex",
            FeatureCode::BucketMgr => "bucketmgr",
            FeatureCode::SearchAnalyze => "searchanalyze",
            FeatureCode::AnalyticsIndexPendingMutations => "analyticspending",
            FeatureCode::GetMeta => "getmeta",
            FeatureCode::Ping => "ping",
            FeatureCode::ViewIndexUpsertBug => "viewinsertupsertbug",
            FeatureCode::Replicas => "replicas",
            FeatureCode::All => "*",
        }
    }
}

impl fmt::Display for FeatureCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureCode {
    type Err = UnknownFeature;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let token = token.trim();
        if token == FeatureCode::All.as_str() {
            return Ok(FeatureCode::All);
        }
        FeatureCode::KNOWN
            .into_iter()
            .find(|code| code.as_str() == token)
            .ok_or_else(|| UnknownFeature(token.to_string()))
    }
}

/// Catalog answer for a mock deployment. The mock is assumed to support
/// everything it has not been shown to lack.
pub fn mock_supports(feature: FeatureCode, version: &NodeVersion) -> bool {
    match feature {
        FeatureCode::Rbac => version.at_least(&MOCK_VER_156),
        FeatureCode::SearchIndex
        | FeatureCode::Analytics
        | FeatureCode::Query
        | FeatureCode::Search
        | FeatureCode::Xattr
        | FeatureCode::Collections
        | FeatureCode::SubdocMockBug
        | FeatureCode::ExpandMacros
        | FeatureCode::Durability
        | FeatureCode::UserGroup
        | FeatureCode::UserManager
        | FeatureCode::AnalyticsIndex
        | FeatureCode::BucketMgr
        | FeatureCode::SearchAnalyze
        | FeatureCode::AnalyticsIndexPendingMutations
        | FeatureCode::GetMeta
        | FeatureCode::Ping => false,
        _ => true,
    }
}

/// Catalog answer for a real server. Anything without a rule is unsupported.
pub fn server_supports(feature: FeatureCode, version: &NodeVersion) -> bool {
    match feature {
        FeatureCode::KeyValue => version.at_least(&SRV_VER_180),
        FeatureCode::View => version.at_least(&SRV_VER_200),
        FeatureCode::Query => version.at_least(&SRV_VER_400),
        FeatureCode::Subdoc | FeatureCode::Xattr | FeatureCode::ExpandMacros => {
            version.at_least(&SRV_VER_450)
        }
        FeatureCode::Rbac
        | FeatureCode::Search
        | FeatureCode::SearchIndex
        | FeatureCode::UserManager => version.at_least(&SRV_VER_500),
        FeatureCode::Analytics | FeatureCode::AnalyticsIndex => version.at_least(&SRV_VER_600),
        FeatureCode::Durability
        | FeatureCode::UserGroup
        | FeatureCode::SearchAnalyze
        | FeatureCode::AnalyticsIndexPendingMutations => version.at_least(&SRV_VER_650),
        FeatureCode::Collections => version.at_least(&SRV_VER_700),
        FeatureCode::SubdocMockBug
        | FeatureCode::BucketMgr
        | FeatureCode::GetMeta
        | FeatureCode::Ping => true,
        // 5.5.1 through 5.5.3 shipped a broken append.
        FeatureCode::Adjoin => {
            !version.equal(&SRV_VER_551)
                && !version.equal(&SRV_VER_552)
                && !version.equal(&SRV_VER_553)
        }
        FeatureCode::ViewIndexUpsertBug => !version.equal(&SRV_VER_650),
        _ => false,
    }
}

/// Catalog lookup for either deployment kind, keyed off `version.is_mock`.
pub fn catalog_supports(feature: FeatureCode, version: &NodeVersion) -> bool {
    if version.is_mock {
        mock_supports(feature, version)
    } else {
        server_supports(feature, version)
    }
}
