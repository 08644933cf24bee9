use std::sync::Arc;
use std::time::Duration;

use crate::client::{Bucket, ClusterClient};
use crate::error::TestClusterError;
use crate::features::FeatureCode;
use crate::flags::FeatureFlags;
use crate::resolver::FeatureResolver;
use crate::time_travel::{MockControl, TimeController};
use crate::version::NodeVersion;

/// The deployment a test suite runs against: a client handle plus what the
/// suite knows about that deployment. Client calls are delegated explicitly.
#[derive(Debug)]
pub struct TestCluster<C> {
    client: Arc<C>,
    resolver: FeatureResolver,
    time: TimeController,
}

impl<C> Clone for TestCluster<C> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            resolver: self.resolver.clone(),
            time: self.time.clone(),
        }
    }
}

impl<C: ClusterClient> TestCluster<C> {
    pub fn real(client: Arc<C>, version: NodeVersion, flags: FeatureFlags) -> Self {
        Self {
            client,
            resolver: FeatureResolver::new(version.into_server(), flags),
            time: TimeController::real(),
        }
    }

    pub fn mocked(
        client: Arc<C>,
        mock: Arc<dyn MockControl>,
        version: NodeVersion,
        flags: FeatureFlags,
    ) -> Self {
        Self {
            client,
            resolver: FeatureResolver::new(version.into_mock(), flags),
            time: TimeController::mocked(mock),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn version(&self) -> &NodeVersion {
        self.resolver.version()
    }

    pub fn resolver(&self) -> &FeatureResolver {
        &self.resolver
    }

    pub fn is_mock(&self) -> bool {
        self.time.is_mock()
    }

    pub fn supports_feature(&self, feature: FeatureCode) -> bool {
        self.resolver.supports(feature)
    }

    pub fn not_supports_feature(&self, feature: FeatureCode) -> bool {
        self.resolver.not_supports(feature)
    }

    pub async fn time_travel(&self, wait: Duration) -> Result<(), TestClusterError> {
        Ok(self.time.advance(wait).await?)
    }

    pub fn bucket(&self, name: &str) -> C::Bucket {
        self.client.bucket(name)
    }

    pub fn default_collection(
        &self,
        bucket: &C::Bucket,
    ) -> <C::Bucket as Bucket>::Collection {
        bucket.default_collection()
    }
}
