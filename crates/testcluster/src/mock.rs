//! Client and control-channel implementations backed by [`MockCluster`].

use std::sync::Arc;

use async_trait::async_trait;
use mock_cluster::{ControlError, MockCluster, MockCommand, StoreError};
use serde_json::Value;

use crate::client::{Bucket, ClientError, ClusterClient, Collection};
use crate::time_travel::MockControl;
use crate::version::{NodeVersion, VersionParseError};

impl From<StoreError> for ClientError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::BucketNotFound { bucket } => ClientError::BucketNotFound { bucket },
            StoreError::CollectionNotFound { collection, .. } => {
                ClientError::CollectionNotFound { collection }
            }
            StoreError::DocumentNotFound { key } => ClientError::DocumentNotFound { key },
            other => ClientError::Other(other.to_string()),
        }
    }
}

#[async_trait]
impl MockControl for MockCluster {
    async fn control(&self, command: MockCommand) -> Result<(), ControlError> {
        self.execute(&command).map(|_| ())
    }
}

/// Version the mock reports, flagged as a mock.
pub fn mock_version(mock: &MockCluster) -> Result<NodeVersion, VersionParseError> {
    parse_mock_version(mock.version())
}

/// Version of the bundled mock release, flagged as a mock.
pub fn bundled_mock_version() -> Result<NodeVersion, VersionParseError> {
    parse_mock_version(MockCluster::VERSION)
}

fn parse_mock_version(raw: &str) -> Result<NodeVersion, VersionParseError> {
    raw.parse::<NodeVersion>().map(NodeVersion::into_mock)
}

#[derive(Debug, Clone)]
pub struct MockClient {
    cluster: Arc<MockCluster>,
}

impl MockClient {
    pub fn new(cluster: Arc<MockCluster>) -> Self {
        Self { cluster }
    }

    pub fn cluster(&self) -> &Arc<MockCluster> {
        &self.cluster
    }
}

impl ClusterClient for MockClient {
    type Bucket = MockBucket;

    fn bucket(&self, name: &str) -> MockBucket {
        MockBucket {
            cluster: self.cluster.clone(),
            name: name.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MockBucket {
    cluster: Arc<MockCluster>,
    name: String,
}

impl Bucket for MockBucket {
    type Collection = MockCollection;

    fn name(&self) -> &str {
        &self.name
    }

    fn collection(&self, name: &str) -> MockCollection {
        MockCollection {
            cluster: self.cluster.clone(),
            bucket: self.name.clone(),
            name: name.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MockCollection {
    cluster: Arc<MockCluster>,
    bucket: String,
    name: String,
}

#[async_trait]
impl Collection for MockCollection {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get(&self, key: &str) -> Result<Value, ClientError> {
        Ok(self.cluster.get(&self.bucket, &self.name, key)?)
    }

    async fn upsert(&self, key: &str, value: Value) -> Result<(), ClientError> {
        Ok(self
            .cluster
            .upsert(&self.bucket, &self.name, key, value, None)?)
    }
}
