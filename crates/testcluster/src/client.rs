//! The slice of the client API the harness drives. Real connections and the
//! mock both sit behind these traits.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub const DEFAULT_COLLECTION: &str = "_default";

/// Error classes the harness branches on. Anything else is `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("bucket not found: {bucket}")]
    BucketNotFound { bucket: String },
    #[error("collection not found: {collection}")]
    CollectionNotFound { collection: String },
    #[error("document not found: {key}")]
    DocumentNotFound { key: String },
    #[error("{0}")]
    Other(String),
}

pub trait ClusterClient: Send + Sync {
    type Bucket: Bucket;

    fn bucket(&self, name: &str) -> Self::Bucket;
}

pub trait Bucket: Send + Sync {
    type Collection: Collection;

    fn name(&self) -> &str;

    fn collection(&self, name: &str) -> Self::Collection;

    fn default_collection(&self) -> Self::Collection {
        self.collection(DEFAULT_COLLECTION)
    }
}

#[async_trait]
pub trait Collection: Send + Sync {
    fn name(&self) -> &str;

    async fn get(&self, key: &str) -> Result<Value, ClientError>;

    async fn upsert(&self, key: &str, value: Value) -> Result<(), ClientError>;
}
