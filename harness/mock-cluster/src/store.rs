use std::collections::BTreeMap;
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::{Value, json};
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::control::{CommandCode, ControlError, MockCommand, MockResponse};

pub const DEFAULT_BUCKET: &str = "default";
pub const DEFAULT_COLLECTION: &str = "_default";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("bucket {bucket} not found")]
    BucketNotFound { bucket: String },
    #[error("collection {collection} not found in bucket {bucket}")]
    CollectionNotFound { bucket: String, collection: String },
    #[error("document {key} not found")]
    DocumentNotFound { key: String },
    #[error("collection {collection} already exists in bucket {bucket}")]
    CollectionExists { bucket: String, collection: String },
}

#[derive(Debug)]
struct Document {
    value: Value,
    expires_at: Option<Duration>,
}

#[derive(Debug)]
struct CollectionState {
    visible_at: Instant,
    docs: BTreeMap<String, Document>,
}

impl CollectionState {
    fn visible_after(delay: Duration) -> Self {
        Self {
            visible_at: Instant::now() + delay,
            docs: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Default)]
struct BucketState {
    collections: BTreeMap<String, CollectionState>,
}

#[derive(Debug, Default)]
struct State {
    clock_offset: Duration,
    buckets: BTreeMap<String, BucketState>,
    command_log: Vec<MockCommand>,
}

/// In-process stand-in for a cluster: buckets of collections of JSON
/// documents, a logical clock that can be moved forward, and collections
/// that only become readable after a propagation delay.
#[derive(Debug)]
pub struct MockCluster {
    epoch: Instant,
    state: Mutex<State>,
}

impl Default for MockCluster {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCluster {
    pub const VERSION: &'static str = "1.5.15";

    /// A mock with the `default` bucket and its `_default` collection.
    pub fn new() -> Self {
        let mock = Self {
            epoch: Instant::now(),
            state: Mutex::new(State::default()),
        };
        mock.create_bucket(DEFAULT_BUCKET);
        mock
    }

    pub fn version(&self) -> &'static str {
        Self::VERSION
    }

    /// Current time on the logical clock, including any time travel.
    pub fn logical_now(&self) -> Duration {
        let offset = self.state.lock().clock_offset;
        self.epoch.elapsed() + offset
    }

    pub fn create_bucket(&self, bucket: &str) {
        let mut state = self.state.lock();
        let entry = state.buckets.entry(bucket.to_string()).or_default();
        entry
            .collections
            .entry(DEFAULT_COLLECTION.to_string())
            .or_insert_with(|| CollectionState::visible_after(Duration::ZERO));
    }

    /// Create a collection that reports "collection not found" until
    /// `propagation` has elapsed.
    pub fn create_collection(
        &self,
        bucket: &str,
        collection: &str,
        propagation: Duration,
    ) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        let entry = state
            .buckets
            .get_mut(bucket)
            .ok_or_else(|| StoreError::BucketNotFound {
                bucket: bucket.to_string(),
            })?;
        if entry.collections.contains_key(collection) {
            return Err(StoreError::CollectionExists {
                bucket: bucket.to_string(),
                collection: collection.to_string(),
            });
        }
        debug!(bucket, collection, ?propagation, "creating mock collection");
        entry.collections.insert(
            collection.to_string(),
            CollectionState::visible_after(propagation),
        );
        Ok(())
    }

    pub fn get(&self, bucket: &str, collection: &str, key: &str) -> Result<Value, StoreError> {
        let now = self.logical_now();
        let mut state = self.state.lock();
        let coll = visible_collection(&mut state, bucket, collection)?;
        let expired = coll
            .docs
            .get(key)
            .and_then(|doc| doc.expires_at)
            .is_some_and(|at| at <= now);
        if expired {
            coll.docs.remove(key);
        }
        coll.docs
            .get(key)
            .map(|doc| doc.value.clone())
            .ok_or_else(|| StoreError::DocumentNotFound {
                key: key.to_string(),
            })
    }

    pub fn upsert(
        &self,
        bucket: &str,
        collection: &str,
        key: &str,
        value: Value,
        expiry: Option<Duration>,
    ) -> Result<(), StoreError> {
        let now = self.logical_now();
        let mut state = self.state.lock();
        let coll = visible_collection(&mut state, bucket, collection)?;
        coll.docs.insert(
            key.to_string(),
            Document {
                value,
                expires_at: expiry.map(|ttl| now + ttl),
            },
        );
        Ok(())
    }

    /// Execute a control instruction.
    pub fn execute(&self, command: &MockCommand) -> Result<MockResponse, ControlError> {
        let response = match command.command {
            CommandCode::TimeTravel => {
                let offset = command.offset()?;
                let mut state = self.state.lock();
                state.clock_offset += Duration::from_secs(offset);
                info!(offset_secs = offset, "mock clock advanced");
                MockResponse::ok()
            }
            CommandCode::MockInfo => MockResponse::Ok {
                payload: json!({ "version": Self::VERSION }),
            },
        };
        self.state.lock().command_log.push(command.clone());
        Ok(response)
    }

    /// Wire-level entry point: one JSON command in, one JSON response out.
    pub fn handle_raw(&self, line: &str) -> String {
        let response = serde_json::from_str::<MockCommand>(line)
            .map_err(ControlError::from)
            .and_then(|command| self.execute(&command))
            .unwrap_or_else(|err| MockResponse::Fail {
                error: err.to_string(),
            });
        serde_json::to_string(&response)
            .unwrap_or_else(|_| r#"{"status":"fail","error":"encode"}"#.to_string())
    }

    /// Every control instruction executed so far, oldest first.
    pub fn command_log(&self) -> Vec<MockCommand> {
        self.state.lock().command_log.clone()
    }
}

fn visible_collection<'a>(
    state: &'a mut State,
    bucket: &str,
    collection: &str,
) -> Result<&'a mut CollectionState, StoreError> {
    let entry = state
        .buckets
        .get_mut(bucket)
        .ok_or_else(|| StoreError::BucketNotFound {
            bucket: bucket.to_string(),
        })?;
    match entry.collections.get_mut(collection) {
        Some(coll) if coll.visible_at <= Instant::now() => Ok(coll),
        _ => Err(StoreError::CollectionNotFound {
            bucket: bucket.to_string(),
            collection: collection.to_string(),
        }),
    }
}
