use std::time::Duration;

use tokio::time::{Instant, sleep};
use tracing::{debug, warn};

use crate::client::{Bucket, ClientError, Collection};
use crate::error::TestClusterError;

pub const COLLECTION_WAIT_DEADLINE: Duration = Duration::from_secs(1);
pub const COLLECTION_POLL_INTERVAL: Duration = Duration::from_millis(100);
const VISIBILITY_KEY: &str = "test";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOutcome {
    pub attempts: u32,
    pub elapsed: Duration,
}

/// Poll a freshly created collection until reads stop reporting
/// "collection not found". A missing `test` document counts as visible.
pub async fn wait_for_collection<B: Bucket>(
    bucket: &B,
    name: &str,
) -> Result<WaitOutcome, TestClusterError> {
    wait_for_collection_within(bucket, name, COLLECTION_WAIT_DEADLINE).await
}

pub async fn wait_for_collection_within<B: Bucket>(
    bucket: &B,
    name: &str,
    deadline: Duration,
) -> Result<WaitOutcome, TestClusterError> {
    let start = Instant::now();
    let expires_at = start + deadline;
    let collection = bucket.collection(name);
    let mut attempts = 0u32;

    loop {
        if Instant::now() >= expires_at {
            warn!(
                bucket = bucket.name(),
                collection = name,
                attempts,
                "collection did not become visible in time"
            );
            return Err(TestClusterError::CollectionWaitExpired {
                collection: name.to_string(),
                attempts,
            });
        }

        attempts += 1;
        match collection.get(VISIBILITY_KEY).await {
            Err(ClientError::CollectionNotFound { .. }) => {
                debug!(collection = name, attempts, "collection not visible yet");
                sleep(COLLECTION_POLL_INTERVAL).await;
            }
            Ok(_) | Err(ClientError::DocumentNotFound { .. }) => {
                let elapsed = start.elapsed();
                debug!(collection = name, attempts, ?elapsed, "collection visible");
                return Ok(WaitOutcome { attempts, elapsed });
            }
            Err(err) => return Err(err.into()),
        }
    }
}
