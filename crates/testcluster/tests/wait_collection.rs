use std::sync::Arc;
use std::time::Duration;

use mock_cluster::{DEFAULT_BUCKET, MockCluster};
use serde_json::json;
use testcluster::{
    Bucket, ClientError, ClusterClient, Collection, MockClient, TestClusterError, wait_for_collection,
};
use tokio::time::Instant;

fn setup() -> (Arc<MockCluster>, MockClient) {
    let mock = Arc::new(MockCluster::new());
    let client = MockClient::new(mock.clone());
    (mock, client)
}

#[tokio::test(start_paused = true)]
async fn already_visible_collection_succeeds_on_first_poll() {
    let (mock, client) = setup();
    mock.create_collection(DEFAULT_BUCKET, "ready", Duration::ZERO)
        .unwrap();

    let outcome = wait_for_collection(&client.bucket(DEFAULT_BUCKET), "ready")
        .await
        .unwrap();
    assert_eq!(outcome.attempts, 1);
    assert_eq!(outcome.elapsed, Duration::ZERO);
}

/// Polls land at 0, 100 and 200 ms; the third one sees the collection.
#[tokio::test(start_paused = true)]
async fn collection_propagating_within_200ms_takes_three_polls() {
    let (mock, client) = setup();
    mock.create_collection(DEFAULT_BUCKET, "fresh", Duration::from_millis(200))
        .unwrap();

    let outcome = wait_for_collection(&client.bucket(DEFAULT_BUCKET), "fresh")
        .await
        .unwrap();
    assert_eq!(outcome.attempts, 3);
    assert!(outcome.elapsed >= Duration::from_millis(200));
    assert!(outcome.elapsed < Duration::from_millis(300));
}

/// A collection appearing at exactly 300 ms needs the fourth poll.
#[tokio::test(start_paused = true)]
async fn collection_propagating_at_300ms_takes_four_polls() {
    let (mock, client) = setup();
    mock.create_collection(DEFAULT_BUCKET, "slow", Duration::from_millis(300))
        .unwrap();

    let outcome = wait_for_collection(&client.bucket(DEFAULT_BUCKET), "slow")
        .await
        .unwrap();
    assert_eq!(outcome.attempts, 4);
    assert_eq!(outcome.elapsed, Duration::from_millis(300));
}

#[tokio::test(start_paused = true)]
async fn existing_test_document_also_counts_as_visible() {
    let (mock, client) = setup();
    mock.create_collection(DEFAULT_BUCKET, "seeded", Duration::ZERO)
        .unwrap();
    let bucket = client.bucket(DEFAULT_BUCKET);
    bucket
        .collection("seeded")
        .upsert("test", json!({"seeded": true}))
        .await
        .unwrap();

    let outcome = wait_for_collection(&bucket, "seeded").await.unwrap();
    assert_eq!(outcome.attempts, 1);
}

#[tokio::test(start_paused = true)]
async fn never_visible_collection_times_out_after_one_second() {
    let (_mock, client) = setup();
    let start = Instant::now();

    let err = wait_for_collection(&client.bucket(DEFAULT_BUCKET), "ghost")
        .await
        .unwrap_err();
    let elapsed = start.elapsed();

    match err {
        TestClusterError::CollectionWaitExpired {
            collection,
            attempts,
        } => {
            assert_eq!(collection, "ghost");
            assert_eq!(attempts, 10);
        }
        other => panic!("expected timeout, got {other:?}"),
    }
    assert!(elapsed >= Duration::from_secs(1));
    assert!(elapsed <= Duration::from_millis(1100));
}

#[tokio::test(start_paused = true)]
async fn other_errors_propagate_immediately() {
    let (_mock, client) = setup();
    let start = Instant::now();

    let err = wait_for_collection(&client.bucket("no-such-bucket"), "anything")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        TestClusterError::Client(ClientError::BucketNotFound { .. })
    ));
    assert_eq!(start.elapsed(), Duration::ZERO);
}
