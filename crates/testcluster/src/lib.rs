//! Deployment-aware helpers for the integration suite: decide which
//! feature-gated tests may run, move time forward for expiry tests, and
//! wait for freshly created collections to become readable.

pub mod client;
pub mod cluster;
pub mod config;
pub mod error;
pub mod features;
pub mod fixtures;
pub mod flags;
pub mod mock;
pub mod resolver;
pub mod time_travel;
pub mod version;
pub mod wait;

pub use client::{Bucket, ClientError, ClusterClient, Collection};
pub use cluster::TestCluster;
pub use config::TestConfig;
pub use error::TestClusterError;
pub use features::{FeatureCode, UnknownFeature};
pub use flags::{FeatureFlag, FeatureFlags, FlagParseError, FlagState};
pub use mock::{MockBucket, MockClient, MockCollection};
pub use resolver::{FeatureDecision, FeatureResolver};
pub use time_travel::{MockControl, TimeController};
pub use version::{NodeVersion, VersionParseError};
pub use wait::{WaitOutcome, wait_for_collection};

/// Install the fmt subscriber unless the configuration asks for silence.
pub fn init_tracing(config: &TestConfig) {
    if config.disable_logger {
        return;
    }
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
