//! Behavioural stand-in for a document database cluster, used when the
//! integration suite runs without a live deployment.

pub mod capabilities;
pub mod control;
pub mod store;

pub use control::{CommandCode, ControlError, MockCommand, MockResponse};
pub use store::{DEFAULT_BUCKET, DEFAULT_COLLECTION, MockCluster, StoreError};
