use thiserror::Error;

use crate::client::ClientError;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum TestClusterError {
    /// Fixture or dataset preparation failed; never retried.
    #[error("{message}: {source}")]
    Setup {
        message: String,
        #[source]
        source: BoxError,
    },
    #[error("wait time for collection {collection} to become available expired after {attempts} attempts")]
    CollectionWaitExpired { collection: String, attempts: u32 },
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("mock control instruction failed: {0}")]
    Control(#[from] mock_cluster::ControlError),
}

impl TestClusterError {
    pub fn setup(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        TestClusterError::Setup {
            message: message.into(),
            source: source.into(),
        }
    }
}
