use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mock_cluster::{ControlError, MockCommand};
use tokio::time::sleep;
use tracing::info;

/// Control channel to a mock deployment.
#[async_trait]
pub trait MockControl: Send + Sync {
    async fn control(&self, command: MockCommand) -> Result<(), ControlError>;
}

/// Moves time forward for expiry tests: logically on the mock, by sleeping
/// against a real cluster.
#[derive(Clone, Default)]
pub struct TimeController {
    mock: Option<Arc<dyn MockControl>>,
}

impl TimeController {
    pub fn real() -> Self {
        Self { mock: None }
    }

    pub fn mocked(mock: Arc<dyn MockControl>) -> Self {
        Self { mock: Some(mock) }
    }

    pub fn is_mock(&self) -> bool {
        self.mock.is_some()
    }

    pub async fn advance(&self, wait: Duration) -> Result<(), ControlError> {
        match &self.mock {
            Some(mock) => {
                let offset = ceil_secs(wait);
                info!(offset_secs = offset, "time travelling mock clock");
                mock.control(MockCommand::time_travel(offset)).await
            }
            None => {
                info!(?wait, "sleeping against real cluster");
                sleep(wait).await;
                Ok(())
            }
        }
    }
}

impl std::fmt::Debug for TimeController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimeController")
            .field("mock", &self.is_mock())
            .finish()
    }
}

/// Whole seconds, rounding any fraction up.
pub fn ceil_secs(wait: Duration) -> u64 {
    let secs = wait.as_secs();
    if wait.subsec_nanos() > 0 {
        secs.saturating_add(1)
    } else {
        secs
    }
}
