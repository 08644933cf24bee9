use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ControlError {
    #[error("failed to parse control command: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid payload for {command:?}: {reason}")]
    InvalidPayload {
        command: CommandCode,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandCode {
    TimeTravel,
    #[serde(rename = "MOCKINFO")]
    MockInfo,
}

/// A control instruction sent over the mock's control channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MockCommand {
    pub command: CommandCode,
    #[serde(default)]
    pub payload: Map<String, Value>,
}

impl MockCommand {
    pub fn new(command: CommandCode, payload: Map<String, Value>) -> Self {
        Self { command, payload }
    }

    /// Advance the mock's logical clock by `offset_secs` seconds.
    pub fn time_travel(offset_secs: u64) -> Self {
        let mut payload = Map::new();
        payload.insert("Offset".into(), json!(offset_secs));
        Self::new(CommandCode::TimeTravel, payload)
    }

    pub fn mock_info() -> Self {
        Self::new(CommandCode::MockInfo, Map::new())
    }

    pub fn offset(&self) -> Result<u64, ControlError> {
        self.payload
            .get("Offset")
            .and_then(Value::as_u64)
            .ok_or_else(|| ControlError::InvalidPayload {
                command: self.command,
                reason: "missing non-negative integer field `Offset`".into(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum MockResponse {
    Ok {
        #[serde(default, skip_serializing_if = "Value::is_null")]
        payload: Value,
    },
    Fail {
        error: String,
    },
}

impl MockResponse {
    pub fn ok() -> Self {
        Self::Ok {
            payload: Value::Null,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, MockResponse::Ok { .. })
    }
}
