//! JSON message protocol between the host bridge and the dispatcher.
//!
//! Inbound messages are objects with a `cmd` field. Every reply carries a
//! `status` of `ok` or `error`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use scenepack_bundler::{BuildRequest, BuildResult, BuildStatus, Framework, StatsSnapshot};

use crate::error::ProtocolError;

/// Commands understood by the dispatcher.
pub const CAPABILITIES: [&str; 4] = ["build", "clear-cache", "stats", "ping"];

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "cmd", rename_all = "kebab-case")]
pub enum Command {
    Build(BuildRequest),
    ClearCache,
    Stats,
    Ping,
}

impl Command {
    /// Parse a raw message payload.
    pub fn parse(payload: &str) -> Result<Self, ProtocolError> {
        let value: Value = serde_json::from_str(payload)
            .map_err(|err| ProtocolError::Malformed(format!("invalid JSON: {}", err)))?;
        Self::from_value(value)
    }

    /// Decode an already-parsed message, telling unknown commands apart from
    /// badly shaped ones.
    pub fn from_value(value: Value) -> Result<Self, ProtocolError> {
        let cmd = match value.get("cmd") {
            Some(Value::String(cmd)) => cmd.clone(),
            Some(_) => return Err(ProtocolError::Malformed("`cmd` must be a string".into())),
            None if value.is_object() => {
                return Err(ProtocolError::Malformed("missing `cmd` field".into()));
            }
            None => return Err(ProtocolError::Malformed("expected a JSON object".into())),
        };

        if !CAPABILITIES.contains(&cmd.as_str()) {
            return Err(ProtocolError::UnknownCommand(cmd));
        }

        serde_json::from_value(value)
            .map_err(|err| ProtocolError::Malformed(format!("invalid `{}` command: {}", cmd, err)))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Build(_) => "build",
            Command::ClearCache => "clear-cache",
            Command::Stats => "stats",
            Command::Ping => "ping",
        }
    }
}

/// Acknowledgement with a human-readable message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageReply {
    pub status: BuildStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleared: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsReply {
    pub status: BuildStatus,
    pub stats: StatsSnapshot,
}

/// Unsolicited announcement sent once the service is up.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadyAnnouncement {
    pub status: BuildStatus,
    pub event: &'static str,
    pub capabilities: Vec<&'static str>,
    pub frameworks: Vec<String>,
    pub version: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Reply {
    Build(Box<BuildResult>),
    Message(MessageReply),
    Stats(StatsReply),
    Ready(ReadyAnnouncement),
    Error(MessageReply),
}

impl Reply {
    pub fn pong(timestamp_ms: i64) -> Self {
        Reply::Message(MessageReply {
            status: BuildStatus::Ok,
            message: "pong".to_string(),
            timestamp: Some(timestamp_ms),
            cleared: None,
        })
    }

    pub fn cache_cleared(cleared: usize) -> Self {
        Reply::Message(MessageReply {
            status: BuildStatus::Ok,
            message: "Build cache cleared".to_string(),
            timestamp: None,
            cleared: Some(cleared),
        })
    }

    pub fn stats(stats: StatsSnapshot) -> Self {
        Reply::Stats(StatsReply {
            status: BuildStatus::Ok,
            stats,
        })
    }

    pub fn ready() -> Self {
        Reply::Ready(ReadyAnnouncement {
            status: BuildStatus::Ok,
            event: "ready",
            capabilities: CAPABILITIES.to_vec(),
            frameworks: Framework::known().iter().map(|f| f.to_string()).collect(),
            version: env!("CARGO_PKG_VERSION"),
        })
    }

    pub fn error(message: impl Into<String>) -> Self {
        Reply::Error(MessageReply {
            status: BuildStatus::Error,
            message: message.into(),
            timestamp: None,
            cleared: None,
        })
    }

    pub fn is_error(&self) -> bool {
        match self {
            Reply::Build(result) => !result.is_ok(),
            Reply::Error(_) => true,
            _ => false,
        }
    }

    /// Serialize to a single line of JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|err| {
            format!(
                "{{\"status\":\"error\",\"message\":\"failed to encode reply: {}\"}}",
                err.to_string().replace('"', "'")
            )
        })
    }
}

impl From<ProtocolError> for Reply {
    fn from(err: ProtocolError) -> Self {
        Reply::error(err.to_string())
    }
}
