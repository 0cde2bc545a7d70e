//! Messages exchanged with the popup and the background worker.
//!
//! Every message is a JSON object tagged by its `type` field.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::warn;

use crate::config::SelectionConfig;

pub const START_SELECTION: &str = "START_SELECTION";
pub const CANCEL_SELECTION: &str = "CANCEL_SELECTION";
pub const CAPTURE_VISIBLE_TAB: &str = "CAPTURE_VISIBLE_TAB";

/// Commands the content side accepts from the popup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    StartSelection(SelectionConfig),
    CancelSelection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MessageError {
    #[error("Missing message type")]
    MissingType,

    #[error("Unknown message type")]
    UnknownType,
}

/// Read a command out of a raw message.
///
/// Start options that fail to deserialize fall back to their defaults rather than
/// rejecting the command.
pub fn parse_command(message: &Value) -> Result<Command, MessageError> {
    let kind = match message.get("type").and_then(Value::as_str) {
        Some(kind) if !kind.is_empty() => kind,
        _ => return Err(MessageError::MissingType),
    };
    match kind {
        START_SELECTION => {
            let config = serde_json::from_value(message.clone()).unwrap_or_else(|err| {
                warn!(error = %err, "malformed start options, using defaults");
                SelectionConfig::default()
            });
            Ok(Command::StartSelection(config))
        }
        CANCEL_SELECTION => Ok(Command::CancelSelection),
        _ => Err(MessageError::UnknownType),
    }
}

/// Reply to a command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Ack {
    pub fn ok() -> Self {
        Self { ok: true, error: None }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(message.into()),
        }
    }
}

impl From<MessageError> for Ack {
    fn from(err: MessageError) -> Self {
        Ack::error(err.to_string())
    }
}

/// The message asking the background worker for a screenshot
pub fn capture_request() -> Value {
    json!({ "type": CAPTURE_VISIBLE_TAB })
}

/// Reply to [`capture_request`]
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CaptureResponse {
    pub fn success(data_url: impl Into<String>) -> Self {
        Self {
            ok: true,
            data_url: Some(data_url.into()),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            data_url: None,
            error: Some(error.into()),
        }
    }

    /// The data URL, or the reported error
    pub fn into_result(self) -> Result<String, String> {
        match (self.ok, self.data_url) {
            (true, Some(data_url)) => Ok(data_url),
            (true, None) => Err("capture returned no image".to_string()),
            (false, _) => Err(self.error.unwrap_or_else(|| "unknown error".to_string())),
        }
    }
}
