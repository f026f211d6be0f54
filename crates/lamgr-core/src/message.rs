//! Message envelopes exchanged with a UI surface.
//!
//! Inbound messages are commands. Outbound messages are either responses,
//! which echo the `callbackId` of the command that triggered them, or
//! notifications, which carry no `callbackId` at all.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Caller-supplied token pairing a request with its response.
pub type CallbackId = i64;

/// Command and event name constants.
///
/// These match the front-end listeners. Keep strings stable to avoid
/// front-end breakage.
pub mod names {
    // Inbound commands (fire-and-forget)
    pub const LA_RESTART: &str = "la.restart";
    pub const LOG_SHOW: &str = "log.show";
    pub const LOG_START: &str = "log.start";

    // Inbound commands (request/response)
    pub const LA_STATUS: &str = "la.status";
    pub const LOG_GET: &str = "log.get";

    // Outbound notifications
    pub const SET_RUNNING: &str = "set.running";
    pub const LOG_ALL: &str = "log.all";
}

/// A message coming in from a UI surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageIn {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_id: Option<CallbackId>,
    pub name: String,
    #[serde(default)]
    pub payload: Value,
}

impl MessageIn {
    /// Create a command without a correlation identifier.
    pub fn command(name: impl Into<String>) -> Self {
        Self {
            callback_id: None,
            name: name.into(),
            payload: Value::Null,
        }
    }

    /// Create a command that expects a response.
    pub fn request(name: impl Into<String>, callback_id: CallbackId) -> Self {
        Self {
            callback_id: Some(callback_id),
            ..Self::command(name)
        }
    }
}

/// A message going out to a UI surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageOut {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_id: Option<CallbackId>,
    pub name: String,
    pub payload: Value,
}

impl MessageOut {
    /// Create an unsolicited notification.
    pub fn notification(name: impl Into<String>, payload: Value) -> Self {
        Self {
            callback_id: None,
            name: name.into(),
            payload,
        }
    }

    /// Create the response to `request`.
    ///
    /// Returns `None` when the request carried no correlation identifier:
    /// fire-and-forget commands never get a response.
    pub fn response_to(request: &MessageIn, payload: Value) -> Option<Self> {
        request.callback_id.map(|id| Self {
            callback_id: Some(id),
            name: request.name.clone(),
            payload,
        })
    }

    /// Whether this message is a response rather than a notification.
    pub const fn is_response(&self) -> bool {
        self.callback_id.is_some()
    }
}
