/**
 * Realtime Wire Protocol
 *
 * Frame types exchanged over the show WebSocket. Everything on the wire is a
 * JSON text frame with a `type` tag: the client sends `authenticate` and
 * `request_<resource>` frames, the server answers with `authenticated`,
 * `<resource>_update` and broadcast update frames.
 */
use serde::{Deserialize, Serialize};

use crate::shared::error::SharedError;

/// Name of the HTTP-only cookie that carries the session token.
pub const SESSION_COOKIE: &str = "stagelink_session";

/// WebSocket close code for a deliberate close. The client must not
/// reconnect after seeing it.
pub const CLOSE_NORMAL: u16 = 1000;

/// Prefix that marks a client frame as a snapshot request
/// (`request_running_order`, `request_alert`, ...).
pub const SNAPSHOT_REQUEST_PREFIX: &str = "request_";

/// Server → client frame
///
/// One shape covers handshake results, snapshot replies and broadcast
/// updates: `type` names the event, `data` carries the full new value for
/// updates, `success`/`error` appear on handshake results, `timestamp` on
/// broadcasts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateMessage {
    /// Event tag, e.g. `authenticated`, `running_order_update`
    #[serde(rename = "type")]
    pub kind: String,
    /// Full value for update frames (snapshot push, never a delta)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    /// Handshake outcome
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    /// Human-readable rejection reason
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// RFC3339 event time, stamped on broadcasts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl UpdateMessage {
    /// Create an update frame carrying the full new value
    pub fn update(kind: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            kind: kind.into(),
            data: Some(data),
            success: None,
            error: None,
            timestamp: None,
        }
    }

    /// Create a successful handshake result
    pub fn authenticated() -> Self {
        Self {
            kind: "authenticated".to_string(),
            data: None,
            success: Some(true),
            error: None,
            timestamp: None,
        }
    }

    /// Create a failed handshake result
    pub fn authentication_failed(error: impl Into<String>) -> Self {
        Self {
            kind: "authenticated".to_string(),
            data: None,
            success: Some(false),
            error: Some(error.into()),
            timestamp: None,
        }
    }

    /// Create an error frame (e.g. frame received before authentication)
    pub fn error(error: impl Into<String>) -> Self {
        Self {
            kind: "error".to_string(),
            data: None,
            success: None,
            error: Some(error.into()),
            timestamp: None,
        }
    }

    /// Stamp the frame with an event time
    pub fn with_timestamp(mut self, timestamp: String) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Serialize to a wire string
    pub fn to_json(&self) -> Result<String, SharedError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a wire string
    pub fn from_json(text: &str) -> Result<Self, SharedError> {
        Ok(serde_json::from_str(text)?)
    }

    /// True for a successful `authenticated` handshake result
    pub fn is_auth_ok(&self) -> bool {
        self.kind == "authenticated" && self.success == Some(true)
    }
}

/// Client → server frame
///
/// The `type` tag is either `authenticate` (with a `token`) or a snapshot
/// request named `request_<resource>`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientFrame {
    /// Frame tag
    #[serde(rename = "type")]
    pub kind: String,
    /// Session token, present on `authenticate` frames
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Parsed intent of a [`ClientFrame`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCommand {
    /// Handshake with a session token
    Authenticate { token: String },
    /// Request the full current value of one resource
    Snapshot { resource: String },
    /// Unrecognized frame tag
    Unknown { kind: String },
}

impl ClientFrame {
    /// Create a handshake frame
    pub fn authenticate(token: impl Into<String>) -> Self {
        Self {
            kind: "authenticate".to_string(),
            token: Some(token.into()),
        }
    }

    /// Create a snapshot request for one resource
    pub fn snapshot(resource: &str) -> Self {
        Self {
            kind: format!("{}{}", SNAPSHOT_REQUEST_PREFIX, resource),
            token: None,
        }
    }

    /// Parse a wire string
    pub fn from_json(text: &str) -> Result<Self, SharedError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Serialize to a wire string
    pub fn to_json(&self) -> Result<String, SharedError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Interpret the frame tag
    pub fn command(self) -> ClientCommand {
        if self.kind == "authenticate" {
            // A missing token still routes to the handshake path; it will be
            // rejected there as malformed.
            return ClientCommand::Authenticate {
                token: self.token.unwrap_or_default(),
            };
        }
        match self.kind.strip_prefix(SNAPSHOT_REQUEST_PREFIX) {
            Some(resource) if !resource.is_empty() => ClientCommand::Snapshot {
                resource: resource.to_string(),
            },
            _ => ClientCommand::Unknown { kind: self.kind },
        }
    }
}
