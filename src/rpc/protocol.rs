//! Bridge wire protocol.
//!
//! One frame per line. Hosts send `request` frames and receive `response`
//! frames, plus unsolicited `event` frames for keyring lifecycle events.

use keybroker_core::{Error, KeyringEvent};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Wire frame - every line on stdin/stdout is one of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "frame", rename_all = "snake_case")]
pub enum RpcFrame {
    /// Host → broker: operation call
    Request {
        /// Caller-chosen id echoed in the response
        id: String,
        /// Caller origin, checked against the permission table
        origin: String,
        /// Operation wire name (e.g. "keyring_createAccount")
        method: String,
        /// Operation parameters
        #[serde(default)]
        params: Value,
    },
    /// Broker → host: result of a request
    Response {
        /// Matches the request id
        id: String,
        /// Successful result (mutually exclusive with error)
        #[serde(skip_serializing_if = "Option::is_none")]
        result: Option<Value>,
        /// Error (mutually exclusive with result)
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<RpcError>,
    },
    /// Broker → host: lifecycle event
    Event {
        /// Event kind
        event: String,
        /// Event payload
        data: Value,
    },
}

impl RpcFrame {
    /// Success response for a request id.
    pub fn ok(id: impl Into<String>, result: Value) -> Self {
        Self::Response {
            id: id.into(),
            result: Some(result),
            error: None,
        }
    }

    /// Error response for a request id.
    pub fn err(id: impl Into<String>, error: RpcError) -> Self {
        Self::Response {
            id: id.into(),
            result: None,
            error: Some(error),
        }
    }

    /// Event frame.
    pub fn event(name: impl Into<String>, data: Value) -> Self {
        Self::Event {
            event: name.into(),
            data,
        }
    }
}

impl From<&KeyringEvent> for RpcFrame {
    fn from(event: &KeyringEvent) -> Self {
        Self::event(event.kind(), event.payload())
    }
}

/// Structured error in a response frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcError {
    /// Machine-readable error code
    pub code: RpcErrorCode,
    /// Human-readable message
    pub message: String,
}

impl RpcError {
    pub fn new(code: RpcErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<Error> for RpcError {
    fn from(e: Error) -> Self {
        let code = match &e {
            Error::NotFound { .. } => RpcErrorCode::NotFound,
            Error::DuplicateAddress(_) => RpcErrorCode::DuplicateAddress,
            Error::InvalidData(_) => RpcErrorCode::InvalidData,
            Error::UnsupportedMethod(_) => RpcErrorCode::UnsupportedMethod,
            Error::PermissionDenied { .. } => RpcErrorCode::PermissionDenied,
            Error::Storage(_) => RpcErrorCode::StorageError,
            Error::Notification(_) => RpcErrorCode::NotificationFailed,
            Error::InvalidParams(_) => RpcErrorCode::InvalidParams,
        };
        Self::new(code, e.to_string())
    }
}

/// Error codes on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RpcErrorCode {
    /// Origin lacks the grant
    PermissionDenied,
    /// Unknown account or request
    NotFound,
    /// Address already in use, or missing
    DuplicateAddress,
    /// Approval payload has the wrong shape
    InvalidData,
    /// Request method has no approval handling
    UnsupportedMethod,
    /// Durable storage failed
    StorageError,
    /// Host notification failed
    NotificationFailed,
    /// Frame or parameters could not be decoded
    InvalidParams,
    /// Method is not a keyring operation
    UnknownMethod,
}
