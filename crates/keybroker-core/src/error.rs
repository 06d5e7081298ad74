//! Error types for keybroker-core
//!
//! Every failure an operation can report, plus the stable machine codes the
//! RPC bridge puts on the wire.

use thiserror::Error;

/// Core error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Unknown account or request id
    #[error("{kind} '{id}' not found")]
    NotFound {
        /// What was looked up ("account" or "request")
        kind: &'static str,
        /// The id that was not found
        id: String,
    },

    /// Address already used by another wallet, or missing
    #[error("duplicate address: {0}")]
    DuplicateAddress(String),

    /// Approval payload does not match the method's expected shape
    #[error("invalid approval data: {0}")]
    InvalidData(String),

    /// Method absent from the approval dispatch table
    #[error("unsupported method: {0}")]
    UnsupportedMethod(String),

    /// Origin lacks the grant for the operation
    #[error("origin '{origin}' is not allowed to call '{method}'")]
    PermissionDenied {
        /// Calling origin
        origin: String,
        /// Requested operation
        method: String,
    },

    /// Durable storage failed
    #[error("storage error: {0}")]
    Storage(String),

    /// The lifecycle notification could not be delivered
    #[error("notification failed: {0}")]
    Notification(String),

    /// Operation parameters could not be decoded
    #[error("invalid params: {0}")]
    InvalidParams(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Shorthand for a missing account
    pub fn account_not_found(id: impl ToString) -> Self {
        Self::NotFound {
            kind: "account",
            id: id.to_string(),
        }
    }

    /// Shorthand for a missing request
    pub fn request_not_found(id: impl ToString) -> Self {
        Self::NotFound {
            kind: "request",
            id: id.to_string(),
        }
    }

    /// Stable machine-readable code
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::DuplicateAddress(_) => "DUPLICATE_ADDRESS",
            Self::InvalidData(_) => "INVALID_DATA",
            Self::UnsupportedMethod(_) => "UNSUPPORTED_METHOD",
            Self::PermissionDenied { .. } => "PERMISSION_DENIED",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Notification(_) => "NOTIFICATION_FAILED",
            Self::InvalidParams(_) => "INVALID_PARAMS",
        }
    }

    /// Whether the error was raised before any state was touched
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. }
                | Self::DuplicateAddress(_)
                | Self::InvalidData(_)
                | Self::UnsupportedMethod(_)
                | Self::PermissionDenied { .. }
                | Self::InvalidParams(_)
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Storage(format!("serialization failed: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let error = Error::account_not_found("abc");
        assert_eq!(error.to_string(), "account 'abc' not found");
        assert_eq!(error.code(), "NOT_FOUND");

        let error = Error::request_not_found("r1");
        assert!(error.to_string().starts_with("request"));
    }

    #[test]
    fn test_codes_are_distinct() {
        let errors = [
            Error::account_not_found("a"),
            Error::DuplicateAddress("0x1".to_string()),
            Error::InvalidData("x".to_string()),
            Error::UnsupportedMethod("m".to_string()),
            Error::PermissionDenied {
                origin: "o".to_string(),
                method: "m".to_string(),
            },
            Error::Storage("disk".to_string()),
            Error::Notification("host".to_string()),
            Error::InvalidParams("p".to_string()),
        ];
        let codes: std::collections::HashSet<_> = errors.iter().map(Error::code).collect();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_validation_classification() {
        assert!(Error::InvalidData("x".to_string()).is_validation());
        assert!(!Error::Storage("disk".to_string()).is_validation());
        assert!(!Error::Notification("host".to_string()).is_validation());
    }
}
