use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::account::Account;

/// Lifecycle events delivered to the host.
///
/// Serialized adjacently tagged: `{"type": "AccountCreated", "data": {..}}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum KeyringEvent {
    /// A new account was created
    AccountCreated {
        /// The new account
        account: Account,
        /// Suggested display name
        #[serde(rename = "accountNameSuggestion")]
        account_name_suggestion: String,
    },
    /// An account was updated
    AccountUpdated {
        /// The merged record
        account: Account,
    },
    /// An account was deleted
    AccountDeleted {
        /// Id of the deleted account
        id: Uuid,
    },
    /// A pending request was approved
    RequestApproved {
        /// Request id
        id: String,
        /// Shaped approval result
        result: Value,
    },
    /// A pending request was rejected
    RequestRejected {
        /// Request id
        id: String,
    },
}

impl KeyringEvent {
    /// Event kind name
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AccountCreated { .. } => "AccountCreated",
            Self::AccountUpdated { .. } => "AccountUpdated",
            Self::AccountDeleted { .. } => "AccountDeleted",
            Self::RequestApproved { .. } => "RequestApproved",
            Self::RequestRejected { .. } => "RequestRejected",
        }
    }

    /// Event payload without the kind tag
    #[must_use]
    pub fn payload(&self) -> Value {
        match serde_json::to_value(self) {
            Ok(Value::Object(mut map)) => map.remove("data").unwrap_or(Value::Null),
            _ => Value::Null,
        }
    }
}
