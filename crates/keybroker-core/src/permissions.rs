//! Permissions - origin to operation grants
//!
//! Every call arrives tagged with the origin of the calling application. An
//! origin may only invoke the operations it was granted; everything else is
//! refused before the keyring is touched. Unknown origins have no grants.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Facade operations, by wire name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `keyring_listAccounts`
    ListAccounts,
    /// `keyring_getAccount`
    GetAccount,
    /// `keyring_createAccount`
    CreateAccount,
    /// `keyring_updateAccount`
    UpdateAccount,
    /// `keyring_deleteAccount`
    DeleteAccount,
    /// `keyring_filterAccountChains`
    FilterAccountChains,
    /// `keyring_listRequests`
    ListRequests,
    /// `keyring_getRequest`
    GetRequest,
    /// `keyring_submitRequest`
    SubmitRequest,
    /// `keyring_approveRequest`
    ApproveRequest,
    /// `keyring_rejectRequest`
    RejectRequest,
    /// `keyring_getApprovalMode`
    GetApprovalMode,
    /// `keyring_setApprovalMode`
    SetApprovalMode,
}

impl Operation {
    /// All operations
    pub const ALL: [Operation; 13] = [
        Self::ListAccounts,
        Self::GetAccount,
        Self::CreateAccount,
        Self::UpdateAccount,
        Self::DeleteAccount,
        Self::FilterAccountChains,
        Self::ListRequests,
        Self::GetRequest,
        Self::SubmitRequest,
        Self::ApproveRequest,
        Self::RejectRequest,
        Self::GetApprovalMode,
        Self::SetApprovalMode,
    ];

    /// Wire name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ListAccounts => "keyring_listAccounts",
            Self::GetAccount => "keyring_getAccount",
            Self::CreateAccount => "keyring_createAccount",
            Self::UpdateAccount => "keyring_updateAccount",
            Self::DeleteAccount => "keyring_deleteAccount",
            Self::FilterAccountChains => "keyring_filterAccountChains",
            Self::ListRequests => "keyring_listRequests",
            Self::GetRequest => "keyring_getRequest",
            Self::SubmitRequest => "keyring_submitRequest",
            Self::ApproveRequest => "keyring_approveRequest",
            Self::RejectRequest => "keyring_rejectRequest",
            Self::GetApprovalMode => "keyring_getApprovalMode",
            Self::SetApprovalMode => "keyring_setApprovalMode",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| Error::InvalidParams(format!("unknown operation '{}'", s)))
    }
}

/// One configured grant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginGrant {
    /// Calling origin
    pub origin: String,
    /// Operation wire names the origin may call
    #[serde(default)]
    pub methods: Vec<String>,
}

/// Permission table configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionConfig {
    /// Grants per origin
    #[serde(default)]
    pub origins: Vec<OriginGrant>,
}

/// Resolved origin → operations table
#[derive(Debug, Clone, Default)]
pub struct OriginPermissions {
    grants: HashMap<String, Vec<Operation>>,
}

impl OriginPermissions {
    /// Empty table, every call is denied
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the table from configuration.
    ///
    /// Fails on method names that are not keyring operations. Repeated
    /// origins accumulate their grants.
    pub fn from_config(config: &PermissionConfig) -> Result<Self> {
        let mut table = Self::new();
        for grant in &config.origins {
            let operations = grant
                .methods
                .iter()
                .map(|m| m.parse::<Operation>())
                .collect::<Result<Vec<_>>>()?;
            table.grant(grant.origin.clone(), operations);
        }
        Ok(table)
    }

    /// Add operations to an origin, keeping first-seen order
    pub fn grant(&mut self, origin: impl Into<String>, operations: impl IntoIterator<Item = Operation>) {
        let entry = self.grants.entry(origin.into()).or_default();
        for op in operations {
            if !entry.contains(&op) {
                entry.push(op);
            }
        }
    }

    /// Operations granted to an origin, in grant order
    #[must_use]
    pub fn allowed(&self, origin: &str) -> &[Operation] {
        self.grants.get(origin).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether `origin` may call `operation`
    #[must_use]
    pub fn is_allowed(&self, origin: &str, operation: Operation) -> bool {
        self.allowed(origin).contains(&operation)
    }

    /// Fail with `PermissionDenied` unless the grant exists
    pub fn check(&self, origin: &str, operation: Operation) -> Result<()> {
        if self.is_allowed(origin, operation) {
            Ok(())
        } else {
            Err(Error::PermissionDenied {
                origin: origin.to_string(),
                method: operation.as_str().to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PermissionConfig {
        PermissionConfig {
            origins: vec![
                OriginGrant {
                    origin: "https://dapp.example".to_string(),
                    methods: vec![
                        "keyring_listAccounts".to_string(),
                        "keyring_submitRequest".to_string(),
                    ],
                },
                OriginGrant {
                    origin: "https://companion.example".to_string(),
                    methods: Operation::ALL.iter().map(|op| op.to_string()).collect(),
                },
            ],
        }
    }

    #[test]
    fn test_operation_names_round_trip() {
        for op in Operation::ALL {
            assert_eq!(op.as_str().parse::<Operation>().unwrap(), op);
        }
        assert!("keyring_signMessage".parse::<Operation>().is_err());
    }

    #[test]
    fn test_check_grants() {
        let table = OriginPermissions::from_config(&config()).unwrap();

        assert!(table
            .check("https://dapp.example", Operation::SubmitRequest)
            .is_ok());
        let err = table
            .check("https://dapp.example", Operation::ApproveRequest)
            .unwrap_err();
        assert_eq!(
            err,
            Error::PermissionDenied {
                origin: "https://dapp.example".to_string(),
                method: "keyring_approveRequest".to_string(),
            }
        );
        assert!(table
            .check("https://companion.example", Operation::ApproveRequest)
            .is_ok());
    }

    #[test]
    fn test_unknown_origin_denied() {
        let table = OriginPermissions::from_config(&config()).unwrap();
        assert!(table.allowed("https://evil.example").is_empty());
        assert!(table
            .check("https://evil.example", Operation::ListAccounts)
            .is_err());
    }

    #[test]
    fn test_grant_order_and_dedup() {
        let mut table = OriginPermissions::new();
        table.grant("o", [Operation::GetRequest, Operation::ListRequests]);
        table.grant("o", [Operation::GetRequest, Operation::RejectRequest]);
        assert_eq!(
            table.allowed("o"),
            &[
                Operation::GetRequest,
                Operation::ListRequests,
                Operation::RejectRequest
            ]
        );
    }

    #[test]
    fn test_invalid_method_in_config() {
        let config = PermissionConfig {
            origins: vec![OriginGrant {
                origin: "o".to_string(),
                methods: vec!["keyring_doEverything".to_string()],
            }],
        };
        assert!(matches!(
            OriginPermissions::from_config(&config),
            Err(Error::InvalidParams(_))
        ));
    }
}
