//! Account records and their capability sets

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Capability set of an externally owned `eip155` account
pub const EOA_METHODS: [&str; 6] = [
    "personal_sign",
    "eth_sign",
    "eth_signTransaction",
    "eth_signTypedData_v1",
    "eth_signTypedData_v3",
    "eth_signTypedData_v4",
];

/// Account-kind tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AccountType {
    /// Externally owned account on an EVM chain
    #[default]
    #[serde(rename = "eip155:eoa")]
    Eoa,
}

impl AccountType {
    /// Operation names every account of this kind declares support for
    #[must_use]
    pub fn methods(self) -> Vec<String> {
        match self {
            Self::Eoa => EOA_METHODS.iter().map(|m| (*m).to_string()).collect(),
        }
    }

    /// CAIP-2 namespace the account kind belongs to
    #[must_use]
    pub fn namespace(self) -> &'static str {
        match self {
            Self::Eoa => "eip155",
        }
    }
}

/// An address record with an immutable identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Generated identifier, never changes
    pub id: Uuid,
    /// Chain address, never changes after creation
    pub address: String,
    /// Arbitrary caller metadata
    #[serde(default)]
    pub options: Map<String, Value>,
    /// Supported operation names, in declaration order
    pub methods: Vec<String>,
    /// Account kind
    #[serde(rename = "type")]
    pub account_type: AccountType,
}

impl Account {
    /// Create an account of the given kind with a fresh id
    #[must_use]
    pub fn new(address: impl Into<String>, account_type: AccountType, options: Map<String, Value>) -> Self {
        Self {
            id: Uuid::new_v4(),
            address: address.into(),
            options,
            methods: account_type.methods(),
            account_type,
        }
    }

    /// Merge a patch over this account.
    ///
    /// `id` and `address` are never taken from the patch.
    pub fn apply(&mut self, patch: AccountPatch) {
        if let Some(options) = patch.options {
            self.options = options;
        }
        if let Some(methods) = patch.methods {
            self.methods = dedup_ordered(methods);
        }
        if let Some(account_type) = patch.account_type {
            self.account_type = account_type;
        }
    }
}

/// Partial account accepted by `updateAccount`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountPatch {
    /// Account to update
    pub id: Uuid,
    /// Ignored on merge; the stored address always wins
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Replacement metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Map<String, Value>>,
    /// Replacement capability set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub methods: Option<Vec<String>>,
    /// Replacement kind
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub account_type: Option<AccountType>,
}

impl From<Account> for AccountPatch {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            address: Some(account.address),
            options: Some(account.options),
            methods: Some(account.methods),
            account_type: Some(account.account_type),
        }
    }
}

/// Options passed to `createAccount`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountOptions(pub Map<String, Value>);

impl AccountOptions {
    /// Options carrying only an address
    #[must_use]
    pub fn with_address(address: impl Into<String>) -> Self {
        let mut map = Map::new();
        map.insert("address".to_string(), Value::String(address.into()));
        Self(map)
    }

    /// Set the derivation path
    #[must_use]
    pub fn hd_path(mut self, path: impl Into<String>) -> Self {
        self.0.insert("hdPath".to_string(), Value::String(path.into()));
        self
    }

    /// Address with surrounding whitespace removed, if present and non-empty
    #[must_use]
    pub fn address(&self) -> Option<&str> {
        self.0
            .get("address")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|a| !a.is_empty())
    }

    /// Derivation path, empty when not supplied
    #[must_use]
    pub fn derivation_path(&self) -> String {
        self.0
            .get("hdPath")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }
}

fn dedup_ordered(methods: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    methods
        .into_iter()
        .filter(|m| seen.insert(m.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_account_has_eoa_capabilities() {
        let account = Account::new("0xAAA", AccountType::Eoa, Map::new());
        assert_eq!(account.methods, EOA_METHODS.map(String::from).to_vec());
        assert!(!account.methods.iter().any(|m| m == "eth_signUserOperation"));
    }

    #[test]
    fn test_account_wire_shape() {
        let account = Account::new("0xAAA", AccountType::Eoa, Map::new());
        let json = serde_json::to_value(&account).unwrap();
        assert_eq!(json["type"], "eip155:eoa");
        assert_eq!(json["address"], "0xAAA");
        assert!(json["methods"].is_array());
    }

    #[test]
    fn test_apply_keeps_identity() {
        let mut account = Account::new("0xAAA", AccountType::Eoa, Map::new());
        let id = account.id;

        let mut options = Map::new();
        options.insert("label".to_string(), Value::from("savings"));
        account.apply(AccountPatch {
            id: Uuid::new_v4(),
            address: Some("0xBBB".to_string()),
            options: Some(options),
            methods: Some(vec!["eth_sign".into(), "eth_sign".into(), "personal_sign".into()]),
            account_type: None,
        });

        assert_eq!(account.id, id);
        assert_eq!(account.address, "0xAAA");
        assert_eq!(account.options["label"], "savings");
        assert_eq!(account.methods, vec!["eth_sign", "personal_sign"]);
    }

    #[test]
    fn test_options_address() {
        assert_eq!(AccountOptions::with_address("0x1").address(), Some("0x1"));
        assert_eq!(AccountOptions::with_address("  ").address(), None);
        assert_eq!(AccountOptions::with_address(" 0x1\n").address(), Some("0x1"));
        assert_eq!(AccountOptions::default().address(), None);
        assert_eq!(AccountOptions::default().derivation_path(), "");
        assert_eq!(
            AccountOptions::with_address("0x1")
                .hd_path("m/44'/60'/0'/0/0")
                .derivation_path(),
            "m/44'/60'/0'/0/0"
        );
    }
}
