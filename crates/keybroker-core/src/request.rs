//! Pending signing requests and the method table that shapes their results

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// A signing or transaction operation awaiting resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingRequest {
    /// Caller-supplied identifier
    pub id: String,
    /// Operation name
    pub method: String,
    /// Operation arguments
    #[serde(default)]
    pub params: Value,
}

impl PendingRequest {
    /// Create a request
    #[must_use]
    pub fn new(id: impl Into<String>, method: impl Into<String>, params: Value) -> Self {
        Self {
            id: id.into(),
            method: method.into(),
            params,
        }
    }
}

/// How an approval payload turns into a result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    /// `{ "data": "<string>" }`, the string is the result
    Signature,
    /// Any JSON object, passed through as the result
    Structured,
}

/// Every method the approval dispatch knows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestMethod {
    /// `personal_sign`
    PersonalSign,
    /// `eth_sign`
    EthSign,
    /// `eth_signTypedData`
    SignTypedData,
    /// `eth_signTypedData_v1`
    SignTypedDataV1,
    /// `eth_signTypedData_v3`
    SignTypedDataV3,
    /// `eth_signTypedData_v4`
    SignTypedDataV4,
    /// `eth_signUserOperation`
    SignUserOperation,
    /// `eth_signTransaction`
    SignTransaction,
    /// `eth_prepareUserOperation`
    PrepareUserOperation,
    /// `eth_patchUserOperation`
    PatchUserOperation,
}

impl RequestMethod {
    /// All known methods
    pub const ALL: [RequestMethod; 10] = [
        Self::PersonalSign,
        Self::EthSign,
        Self::SignTypedData,
        Self::SignTypedDataV1,
        Self::SignTypedDataV3,
        Self::SignTypedDataV4,
        Self::SignUserOperation,
        Self::SignTransaction,
        Self::PrepareUserOperation,
        Self::PatchUserOperation,
    ];

    /// Wire name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PersonalSign => "personal_sign",
            Self::EthSign => "eth_sign",
            Self::SignTypedData => "eth_signTypedData",
            Self::SignTypedDataV1 => "eth_signTypedData_v1",
            Self::SignTypedDataV3 => "eth_signTypedData_v3",
            Self::SignTypedDataV4 => "eth_signTypedData_v4",
            Self::SignUserOperation => "eth_signUserOperation",
            Self::SignTransaction => "eth_signTransaction",
            Self::PrepareUserOperation => "eth_prepareUserOperation",
            Self::PatchUserOperation => "eth_patchUserOperation",
        }
    }

    /// Expected approval payload shape
    #[must_use]
    pub fn payload_shape(self) -> PayloadShape {
        match self {
            Self::PersonalSign
            | Self::EthSign
            | Self::SignTypedData
            | Self::SignTypedDataV1
            | Self::SignTypedDataV3
            | Self::SignTypedDataV4
            | Self::SignUserOperation => PayloadShape::Signature,
            Self::SignTransaction | Self::PrepareUserOperation | Self::PatchUserOperation => {
                PayloadShape::Structured
            }
        }
    }
}

impl fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| Error::UnsupportedMethod(s.to_string()))
    }
}
