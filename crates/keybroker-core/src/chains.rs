//! CAIP-2 chain identifiers
//!
//! A chain id is `namespace:reference`. Accounts of the `eip155` family are
//! compatible with every chain in that namespace, so filtering only has to
//! recognise well-formed `eip155` ids.

use regex::Regex;
use std::sync::LazyLock;

use crate::account::AccountType;

static CAIP2: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<namespace>[-a-z0-9]{3,8}):(?P<reference>[-_a-zA-Z0-9]{1,32})$")
        .expect("valid CAIP-2 pattern")
});

static EIP155_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(0|[1-9][0-9]*)$").expect("valid eip155 reference pattern"));

/// Split a CAIP-2 id into namespace and reference
#[must_use]
pub fn parse_chain_id(chain: &str) -> Option<(&str, &str)> {
    let caps = CAIP2.captures(chain)?;
    Some((caps.name("namespace")?.as_str(), caps.name("reference")?.as_str()))
}

/// Whether `chain` is a valid chain id for the account kind's namespace
#[must_use]
pub fn is_supported_chain(account_type: AccountType, chain: &str) -> bool {
    match parse_chain_id(chain) {
        Some((namespace, reference)) if namespace == account_type.namespace() => match account_type
        {
            AccountType::Eoa => EIP155_REFERENCE.is_match(reference),
        },
        _ => false,
    }
}

/// Keep the chains the account kind can operate on, preserving order
#[must_use]
pub fn filter_chains(account_type: AccountType, chains: &[String]) -> Vec<String> {
    chains
        .iter()
        .filter(|c| is_supported_chain(account_type, c))
        .cloned()
        .collect()
}
