//! Operator commands
//!
//! `keybroker accounts|requests|approve|reject|approval-mode` - act on the
//! state file from a terminal

use anyhow::Result;
use keybroker_core::{Account, PendingRequest, RequestMethod};
use serde_json::Value;

use crate::server::build_keyring_for_cli;

/// List accounts
pub async fn accounts() -> Result<()> {
    let (keyring, _lock) = build_keyring_for_cli()?;
    let accounts = keyring.list_accounts().await?;

    println!("\n🔑 Accounts\n");
    if accounts.is_empty() {
        println!("  No accounts found.");
        println!();
        return Ok(());
    }
    for account in &accounts {
        println!("  {}", account_line(account));
    }
    println!();
    Ok(())
}

/// List pending requests
pub async fn list() -> Result<()> {
    let (keyring, _lock) = build_keyring_for_cli()?;
    let requests = keyring.list_requests().await?;

    println!("\n📝 Pending requests\n");
    if requests.is_empty() {
        println!("  No pending requests.");
        println!();
        return Ok(());
    }
    for request in &requests {
        println!("  {}", request_line(request));
    }
    println!();
    println!("  Approve:  keybroker approve <id> --data '{{\"data\":\"0x...\"}}'");
    println!("  Reject:   keybroker reject <id>");
    println!();
    Ok(())
}

/// Approve a pending request
pub async fn approve(id: &str, data: Value) -> Result<()> {
    let (keyring, _lock) = build_keyring_for_cli()?;
    let result = keyring.approve_request(id, data).await?;
    println!("✅ Approved {}: {}", id, result);
    Ok(())
}

/// Reject a pending request
pub async fn reject(id: &str) -> Result<()> {
    let (keyring, _lock) = build_keyring_for_cli()?;
    keyring.reject_request(id).await?;
    println!("❌ Rejected {}", id);
    Ok(())
}

/// Show or set the approval mode
pub async fn approval_mode(enabled: Option<bool>) -> Result<()> {
    let (keyring, _lock) = build_keyring_for_cli()?;
    let mode = match enabled {
        Some(enabled) => keyring.set_approval_mode(enabled).await?,
        None => keyring.approval_mode().await?,
    };
    println!("Approval mode: {}", if mode { "on" } else { "off" });
    Ok(())
}

fn account_line(account: &Account) -> String {
    format!(
        "{} {:44} {} methods",
        account.id,
        account.address,
        account.methods.len()
    )
}

fn request_line(request: &PendingRequest) -> String {
    let marker = if request.method.parse::<RequestMethod>().is_ok() {
        ""
    } else {
        " (unsupported)"
    };
    format!("{:20} {}{}", request.id, request.method, marker)
}
