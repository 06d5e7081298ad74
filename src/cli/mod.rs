//! CLI module for keybroker
//!
//! `serve` runs the RPC bridge for a host process. The other commands act as
//! the approval surface from a terminal.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

pub mod requests;

/// Keybroker CLI
#[derive(Parser, Debug)]
#[command(name = "keybroker")]
#[command(about = "Account and signing-request broker")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the JSON-lines bridge on stdin/stdout
    Serve,
    /// List accounts
    Accounts,
    /// List pending requests
    Requests,
    /// Approve a pending request
    Approve {
        /// Request id
        id: String,
        /// Approval payload as JSON, e.g. '{"data":"0x..."}'
        #[arg(long)]
        data: String,
    },
    /// Reject a pending request
    Reject {
        /// Request id
        id: String,
    },
    /// Show or change the approval mode
    ApprovalMode {
        /// New mode
        #[arg(value_enum)]
        mode: Option<Toggle>,
    },
}

/// On/off switch
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

/// Run the CLI command
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Serve) => crate::server::run().await,
        Some(Commands::Accounts) => requests::accounts().await,
        Some(Commands::Requests) => requests::list().await,
        Some(Commands::Approve { id, data }) => {
            let data = serde_json::from_str(&data).context("--data is not valid JSON")?;
            requests::approve(&id, data).await
        }
        Some(Commands::Reject { id }) => requests::reject(&id).await,
        Some(Commands::ApprovalMode { mode }) => {
            requests::approval_mode(mode.map(|m| m == Toggle::On)).await
        }
        None => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            cmd.print_help()?;
            println!();
            Ok(())
        }
    }
}
