//! Keybroker - account and signing-request broker
//!
//! CLI entry point.

#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod rpc;
mod server;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    // stdout carries bridge frames, so logs go to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "keybroker=info,keybroker_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = cli::Cli::parse();
    cli::run(cli).await
}
