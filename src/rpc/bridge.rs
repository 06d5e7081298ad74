//! RPC bridge - stdin/stdout JSON-lines ↔ keyring dispatch.
//!
//! Reads request frames line by line, answers each with a response frame and
//! forwards keyring events from the bus as event frames.

use keybroker_core::{EventBus, KeyringEvent, OriginPermissions, SharedKeyring};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{debug, info, warn};

use super::dispatch::{dispatch, DispatchContext};
use super::protocol::{RpcError, RpcErrorCode, RpcFrame};

/// Bridge state.
pub struct RpcBridge {
    keyring: SharedKeyring,
    permissions: Arc<OriginPermissions>,
    event_bus: Arc<EventBus>,
}

impl RpcBridge {
    pub fn new(
        keyring: SharedKeyring,
        permissions: Arc<OriginPermissions>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            keyring,
            permissions,
            event_bus,
        }
    }

    /// Run on the process's stdin and stdout until stdin closes.
    pub async fn run(&self) -> anyhow::Result<()> {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        let mut stdout = tokio::io::stdout();
        self.serve(stdin, &mut stdout).await
    }

    /// Run the frame loop over any line reader and writer.
    pub async fn serve<R, W>(&self, reader: R, writer: &mut W) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!("RPC bridge starting (stdin/stdout JSON-lines)");

        // Subscribe before announcing so no event is missed
        let mut event_rx = self.event_bus.subscribe();

        let ready = RpcFrame::event(
            "ready",
            serde_json::json!({ "version": env!("CARGO_PKG_VERSION") }),
        );
        write_frame(writer, &ready).await?;

        let mut lines = reader.lines();

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    match line {
                        Ok(Some(line)) => {
                            if line.trim().is_empty() {
                                continue;
                            }
                            let response = self.handle_line(&line).await;
                            write_frame(writer, &response).await?;
                            drain_events(&mut event_rx, writer).await?;
                        }
                        Ok(None) => {
                            debug!("RPC bridge: stdin closed");
                            break;
                        }
                        Err(e) => {
                            warn!(error = %e, "RPC bridge: stdin read error");
                            break;
                        }
                    }
                }
                event = event_rx.recv() => {
                    match event {
                        Ok(event) => write_frame(writer, &RpcFrame::from(&event)).await?,
                        Err(broadcast::error::RecvError::Lagged(n)) => {
                            debug!(lagged = n, "RPC event subscriber lagged");
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    }
                }
            }
        }

        info!("RPC bridge stopped");
        Ok(())
    }

    /// Handle a single JSON line.
    async fn handle_line(&self, line: &str) -> RpcFrame {
        let frame: RpcFrame = match serde_json::from_str(line) {
            Ok(f) => f,
            Err(e) => {
                return RpcFrame::err(
                    String::new(),
                    RpcError::new(RpcErrorCode::InvalidParams, format!("Invalid JSON: {}", e)),
                );
            }
        };

        match frame {
            RpcFrame::Request {
                id,
                origin,
                method,
                params,
            } => {
                let ctx = DispatchContext {
                    keyring: &self.keyring,
                    permissions: &self.permissions,
                };
                dispatch(&id, &origin, &method, params, &ctx).await
            }
            // Hosts only send requests
            _ => RpcFrame::err(
                String::new(),
                RpcError::new(
                    RpcErrorCode::InvalidParams,
                    "Only request frames are accepted",
                ),
            ),
        }
    }
}

/// Forward events already queued on the bus.
async fn drain_events<W>(
    event_rx: &mut broadcast::Receiver<KeyringEvent>,
    writer: &mut W,
) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    loop {
        match event_rx.try_recv() {
            Ok(event) => write_frame(writer, &RpcFrame::from(&event)).await?,
            Err(TryRecvError::Lagged(n)) => {
                debug!(lagged = n, "RPC event subscriber lagged");
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return Ok(()),
        }
    }
}

/// Write a frame as one JSON line.
async fn write_frame<W>(writer: &mut W, frame: &RpcFrame) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut json = serde_json::to_string(frame)?;
    json.push('\n');
    writer.write_all(json.as_bytes()).await?;
    writer.flush().await?;
    Ok(())
}
