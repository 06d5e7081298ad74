//! ApprovalCoordinator - the submit → approve/reject flow
//!
//! A submitted request is queued and the caller is sent to the companion
//! app. The companion app later approves (with a payload shaped per method)
//! or rejects it. Resolution removes the request first and notifies the host
//! second; a failed notification is logged and the request stays resolved.

use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::Result;
use crate::gateway::KeyringEvent;
use crate::redirect::{PendingResponse, RedirectConfig, RuntimeMode};
use crate::request::PendingRequest;
use crate::requests::RequestQueue;
use crate::state::SharedState;

/// Approval payload shaping.
pub mod payload;

pub use payload::shape_result;


/// Drives request resolution
#[derive(Clone)]
pub struct ApprovalCoordinator {
    shared: Arc<SharedState>,
    queue: RequestQueue,
    redirect: RedirectConfig,
    mode: RuntimeMode,
}

impl ApprovalCoordinator {
    /// Create a coordinator over a queue
    #[must_use]
    pub fn new(
        shared: Arc<SharedState>,
        queue: RequestQueue,
        redirect: RedirectConfig,
        mode: RuntimeMode,
    ) -> Self {
        Self {
            shared,
            queue,
            redirect,
            mode,
        }
    }

    /// Queue a request and point the caller at the companion app
    pub async fn submit_request(&self, request: PendingRequest) -> Result<PendingResponse> {
        self.queue.enqueue(request).await?;
        Ok(self.redirect.acknowledgment(self.mode))
    }

    /// Approve a request with `data`, returning the shaped result.
    ///
    /// Validation happens before the request is touched.
    pub async fn approve_request(&self, id: &str, data: Value) -> Result<Value> {
        let request = self.queue.get_request(id).await?;
        let result = shape_result(&request.method, data)?;

        self.queue.remove_and_persist(id).await?;
        info!(request_id = %id, method = %request.method, "Request approved");

        self.notify(KeyringEvent::RequestApproved {
            id: id.to_string(),
            result: result.clone(),
        })
        .await;
        Ok(result)
    }

    /// Reject a request
    pub async fn reject_request(&self, id: &str) -> Result<()> {
        let request = self.queue.remove_and_persist(id).await?;
        info!(request_id = %id, method = %request.method, "Request rejected");

        self.notify(KeyringEvent::RequestRejected { id: id.to_string() })
            .await;
        Ok(())
    }

    /// Current approval mode
    pub async fn approval_mode(&self) -> Result<bool> {
        Ok(self.shared.read().await?.approval_mode)
    }

    /// Set the approval mode and persist it
    pub async fn set_approval_mode(&self, enabled: bool) -> Result<bool> {
        self.shared.write().await?.approval_mode = enabled;
        self.shared.persist().await?;
        info!(enabled, "Approval mode changed");
        Ok(enabled)
    }

    async fn notify(&self, event: KeyringEvent) {
        let kind = event.kind();
        if let Err(e) = self.shared.emit(event).await {
            warn!(event = kind, error = %e, "Resolution notification failed; request stays resolved");
        }
    }
}
