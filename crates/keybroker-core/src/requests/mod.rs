//! RequestQueue - signing requests awaiting resolution

use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::request::PendingRequest;
use crate::state::SharedState;

#[cfg(test)]
mod tests;

/// Pending request storage over the shared keyring state
#[derive(Clone)]
pub struct RequestQueue {
    shared: Arc<SharedState>,
}

impl RequestQueue {
    /// Create a queue over shared state
    #[must_use]
    pub fn new(shared: Arc<SharedState>) -> Self {
        Self { shared }
    }

    /// Snapshot of every pending request, ordered by id
    pub async fn list_requests(&self) -> Result<Vec<PendingRequest>> {
        let state = self.shared.read().await?;
        let mut requests: Vec<PendingRequest> = state.pending_requests.values().cloned().collect();
        requests.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(requests)
    }

    /// Look up a pending request
    pub async fn get_request(&self, id: &str) -> Result<PendingRequest> {
        self.shared
            .read()
            .await?
            .pending_requests
            .get(id)
            .cloned()
            .ok_or_else(|| Error::request_not_found(id))
    }

    /// Store a request under its id, replacing any previous one, and persist
    pub async fn enqueue(&self, request: PendingRequest) -> Result<()> {
        let id = request.id.clone();
        let method = request.method.clone();
        let replaced = self
            .shared
            .write()
            .await?
            .pending_requests
            .insert(id.clone(), request)
            .is_some();
        self.shared.persist().await?;

        if replaced {
            debug!(request_id = %id, "Pending request resubmitted");
        }
        info!(request_id = %id, method = %method, "Request queued");
        Ok(())
    }

    /// Remove a request and persist the removal.
    ///
    /// This is the only way a request leaves the queue, so a request id is
    /// resolved at most once: a second call fails with `NotFound`.
    pub async fn remove_and_persist(&self, id: &str) -> Result<PendingRequest> {
        let removed = self
            .shared
            .write()
            .await?
            .pending_requests
            .remove(id)
            .ok_or_else(|| Error::request_not_found(id))?;
        self.shared.persist().await?;
        Ok(removed)
    }
}
