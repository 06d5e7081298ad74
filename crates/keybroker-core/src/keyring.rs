//! Keyring - the public operation set
//!
//! A thin facade over [`AccountStore`], [`RequestQueue`] and
//! [`ApprovalCoordinator`]. Origin checks happen before a call gets here.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use crate::account::{Account, AccountOptions, AccountPatch};
use crate::accounts::AccountStore;
use crate::approval::ApprovalCoordinator;
use crate::error::Result;
use crate::gateway::{EventEmitter, StateStore};
use crate::redirect::{PendingResponse, RedirectConfig, RuntimeMode};
use crate::request::PendingRequest;
use crate::requests::RequestQueue;
use crate::state::SharedState;

/// Settings that shape keyring responses
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyringConfig {
    /// Selects the redirect endpoint
    #[serde(default)]
    pub environment: RuntimeMode,
    /// Companion app endpoints
    #[serde(default)]
    pub redirect: RedirectConfig,
}

/// Account and request broker
#[derive(Clone)]
pub struct Keyring {
    accounts: AccountStore,
    requests: RequestQueue,
    approvals: ApprovalCoordinator,
}

/// Shared keyring type
pub type SharedKeyring = Arc<Keyring>;

impl Keyring {
    /// Wire the components to the host's store and emitter.
    ///
    /// State is loaded from `store` on the first operation.
    #[must_use]
    pub fn new(
        store: Arc<dyn StateStore>,
        emitter: Arc<dyn EventEmitter>,
        config: KeyringConfig,
    ) -> Self {
        let shared = Arc::new(SharedState::new(store, emitter));
        let requests = RequestQueue::new(shared.clone());
        let approvals = ApprovalCoordinator::new(
            shared.clone(),
            requests.clone(),
            config.redirect,
            config.environment,
        );
        Self {
            accounts: AccountStore::new(shared),
            requests,
            approvals,
        }
    }

    /// All accounts
    pub async fn list_accounts(&self) -> Result<Vec<Account>> {
        self.accounts.list_accounts().await
    }

    /// One account
    pub async fn get_account(&self, id: &Uuid) -> Result<Account> {
        self.accounts.get_account(id).await
    }

    /// Create an account
    pub async fn create_account(&self, options: AccountOptions) -> Result<Account> {
        self.accounts.create_account(options).await
    }

    /// Update an account
    pub async fn update_account(&self, patch: AccountPatch) -> Result<Account> {
        self.accounts.update_account(patch).await
    }

    /// Delete an account
    pub async fn delete_account(&self, id: &Uuid) -> Result<()> {
        self.accounts.delete_account(id).await
    }

    /// Chains the account can operate on
    #[must_use]
    pub fn filter_account_chains(&self, id: &Uuid, chains: &[String]) -> Vec<String> {
        self.accounts.filter_account_chains(id, chains)
    }

    /// All pending requests
    pub async fn list_requests(&self) -> Result<Vec<PendingRequest>> {
        self.requests.list_requests().await
    }

    /// One pending request
    pub async fn get_request(&self, id: &str) -> Result<PendingRequest> {
        self.requests.get_request(id).await
    }

    /// Queue a request for out-of-band approval
    pub async fn submit_request(&self, request: PendingRequest) -> Result<PendingResponse> {
        self.approvals.submit_request(request).await
    }

    /// Approve a pending request
    pub async fn approve_request(&self, id: &str, data: Value) -> Result<Value> {
        self.approvals.approve_request(id, data).await
    }

    /// Reject a pending request
    pub async fn reject_request(&self, id: &str) -> Result<()> {
        self.approvals.reject_request(id).await
    }

    /// Whether callers should wait for resolution synchronously
    pub async fn approval_mode(&self) -> Result<bool> {
        self.approvals.approval_mode().await
    }

    /// Change the approval mode
    pub async fn set_approval_mode(&self, enabled: bool) -> Result<bool> {
        self.approvals.set_approval_mode(enabled).await
    }
}
