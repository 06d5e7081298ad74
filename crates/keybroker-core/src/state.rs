//! Keyring aggregate root and its shared, lazily loaded handle

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::account::Account;
use crate::error::{Error, Result};
use crate::gateway::{EventEmitter, KeyringEvent, StateStore};
use crate::request::PendingRequest;

/// Where a wallet is in its creation lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WalletLifecycle {
    /// Creation notification sent, not yet confirmed
    Creating,
    /// Fully created
    #[default]
    Active,
}

impl WalletLifecycle {
    /// Whether the wallet is fully created
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Persisted as the optional `pendingCreation: true` flag
mod pending_creation {
    use super::WalletLifecycle;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        lifecycle: &WalletLifecycle,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_bool(!lifecycle.is_active())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<WalletLifecycle, D::Error> {
        Ok(match Option::<bool>::deserialize(deserializer)? {
            Some(true) => WalletLifecycle::Creating,
            _ => WalletLifecycle::Active,
        })
    }
}

/// An account paired with its key-derivation metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    /// The account record
    pub account: Account,
    /// Key derivation path supplied at creation
    #[serde(default)]
    pub derivation_path: String,
    /// Creation lifecycle
    #[serde(
        rename = "pendingCreation",
        default,
        skip_serializing_if = "WalletLifecycle::is_active",
        with = "pending_creation"
    )]
    pub lifecycle: WalletLifecycle,
    /// Monotonic account number assigned at creation
    #[serde(default)]
    pub index: u64,
}

/// The single aggregate root
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyringState {
    /// Wallets keyed by account id
    #[serde(default)]
    pub wallets: HashMap<Uuid, Wallet>,
    /// Requests awaiting resolution, keyed by request id
    #[serde(default)]
    pub pending_requests: HashMap<String, PendingRequest>,
    /// Whether callers should wait for resolution synchronously
    #[serde(default)]
    pub approval_mode: bool,
    /// Next account number to hand out
    #[serde(default)]
    pub next_account_index: u64,
}

impl KeyringState {
    /// Repair a freshly loaded document.
    ///
    /// Wallets still marked as creating belong to a create that never
    /// finished, so they are dropped and their addresses freed. The account
    /// counter never falls below an index already handed out; documents
    /// written before the counter existed start after the wallet count.
    pub fn normalize(&mut self) {
        let highest = self.wallets.values().map(|w| w.index).max().unwrap_or(0);
        let count = self.wallets.len() as u64;
        self.next_account_index = self.next_account_index.max(highest).max(count);

        self.wallets.retain(|id, wallet| {
            if wallet.lifecycle.is_active() {
                return true;
            }
            warn!(
                account_id = %id,
                address = %wallet.account.address,
                "Dropping wallet left in creation"
            );
            false
        });
    }

    /// Wallet whose address matches, ignoring ASCII case
    #[must_use]
    pub fn wallet_by_address(&self, address: &str) -> Option<&Wallet> {
        self.wallets
            .values()
            .find(|w| w.account.address.eq_ignore_ascii_case(address))
    }

    /// Wallets in creation order
    #[must_use]
    pub fn ordered_wallets(&self) -> Vec<&Wallet> {
        let mut wallets: Vec<&Wallet> = self.wallets.values().collect();
        wallets.sort_by(|a, b| {
            a.index
                .cmp(&b.index)
                .then_with(|| a.account.id.cmp(&b.account.id))
        });
        wallets
    }
}

/// Shared handle over the aggregate and its two gateways.
///
/// The state is loaded from the store on first access. Check-and-mutate
/// steps must complete under one write guard without awaiting anything else.
pub struct SharedState {
    cell: OnceCell<RwLock<KeyringState>>,
    store: Arc<dyn StateStore>,
    emitter: Arc<dyn EventEmitter>,
    persist_lock: Mutex<()>,
}

impl SharedState {
    /// Create a handle; nothing is loaded until first use
    #[must_use]
    pub fn new(store: Arc<dyn StateStore>, emitter: Arc<dyn EventEmitter>) -> Self {
        Self {
            cell: OnceCell::new(),
            store,
            emitter,
            persist_lock: Mutex::new(()),
        }
    }

    async fn state(&self) -> Result<&RwLock<KeyringState>> {
        self.cell
            .get_or_try_init(|| async {
                let mut state = self.store.load().await?;
                state.normalize();
                info!(
                    wallets = state.wallets.len(),
                    pending_requests = state.pending_requests.len(),
                    "Keyring state loaded"
                );
                Ok::<_, Error>(RwLock::new(state))
            })
            .await
    }

    /// Shared read access
    pub async fn read(&self) -> Result<RwLockReadGuard<'_, KeyringState>> {
        Ok(self.state().await?.read().await)
    }

    /// Exclusive write access
    pub async fn write(&self) -> Result<RwLockWriteGuard<'_, KeyringState>> {
        Ok(self.state().await?.write().await)
    }

    /// Write the current aggregate to the store
    pub async fn persist(&self) -> Result<()> {
        let _guard = self.persist_lock.lock().await;
        let snapshot = self.read().await?.clone();
        self.store.persist(&snapshot).await?;
        debug!(wallets = snapshot.wallets.len(), "Keyring state persisted");
        Ok(())
    }

    /// Notify the host of a lifecycle event
    pub async fn emit(&self, event: KeyringEvent) -> Result<()> {
        self.emitter.emit(event).await
    }
}
