//! AccountStore - known accounts and their wallet metadata
//!
//! Account lifecycle operations notify the host and treat a failed
//! notification as a failed operation.

use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::account::{Account, AccountOptions, AccountPatch, AccountType};
use crate::chains;
use crate::error::{Error, Result};
use crate::gateway::KeyringEvent;
use crate::state::{SharedState, Wallet, WalletLifecycle};


/// Account operations over the shared keyring state
#[derive(Clone)]
pub struct AccountStore {
    shared: Arc<SharedState>,
}

impl AccountStore {
    /// Create a store over shared state
    #[must_use]
    pub fn new(shared: Arc<SharedState>) -> Self {
        Self { shared }
    }

    /// Active accounts in creation order
    pub async fn list_accounts(&self) -> Result<Vec<Account>> {
        let state = self.shared.read().await?;
        Ok(state
            .ordered_wallets()
            .into_iter()
            .filter(|w| w.lifecycle.is_active())
            .map(|w| w.account.clone())
            .collect())
    }

    /// Look up an active account
    pub async fn get_account(&self, id: &Uuid) -> Result<Account> {
        let state = self.shared.read().await?;
        state
            .wallets
            .get(id)
            .filter(|w| w.lifecycle.is_active())
            .map(|w| w.account.clone())
            .ok_or_else(|| Error::account_not_found(id))
    }

    /// Create an account for `options.address`.
    ///
    /// The wallet is reserved in the `Creating` state before the host is
    /// notified, so a concurrent create for the same address fails. If the
    /// notification fails the reservation is dropped and nothing is persisted.
    pub async fn create_account(&self, options: AccountOptions) -> Result<Account> {
        let address = options
            .address()
            .ok_or_else(|| Error::DuplicateAddress("address is missing or empty".to_string()))?
            .to_string();

        let (account, suggestion) = {
            let mut state = self.shared.write().await?;
            if state.wallet_by_address(&address).is_some() {
                return Err(Error::DuplicateAddress(format!(
                    "address '{}' is already in use",
                    address
                )));
            }

            let account = Account::new(address, AccountType::Eoa, options.0.clone());
            state.next_account_index += 1;
            let index = state.next_account_index;
            state.wallets.insert(
                account.id,
                Wallet {
                    account: account.clone(),
                    derivation_path: options.derivation_path(),
                    lifecycle: WalletLifecycle::Creating,
                    index,
                },
            );
            (account, format!("Account {}", index))
        };

        let event = KeyringEvent::AccountCreated {
            account: account.clone(),
            account_name_suggestion: suggestion,
        };
        if let Err(e) = self.shared.emit(event).await {
            warn!(account_id = %account.id, error = %e, "Account creation not acknowledged, dropping it");
            self.shared.write().await?.wallets.remove(&account.id);
            return Err(e);
        }

        if let Some(wallet) = self.shared.write().await?.wallets.get_mut(&account.id) {
            wallet.lifecycle = WalletLifecycle::Active;
        }
        self.shared.persist().await?;

        info!(account_id = %account.id, address = %account.address, "Account created");
        Ok(account)
    }

    /// Merge `patch` over the stored account; the address never changes
    pub async fn update_account(&self, patch: AccountPatch) -> Result<Account> {
        let id = patch.id;
        let merged = {
            let state = self.shared.read().await?;
            let wallet = state
                .wallets
                .get(&id)
                .filter(|w| w.lifecycle.is_active())
                .ok_or_else(|| Error::account_not_found(id))?;

            if patch
                .address
                .as_deref()
                .is_some_and(|a| a != wallet.account.address)
            {
                debug!(account_id = %id, "Ignoring address change on update");
            }

            let mut merged = wallet.account.clone();
            merged.apply(patch);
            merged
        };

        self.shared
            .emit(KeyringEvent::AccountUpdated {
                account: merged.clone(),
            })
            .await?;

        {
            let mut state = self.shared.write().await?;
            let wallet = state
                .wallets
                .get_mut(&id)
                .ok_or_else(|| Error::account_not_found(id))?;
            wallet.account = merged.clone();
        }
        self.shared.persist().await?;

        info!(account_id = %id, "Account updated");
        Ok(merged)
    }

    /// Delete an account.
    ///
    /// The host is notified first; the wallet is removed and the state
    /// persisted whatever the notification outcome, and a notification
    /// failure is reported afterwards. Pending requests are left alone.
    pub async fn delete_account(&self, id: &Uuid) -> Result<()> {
        if !self.shared.read().await?.wallets.contains_key(id) {
            return Err(Error::account_not_found(id));
        }

        let notified = self
            .shared
            .emit(KeyringEvent::AccountDeleted { id: *id })
            .await;
        if let Err(e) = &notified {
            warn!(account_id = %id, error = %e, "Account deletion notification failed");
        }

        self.shared.write().await?.wallets.remove(id);
        self.shared.persist().await?;
        notified?;

        info!(account_id = %id, "Account deleted");
        Ok(())
    }

    /// Chains from `chains` the account can operate on.
    ///
    /// Every account is an `eip155` EOA, so `_id` is not consulted.
    #[must_use]
    pub fn filter_account_chains(&self, _id: &Uuid, chains: &[String]) -> Vec<String> {
        chains::filter_chains(AccountType::Eoa, chains)
    }
}
