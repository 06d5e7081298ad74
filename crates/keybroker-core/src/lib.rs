//! Keybroker Core - account and signing-request state machine
//!
//! This crate tracks accounts and queues signing requests on behalf of an
//! external approval surface that does the actual signing:
//! - Accounts: creation, update and deletion with host notifications
//! - Requests: the pending queue and its exactly-once resolution
//! - Approval: per-method payload shaping and the submit → resolve flow
//! - Gateway: persistence and notification traits with concrete adapters
//! - Permissions: which origin may call which operation

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod account;
pub mod accounts;
pub mod approval;
pub mod chains;
pub mod error;
pub mod gateway;
pub mod keyring;
pub mod permissions;
pub mod redirect;
pub mod request;
pub mod requests;
pub mod state;

pub use account::{Account, AccountOptions, AccountPatch, AccountType, EOA_METHODS};
pub use accounts::AccountStore;
pub use approval::{shape_result, ApprovalCoordinator};
pub use error::{Error, Result};
pub use gateway::{
    EventBus, EventEmitter, JsonFileStore, KeyringEvent, MemoryStateStore, RecordingEmitter,
    StateLock, StateStore, TracingEmitter,
};
pub use keyring::{Keyring, KeyringConfig, SharedKeyring};
pub use permissions::{Operation, OriginGrant, OriginPermissions, PermissionConfig};
pub use redirect::{PendingResponse, Redirect, RedirectConfig, RuntimeMode};
pub use request::{PayloadShape, PendingRequest, RequestMethod};
pub use requests::RequestQueue;
pub use state::{KeyringState, SharedState, Wallet, WalletLifecycle};
