use super::*;
use crate::account::{Account, AccountType};
use crate::error::Error;
use crate::request::PendingRequest;
use crate::state::{KeyringState, Wallet, WalletLifecycle};
use serde_json::{json, Map};
use tempfile::TempDir;
use uuid::Uuid;

fn sample_state() -> KeyringState {
    let mut state = KeyringState::default();
    let account = Account::new("0xAAA", AccountType::Eoa, Map::new());
    state.wallets.insert(
        account.id,
        Wallet {
            account,
            derivation_path: "m/44'/60'/0'/0/0".to_string(),
            lifecycle: WalletLifecycle::Active,
            index: 1,
        },
    );
    state.pending_requests.insert(
        "r1".to_string(),
        PendingRequest::new("r1", "personal_sign", json!(["0xdead", "0xAAA"])),
    );
    state.next_account_index = 1;
    state
}

#[tokio::test]
async fn test_bus_publish_subscribe() {
    let bus = EventBus::new(16);
    let mut rx = bus.subscribe();

    let id = Uuid::new_v4();
    bus.emit(KeyringEvent::AccountDeleted { id }).await.unwrap();

    let event = rx.recv().await.unwrap();
    assert_eq!(event, KeyringEvent::AccountDeleted { id });
}

#[tokio::test]
async fn test_bus_without_subscriber() {
    let bus = EventBus::new(16);
    assert_eq!(bus.subscriber_count(), 0);
    assert!(bus
        .emit(KeyringEvent::RequestRejected { id: "r1".into() })
        .await
        .is_ok());

    let strict = EventBus::new(16).require_subscriber(true);
    let err = strict
        .emit(KeyringEvent::RequestRejected { id: "r1".into() })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Notification(_)));

    let _rx = strict.subscribe();
    assert!(strict
        .emit(KeyringEvent::RequestRejected { id: "r1".into() })
        .await
        .is_ok());
}

#[test]
fn test_event_serialization() {
    let account = Account::new("0xAAA", AccountType::Eoa, Map::new());
    let event = KeyringEvent::AccountCreated {
        account: account.clone(),
        account_name_suggestion: "Account 1".to_string(),
    };
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["type"], "AccountCreated");
    assert_eq!(json["data"]["accountNameSuggestion"], "Account 1");

    let payload = event.payload();
    assert_eq!(payload["account"]["address"], "0xAAA");

    let approved = KeyringEvent::RequestApproved {
        id: "r1".to_string(),
        result: json!("0xdead"),
    };
    assert_eq!(approved.kind(), "RequestApproved");
    assert_eq!(approved.payload(), json!({"id": "r1", "result": "0xdead"}));
}

#[tokio::test]
async fn test_file_store_missing_document() {
    let temp_dir = TempDir::new().unwrap();
    let store = JsonFileStore::with_path(temp_dir.path().join("state.json"));

    let state = store.load().await.unwrap();
    assert_eq!(state, KeyringState::default());
}

#[tokio::test]
async fn test_file_store_persist_and_load() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("state.json");
    let store = JsonFileStore::with_path(&path);

    let state = sample_state();
    store.persist(&state).await.unwrap();
    assert!(path.exists());
    assert!(!temp_dir.path().join("nested").join("state.json.tmp").exists());

    let loaded = store.load().await.unwrap();
    assert_eq!(loaded, state);

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert!(raw["pendingRequests"]["r1"].is_object());
    assert_eq!(raw["approvalMode"], false);
}

#[tokio::test]
async fn test_file_store_corrupt_document() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("state.json");
    std::fs::write(&path, "{not json").unwrap();

    let err = JsonFileStore::with_path(&path).load().await.unwrap_err();
    assert!(matches!(err, Error::Storage(_)));
}

#[tokio::test]
async fn test_memory_store_failure_mode() {
    let store = MemoryStateStore::new();
    store.persist(&sample_state()).await.unwrap();
    assert_eq!(store.writes(), 1);

    store.set_failing(true);
    assert!(matches!(
        store.persist(&KeyringState::default()).await,
        Err(Error::Storage(_))
    ));
    assert_eq!(store.snapshot().unwrap().wallets.len(), 1);
    assert_eq!(store.writes(), 1);
    assert!(store.load().await.is_err());
}

#[tokio::test]
async fn test_recording_emitter() {
    let emitter = RecordingEmitter::new();
    emitter
        .emit(KeyringEvent::RequestRejected { id: "a".into() })
        .await
        .unwrap();

    emitter.set_failing(true);
    assert!(emitter
        .emit(KeyringEvent::RequestRejected { id: "b".into() })
        .await
        .is_err());

    assert_eq!(emitter.events().len(), 1);
    assert_eq!(
        emitter.last(),
        Some(KeyringEvent::RequestRejected { id: "a".into() })
    );
}

#[test]
fn test_state_lock_is_exclusive() {
    let temp_dir = TempDir::new().unwrap();
    let store = JsonFileStore::with_path(temp_dir.path().join("nested").join("state.json"));

    let held = store.try_lock().unwrap();
    assert!(held.path().ends_with("state.json.lock"));

    let err = JsonFileStore::with_path(store.path()).try_lock().unwrap_err();
    assert!(matches!(&err, Error::Storage(msg) if msg.contains("locked")));

    drop(held);
    assert!(store.try_lock().is_ok());
}
