//! End-to-end keyring behaviour through the public facade

use keybroker_core::{
    AccountOptions, AccountPatch, Error, JsonFileStore, Keyring, KeyringConfig, KeyringEvent,
    MemoryStateStore, PendingRequest, RecordingEmitter, RedirectConfig, RuntimeMode,
};
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;
use tokio_test::{assert_err, assert_ok};

fn config() -> KeyringConfig {
    KeyringConfig {
        environment: RuntimeMode::Production,
        redirect: RedirectConfig {
            production_url: Some("https://approve.example.com".to_string()),
            development_url: Some("http://localhost:8000".to_string()),
            version: Some("2.0.1".to_string()),
            ..RedirectConfig::default()
        },
    }
}

fn keyring() -> (Keyring, Arc<RecordingEmitter>) {
    let emitter = Arc::new(RecordingEmitter::new());
    let keyring = Keyring::new(
        Arc::new(MemoryStateStore::new()),
        emitter.clone(),
        config(),
    );
    (keyring, emitter)
}

#[tokio::test]
async fn test_create_then_duplicate() {
    let (keyring, _) = keyring();

    let account = assert_ok!(
        keyring
            .create_account(AccountOptions::with_address("0xAAA"))
            .await
    );
    assert_eq!(account.methods.len(), 6);

    let err = assert_err!(
        keyring
            .create_account(AccountOptions::with_address("0xAAA"))
            .await
    );
    assert!(matches!(err, Error::DuplicateAddress(_)));

    let accounts = keyring.list_accounts().await.unwrap();
    assert_eq!(accounts, vec![account]);
}

#[tokio::test]
async fn test_address_is_immutable() {
    let (keyring, _) = keyring();
    let account = keyring
        .create_account(AccountOptions::with_address("0xAAA"))
        .await
        .unwrap();

    let mut patch = AccountPatch::from(account.clone());
    patch.address = Some("0xCCC".to_string());
    keyring.update_account(patch).await.unwrap();

    assert_eq!(
        keyring.get_account(&account.id).await.unwrap().address,
        "0xAAA"
    );
}

#[tokio::test]
async fn test_submit_get_round_trip() {
    let (keyring, emitter) = keyring();
    let request = PendingRequest::new(
        "7c1d8f5e",
        "eth_signTransaction",
        json!([{"to": "0x1", "value": "0x0"}, "0xAAA"]),
    );

    let ack = keyring.submit_request(request.clone()).await.unwrap();
    assert!(ack.pending);
    assert_eq!(
        ack.redirect.url.as_deref(),
        Some("https://approve.example.com/2.0.1")
    );

    assert_eq!(keyring.get_request("7c1d8f5e").await.unwrap(), request);
    assert_eq!(keyring.list_requests().await.unwrap(), vec![request]);
    assert!(emitter.events().is_empty());
}

#[tokio::test]
async fn test_exactly_once_resolution() {
    let (keyring, emitter) = keyring();
    keyring
        .submit_request(PendingRequest::new("a", "personal_sign", json!([])))
        .await
        .unwrap();
    keyring
        .submit_request(PendingRequest::new("b", "eth_signTransaction", json!([])))
        .await
        .unwrap();

    assert_eq!(
        keyring
            .approve_request("a", json!({"data": "0xdead"}))
            .await
            .unwrap(),
        json!("0xdead")
    );
    keyring.reject_request("b").await.unwrap();

    for id in ["a", "b"] {
        assert!(matches!(
            keyring.get_request(id).await,
            Err(Error::NotFound { .. })
        ));
    }
    assert_err!(keyring.approve_request("a", json!({"data": "0x"})).await);
    assert_err!(keyring.reject_request("b").await);

    assert_eq!(
        emitter.events(),
        vec![
            KeyringEvent::RequestApproved {
                id: "a".to_string(),
                result: json!("0xdead"),
            },
            KeyringEvent::RequestRejected {
                id: "b".to_string()
            },
        ]
    );
}

#[tokio::test]
async fn test_method_dispatch() {
    let (keyring, _) = keyring();
    keyring
        .submit_request(PendingRequest::new("sig", "eth_signTypedData_v3", json!([])))
        .await
        .unwrap();
    keyring
        .submit_request(PendingRequest::new("tx", "eth_signTransaction", json!([])))
        .await
        .unwrap();

    assert!(matches!(
        keyring.approve_request("sig", json!({})).await,
        Err(Error::InvalidData(_))
    ));
    assert!(matches!(
        keyring.approve_request("tx", json!("not-an-object")).await,
        Err(Error::InvalidData(_))
    ));

    let tx = json!({"to": "0x1", "value": "1"});
    assert_eq!(keyring.approve_request("tx", tx.clone()).await.unwrap(), tx);
}

#[tokio::test]
async fn test_delete_leaves_pending_requests() {
    let (keyring, _) = keyring();
    let account = keyring
        .create_account(AccountOptions::with_address("0xAAA"))
        .await
        .unwrap();
    keyring
        .submit_request(PendingRequest::new(
            "r1",
            "personal_sign",
            json!(["0xdead", "0xAAA"]),
        ))
        .await
        .unwrap();

    keyring.delete_account(&account.id).await.unwrap();

    assert_err!(keyring.get_account(&account.id).await);
    assert!(keyring.list_accounts().await.unwrap().is_empty());
    assert_ok!(keyring.get_request("r1").await);
}

#[tokio::test]
async fn test_state_survives_restart() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("state.json");

    let account = {
        let keyring = Keyring::new(
            Arc::new(JsonFileStore::with_path(&path)),
            Arc::new(RecordingEmitter::new()),
            config(),
        );
        let account = keyring
            .create_account(AccountOptions::with_address("0xAAA"))
            .await
            .unwrap();
        keyring
            .submit_request(PendingRequest::new("r1", "eth_sign", json!([])))
            .await
            .unwrap();
        keyring.set_approval_mode(true).await.unwrap();
        account
    };

    let emitter = Arc::new(RecordingEmitter::new());
    let keyring = Keyring::new(
        Arc::new(JsonFileStore::with_path(&path)),
        emitter.clone(),
        config(),
    );
    assert_eq!(keyring.list_accounts().await.unwrap(), vec![account]);
    assert_ok!(keyring.get_request("r1").await);
    assert!(keyring.approval_mode().await.unwrap());

    // numbering continues after a restart
    keyring
        .create_account(AccountOptions::with_address("0xBBB"))
        .await
        .unwrap();
    match emitter.last() {
        Some(KeyringEvent::AccountCreated {
            account_name_suggestion,
            ..
        }) => assert_eq!(account_name_suggestion, "Account 2"),
        other => panic!("expected AccountCreated, got {:?}", other),
    }
}

#[tokio::test]
async fn test_filter_account_chains() {
    let (keyring, _) = keyring();
    let account = keyring
        .create_account(AccountOptions::with_address("0xAAA"))
        .await
        .unwrap();
    let chains = vec!["eip155:1".to_string(), "solana:mainnet".to_string()];
    assert_eq!(
        keyring.filter_account_chains(&account.id, &chains),
        vec!["eip155:1".to_string()]
    );
}
