use super::*;
use crate::gateway::{MemoryStateStore, RecordingEmitter};
use serde_json::json;

fn queue() -> (RequestQueue, Arc<MemoryStateStore>) {
    let store = Arc::new(MemoryStateStore::new());
    let shared = Arc::new(SharedState::new(
        store.clone(),
        Arc::new(RecordingEmitter::new()),
    ));
    (RequestQueue::new(shared), store)
}

#[tokio::test]
async fn test_enqueue_and_get() {
    let (queue, store) = queue();
    let request = PendingRequest::new("r1", "personal_sign", json!(["0xdead", "0xAAA"]));

    queue.enqueue(request.clone()).await.unwrap();

    assert_eq!(queue.get_request("r1").await.unwrap(), request);
    assert_eq!(store.writes(), 1);
    assert!(store.snapshot().unwrap().pending_requests.contains_key("r1"));
}

#[tokio::test]
async fn test_resubmission_overwrites() {
    let (queue, _) = queue();
    queue
        .enqueue(PendingRequest::new("r1", "personal_sign", json!([])))
        .await
        .unwrap();
    queue
        .enqueue(PendingRequest::new("r1", "eth_signTransaction", json!([{}])))
        .await
        .unwrap();

    let requests = queue.list_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "eth_signTransaction");
}

#[tokio::test]
async fn test_list_is_ordered() {
    let (queue, _) = queue();
    for id in ["c", "a", "b"] {
        queue
            .enqueue(PendingRequest::new(id, "eth_sign", json!(null)))
            .await
            .unwrap();
    }
    let ids: Vec<String> = queue
        .list_requests()
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
}

#[tokio::test]
async fn test_remove_exactly_once() {
    let (queue, store) = queue();
    queue
        .enqueue(PendingRequest::new("r1", "eth_sign", json!(null)))
        .await
        .unwrap();

    let removed = queue.remove_and_persist("r1").await.unwrap();
    assert_eq!(removed.id, "r1");
    assert!(store.snapshot().unwrap().pending_requests.is_empty());

    assert_eq!(
        queue.remove_and_persist("r1").await.unwrap_err(),
        Error::request_not_found("r1")
    );
    assert!(queue.get_request("r1").await.is_err());
}

#[tokio::test]
async fn test_storage_failure_keeps_memory_mutation() {
    let (queue, store) = queue();
    queue.list_requests().await.unwrap();
    store.set_failing(true);

    let err = queue
        .enqueue(PendingRequest::new("r1", "eth_sign", json!(null)))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Storage(_)));

    // in-memory state is ahead of disk
    assert!(queue.get_request("r1").await.is_ok());
}
