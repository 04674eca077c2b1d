use kv_actor::{KeyValueStore, KvActor, SharedStore};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_concurrent_set_if_absent_has_single_winner() {
    let (actor, client) = KvActor::new(64);
    let handle = tokio::spawn(actor.run());
    let store: SharedStore = Arc::new(client);

    let mut tasks = vec![];
    for i in 0..32 {
        let store = store.clone();
        tasks.push(tokio::spawn(async move {
            store
                .set_if_absent("lock:o1", &format!("worker-{i}"), Duration::from_secs(60))
                .await
        }));
    }

    let mut winners = 0;
    for task in tasks {
        if task.await.unwrap().unwrap() {
            winners += 1;
        }
    }
    assert_eq!(winners, 1, "exactly one caller may create the key");

    // Distinct keys never contend.
    assert!(store
        .set_if_absent("lock:o2", "locked", Duration::from_secs(60))
        .await
        .unwrap());

    drop(store);
    handle.await.unwrap();
}
