//! # Store Actor
//!
//! This module defines the `KvActor`, the server half of the in-memory backend. It owns
//! the map and processes requests sequentially, which is what makes conditional create
//! atomic without a `Mutex`.

use crate::client::KvClient;
use crate::message::KvRequest;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

/// How often expired entries are purged from the map.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// The in-memory key-value actor.
///
/// # Architecture Note
/// The actor owns the `store` and the receiver end of the channel. Every
/// [`KvClient`] clone feeds the same queue, and the loop handles one request at a
/// time, so two concurrent `set_if_absent` calls on one key can never both win.
///
/// Expiry uses the tokio clock. An expired entry is dropped the next time a request
/// touches its key, and a sweep every [`SWEEP_INTERVAL`] removes the rest, such as the
/// lock of a pipeline that was cancelled mid-flight. Tests running with a paused clock
/// can move past a TTL with `tokio::time::advance`.
///
/// ```rust
/// use kv_actor::{KeyValueStore, KvActor};
///
/// #[tokio::main]
/// async fn main() {
///     let (actor, client) = KvActor::new(16);
///     let handle = tokio::spawn(actor.run());
///
///     client.set("failed-order:o1", "1|timeout").await.unwrap();
///     assert_eq!(client.get("failed-order:o1").await.unwrap().as_deref(), Some("1|timeout"));
///
///     drop(client);
///     handle.await.unwrap();
/// }
/// ```
pub struct KvActor {
    receiver: mpsc::Receiver<KvRequest>,
    store: HashMap<String, Entry>,
}

impl KvActor {
    /// Creates a new `KvActor` and its associated `KvClient`.
    ///
    /// `buffer_size` is the capacity of the request channel; when it is full,
    /// callers wait until there is space.
    pub fn new(buffer_size: usize) -> (Self, KvClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
        };
        (actor, KvClient::new(sender))
    }

    /// Runs the actor's event loop until every client has been dropped.
    pub async fn run(mut self) {
        info!("Store actor started");
        self.serve().await;
        info!(size = self.store.len(), "Store actor shutdown");
    }

    async fn serve(&mut self) {
        let mut sweep = time::interval(SWEEP_INTERVAL);
        sweep.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                msg = self.receiver.recv() => match msg {
                    Some(msg) => self.handle(msg),
                    None => break,
                },
                _ = sweep.tick() => self.sweep_expired(),
            }
        }
    }

    fn handle(&mut self, msg: KvRequest) {
        self.evict_if_expired(msg.key());

        match msg {
            KvRequest::SetIfAbsent {
                key,
                value,
                ttl,
                respond_to,
            } => {
                let created = !self.store.contains_key(&key);
                if created {
                    self.store.insert(
                        key.clone(),
                        Entry {
                            value,
                            expires_at: Instant::now().checked_add(ttl),
                        },
                    );
                }
                debug!(%key, created, ?ttl, "SetIfAbsent");
                let _ = respond_to.send(Ok(created));
            }
            KvRequest::Get { key, respond_to } => {
                let value = self.store.get(&key).map(|entry| entry.value.clone());
                debug!(%key, found = value.is_some(), "Get");
                let _ = respond_to.send(Ok(value));
            }
            KvRequest::Set {
                key,
                value,
                respond_to,
            } => {
                debug!(%key, "Set");
                self.store.insert(
                    key,
                    Entry {
                        value,
                        expires_at: None,
                    },
                );
                let _ = respond_to.send(Ok(()));
            }
            KvRequest::Delete { key, respond_to } => {
                let existed = self.store.remove(&key).is_some();
                debug!(%key, existed, "Delete");
                let _ = respond_to.send(Ok(existed));
            }
        }
    }

    fn evict_if_expired(&mut self, key: &str) {
        let now = Instant::now();
        if self.store.get(key).is_some_and(|entry| entry.is_expired(now)) {
            self.store.remove(key);
            debug!(key, "Expired");
        }
    }

    /// Drops every expired entry, including keys no request will touch again.
    fn sweep_expired(&mut self) {
        let now = Instant::now();
        let before = self.store.len();
        self.store.retain(|_, entry| !entry.is_expired(now));
        let swept = before - self.store.len();
        if swept > 0 {
            debug!(swept, "Expired entries swept");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::KeyValueStore;

    #[tokio::test]
    async fn test_set_if_absent_is_exclusive() {
        let (actor, client) = KvActor::new(8);
        tokio::spawn(actor.run());

        let ttl = Duration::from_secs(60);
        assert!(client.set_if_absent("lock:o1", "locked", ttl).await.unwrap());
        assert!(!client.set_if_absent("lock:o1", "other", ttl).await.unwrap());

        // The losing call must not overwrite the holder's value.
        assert_eq!(
            client.get("lock:o1").await.unwrap().as_deref(),
            Some("locked")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let (actor, client) = KvActor::new(8);
        tokio::spawn(actor.run());

        let ttl = Duration::from_secs(60);
        assert!(client.set_if_absent("lock:o1", "locked", ttl).await.unwrap());

        tokio::time::advance(Duration::from_secs(59)).await;
        assert!(!client.set_if_absent("lock:o1", "locked", ttl).await.unwrap());

        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(client.get("lock:o1").await.unwrap(), None);
        assert!(client.set_if_absent("lock:o1", "locked", ttl).await.unwrap());
    }

    #[tokio::test]
    async fn test_set_overwrites_and_delete_reports_existence() {
        let (actor, client) = KvActor::new(8);
        tokio::spawn(actor.run());

        client.set("k", "1|a").await.unwrap();
        client.set("k", "2|b").await.unwrap();
        assert_eq!(client.get("k").await.unwrap().as_deref(), Some("2|b"));

        assert!(client.delete("k").await.unwrap());
        assert!(!client.delete("k").await.unwrap());
        assert_eq!(client.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_closed_actor_surfaces_store_error() {
        let (actor, client) = KvActor::new(8);
        drop(actor);

        let result = client.get("k").await;
        assert!(matches!(result, Err(crate::StoreError::ActorClosed)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_drops_expired_keys_nobody_touches() {
        let (mut actor, client) = KvActor::new(8);
        let handle = tokio::spawn(async move {
            actor.serve().await;
            actor
        });

        assert!(client
            .set_if_absent("lock:abandoned", "locked", Duration::from_secs(1))
            .await
            .unwrap());
        client.set("failed-order:o1", "1|timeout").await.unwrap();

        tokio::time::sleep(SWEEP_INTERVAL + Duration::from_secs(2)).await;
        drop(client);

        let actor = handle.await.unwrap();
        assert_eq!(actor.store.len(), 1);
        assert!(actor.store.contains_key("failed-order:o1"));
    }
}
