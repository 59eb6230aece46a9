//! Single-flight polling
//!
//! Every poll of a key takes a ticket from `SingleFlight`. Only the response
//! carrying the newest ticket for its key may be applied, so a slow response
//! to an old poll can never overwrite the result of a newer one.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::model::{Payload, Topic};
use crate::store::SharedStore;
use crate::utils::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket<K> {
    key: K,
    id: u64,
}

#[derive(Debug)]
pub struct SingleFlight<K> {
    latest: Mutex<HashMap<K, u64>>,
    next: AtomicU64,
}

impl<K: Eq + Hash + Clone> Default for SingleFlight<K> {
    fn default() -> Self {
        Self {
            latest: Mutex::new(HashMap::new()),
            next: AtomicU64::new(1),
        }
    }
}

impl<K: Eq + Hash + Clone> SingleFlight<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a request for `key`, superseding any request still in flight.
    pub fn begin(&self, key: K) -> Ticket<K> {
        let id = self.next.fetch_add(1, Ordering::SeqCst);
        self.latest
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .insert(key.clone(), id);
        Ticket { key, id }
    }

    pub fn is_current(&self, ticket: &Ticket<K>) -> bool {
        self.latest
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .get(&ticket.key)
            .is_some_and(|id| *id == ticket.id)
    }
}

/// Runs one poll of `topic` and writes its result to `store` unless a newer
/// poll started meanwhile. Returns whether the result was applied.
pub async fn poll_once<F>(
    flights: &SingleFlight<Topic>,
    store: &SharedStore,
    topic: &Topic,
    fetch: F,
) -> bool
where
    F: Future<Output = Result<Payload>>,
{
    let ticket = flights.begin(topic.clone());

    let payload = match fetch.await {
        Ok(payload) => payload,
        Err(e) => {
            warn!("poll of {topic} failed: {e}");
            return false;
        }
    };

    // check and write under the store lock so a newer result cannot slip in between
    let mut store = store.lock().unwrap_or_else(|p| p.into_inner());
    if !flights.is_current(&ticket) {
        debug!("discarding stale poll result for {topic}");
        return false;
    }
    store.update(topic, payload);
    true
}

/// Aborts the wrapped task when dropped.
struct AbortOnDrop(JoinHandle<()>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Polls `topic` every `every`. Each poll runs on its own task so a slow
/// response does not delay the next tick; starting a poll aborts the one
/// before it, and aborting the returned handle aborts the poll in flight.
pub fn spawn_poller<F, Fut>(
    topic: Topic,
    store: SharedStore,
    every: Duration,
    flights: Arc<SingleFlight<Topic>>,
    fetch: F,
) -> JoinHandle<()>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Payload>> + Send + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        let mut in_flight: Option<AbortOnDrop> = None;
        loop {
            ticker.tick().await;
            let flights = flights.clone();
            let store = store.clone();
            let topic = topic.clone();
            let fetch = fetch();
            let poll = tokio::spawn(async move {
                poll_once(&flights, &store, &topic, fetch).await;
            });
            if let Some(previous) = in_flight.replace(AbortOnDrop(poll)) {
                if !previous.0.is_finished() {
                    debug!("aborting superseded poll");
                }
            }
        }
    })
}
