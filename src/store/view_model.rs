//! View model store
//!
//! Current-value cache keyed by topic. Each update fully replaces the
//! previous snapshot (last write wins); nothing older than the latest value
//! is retained.
//!
//! The store is synchronous and meant to sit behind `Arc<Mutex<_>>`. The
//! lock is only held for a single update or read, never across I/O.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{debug, info};

use crate::client::Connection;
use crate::model::{Payload, Topic};
use crate::store::slot::{TopicSlot, TopicValue};

#[derive(Debug, Default)]
pub struct ViewModelStore {
    pub topics: HashMap<Topic, TopicSlot>,
}

pub type SharedStore = Arc<Mutex<ViewModelStore>>;

impl ViewModelStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedStore {
        Arc::new(Mutex::new(Self::new()))
    }

    fn slot(&mut self, topic: &Topic) -> &mut TopicSlot {
        self.topics
            .entry(topic.clone())
            .or_insert_with(|| TopicSlot::new(topic.clone()))
    }

    /// Makes `topic` known without a value so that `clear` covers it.
    pub fn declare(&mut self, topic: &Topic) {
        self.slot(topic);
    }

    pub fn update(&mut self, topic: &Topic, payload: Payload) {
        debug!("store update for {topic}");
        self.slot(topic).set(TopicValue::Present(payload));
    }

    pub fn get(&self, topic: &Topic) -> TopicValue {
        self.topics
            .get(topic)
            .map(|slot| slot.value.clone())
            .unwrap_or_default()
    }

    /// Marks every known topic `Empty`.
    pub fn clear(&mut self) {
        for slot in self.topics.values_mut() {
            slot.set(TopicValue::Empty);
        }
    }

    /// Registers an observer for `topic`. The receiver yields every later
    /// value of the topic, starting with nothing: read `get` for the current
    /// one.
    pub fn watch(&mut self, topic: &Topic) -> UnboundedReceiver<TopicValue> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.slot(topic).observe(tx);
        rx
    }
}

/// Feeds `connection` into `store`: every envelope updates its topic and a
/// close marks every subscribed topic empty.
pub fn bind(store: &SharedStore, connection: &Connection) {
    {
        let store = store.clone();
        connection.on_message(move |envelope| {
            let mut store = store.lock().unwrap_or_else(|p| p.into_inner());
            store.update(&envelope.topic, envelope.payload.clone());
        });
    }

    {
        let store = store.clone();
        let subscriptions = connection.clone();
        connection.on_close(move || {
            let topics = subscriptions.subscriptions();
            let mut store = store.lock().unwrap_or_else(|p| p.into_inner());
            for topic in &topics {
                store.declare(topic);
            }
            store.clear();
            info!("connection closed, cleared {} topics", store.topics.len());
        });
    }
}
