//! Per-topic slot
//!
//! A `TopicSlot` holds the latest value of one topic together with the
//! channels of the observers watching it. Observers whose receiving side was
//! dropped are pruned on the next notification.

use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::model::{Payload, Topic};

/// Latest known state of a topic.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TopicValue {
    /// Nothing received yet.
    #[default]
    Absent,
    /// The connection closed; the previous value is no longer trusted.
    Empty,
    Present(Payload),
}

impl TopicValue {
    pub fn payload(&self) -> Option<&Payload> {
        match self {
            TopicValue::Present(payload) => Some(payload),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, TopicValue::Absent)
    }
}

#[derive(Debug)]
pub struct TopicSlot {
    pub topic: Topic,
    pub value: TopicValue,
    observers: Vec<UnboundedSender<TopicValue>>,
}

impl TopicSlot {
    pub fn new(topic: Topic) -> Self {
        Self {
            topic,
            value: TopicValue::Absent,
            observers: Vec::new(),
        }
    }

    pub fn observe(&mut self, observer: UnboundedSender<TopicValue>) {
        self.observers.push(observer);
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Replaces the value and notifies every live observer.
    pub fn set(&mut self, value: TopicValue) {
        self.value = value;
        let topic = &self.topic;
        let value = &self.value;
        self.observers.retain(|observer| {
            let alive = observer.send(value.clone()).is_ok();
            if !alive {
                debug!("dropping closed observer of {topic}");
            }
            alive
        });
    }
}
