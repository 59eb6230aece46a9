use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::{Payload, Topic};
use crate::utils::{DashboardError, Result};

/// Requests sent by the dashboard, serialized as `{"subscribe": topic}` and
/// `{"unsubscribe": topic}`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientMessage {
    Subscribe(Topic),
    Unsubscribe(Topic),
}

/// A pushed message as it appears on the wire.
#[derive(Debug, Deserialize, Serialize)]
pub struct ServerMessage {
    pub topic: Topic,
    pub data: Value,
}

/// A pushed message with its payload decoded for its topic.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub topic: Topic,
    pub payload: Payload,
}

impl ClientMessage {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Decodes one text frame. Frames for topics outside `declared` are rejected
/// so that stray pushes never reach the store.
pub fn decode_frame(text: &str, declared: &[Topic]) -> Result<Envelope> {
    let ServerMessage { topic, data } = serde_json::from_str(text)?;

    if !declared.contains(&topic) {
        return Err(DashboardError::Parse(format!(
            "message for undeclared topic '{topic}'"
        )));
    }

    let payload = Payload::decode(&topic, data)?;
    Ok(Envelope { topic, payload })
}
