//! Topic payloads
//!
//! The shape of `data` in an envelope depends on the topic. `Payload::decode`
//! picks the shape from the topic's kind and fails with a parse error when the
//! data does not match, so a bad message can be dropped on its own.

use serde::Deserialize;
use serde_json::Value;

use crate::model::record::{ChannelRecord, Leaderboards};
use crate::model::topic::{Topic, TopicKind};
use crate::utils::{DashboardError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Live(Vec<ChannelRecord>),
    Leaderboards(Leaderboards),
    /// Status, channel and single-leaderboard topics, consumed as-is.
    Raw(Value),
}

impl Payload {
    pub fn decode(topic: &Topic, data: Value) -> Result<Self> {
        match topic.kind() {
            Some(TopicKind::Live) => Ok(Payload::Live(decode_live(data)?)),
            Some(TopicKind::Leaderboards) => {
                Ok(Payload::Leaderboards(Leaderboards::deserialize(data)?))
            }
            Some(TopicKind::Leaderboard | TopicKind::Status | TopicKind::Channel) => {
                Ok(Payload::Raw(data))
            }
            None => Err(DashboardError::Parse(format!("unknown topic '{topic}'"))),
        }
    }

    pub fn as_live(&self) -> Option<&[ChannelRecord]> {
        match self {
            Payload::Live(records) => Some(records),
            _ => None,
        }
    }

    pub fn as_leaderboards(&self) -> Option<&Leaderboards> {
        match self {
            Payload::Leaderboards(boards) => Some(boards),
            _ => None,
        }
    }
}

/// The feed pushes a bare array while `GET /live` wraps it in `channels`.
pub fn decode_live(data: Value) -> Result<Vec<ChannelRecord>> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Live {
        Bare(Vec<ChannelRecord>),
        Wrapped { channels: Vec<ChannelRecord> },
    }

    match Live::deserialize(data)? {
        Live::Bare(records) | Live::Wrapped { channels: records } => Ok(records),
    }
}
