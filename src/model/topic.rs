//! Topic names
//!
//! A `Topic` is an immutable name such as `twitchcancer.live`. The backend
//! also serves variable families where the last path segment is an argument
//! (`twitchcancer.channel.forsenlol`); `kind` classifies a name into the
//! family that decides how its payload is decoded.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const LIVE: &str = "twitchcancer.live";
pub const LEADERBOARDS: &str = "twitchcancer.leaderboards";
pub const STATUS: &str = "twitchcancer.status";

const LEADERBOARDS_PREFIX: &str = "twitchcancer.leaderboards.";
const LEADERBOARD_PREFIX: &str = "twitchcancer.leaderboard.";
const CHANNEL_PREFIX: &str = "twitchcancer.channel.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicKind {
    Live,
    /// All leaderboards, optionally restricted to a horizon.
    Leaderboards,
    /// One named leaderboard.
    Leaderboard,
    Status,
    Channel,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Topic(String);

impl Topic {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn live() -> Self {
        Self::new(LIVE)
    }

    pub fn leaderboards() -> Self {
        Self::new(LEADERBOARDS)
    }

    /// Topic holding the personal records of `channel`.
    pub fn channel(channel: &str) -> Self {
        Self(format!("{CHANNEL_PREFIX}{}", channel.trim_start_matches('#')))
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn kind(&self) -> Option<TopicKind> {
        let name = self.0.as_str();
        match name {
            LIVE => Some(TopicKind::Live),
            LEADERBOARDS => Some(TopicKind::Leaderboards),
            STATUS => Some(TopicKind::Status),
            _ if variable_part(name, LEADERBOARDS_PREFIX).is_some() => {
                Some(TopicKind::Leaderboards)
            }
            _ if variable_part(name, LEADERBOARD_PREFIX).is_some() => {
                Some(TopicKind::Leaderboard)
            }
            _ if variable_part(name, CHANNEL_PREFIX).is_some() => Some(TopicKind::Channel),
            _ => None,
        }
    }

    /// The variable last segment of a family topic, if any.
    pub fn argument(&self) -> Option<&str> {
        [LEADERBOARDS_PREFIX, LEADERBOARD_PREFIX, CHANNEL_PREFIX]
            .iter()
            .find_map(|prefix| variable_part(&self.0, prefix))
    }
}

fn variable_part<'a>(name: &'a str, prefix: &str) -> Option<&'a str> {
    name.strip_prefix(prefix).filter(|rest| !rest.is_empty())
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Topic {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Topic {
    fn from(name: String) -> Self {
        Self(name)
    }
}
