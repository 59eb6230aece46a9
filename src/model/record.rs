//! Per-channel records and leaderboards.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Live cancer level of one channel over the last minute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelRecord {
    pub channel: String,
    pub cancer: f64,
    pub messages: f64,
}

impl ChannelRecord {
    pub fn new(channel: impl Into<String>, cancer: f64, messages: f64) -> Self {
        Self {
            channel: channel.into(),
            cancer,
            messages,
        }
    }

    /// Cancer per message, rounded to two decimals. A channel without
    /// messages has a cpm of zero.
    pub fn cpm(&self) -> f64 {
        if self.messages == 0.0 {
            return 0.0;
        }
        (self.cancer / self.messages * 100.0).round() / 100.0
    }
}

/// One ranked row of a leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub channel: String,
    #[serde(default)]
    pub date: Option<String>,
    /// The backend stringifies values; numbers are accepted as well.
    #[serde(deserialize_with = "number_or_string")]
    pub value: f64,
}

/// Leaderboards keyed by metric (`cancer`, `messages`, `cpm`) then by
/// interval (`minute`, `average`, `total`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Leaderboards(pub BTreeMap<String, BTreeMap<String, Vec<LeaderboardEntry>>>);

impl Leaderboards {
    pub fn get(&self, metric: &str, interval: &str) -> Option<&[LeaderboardEntry]> {
        self.0
            .get(metric)
            .and_then(|intervals| intervals.get(interval))
            .map(Vec::as_slice)
    }

    pub fn metrics(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(|intervals| intervals.is_empty())
    }
}

fn number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        Text(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::Text(s) => s.trim().parse::<f64>().map_err(serde::de::Error::custom),
    }
}
