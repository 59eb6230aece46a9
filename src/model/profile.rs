use serde::{Deserialize, Serialize};

/// Public metadata of a Twitch channel as returned by the channels API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub name: Option<String>,
    pub display_name: Option<String>,
    pub status: Option<String>,
    pub game: Option<String>,
    pub logo: Option<String>,
    pub url: Option<String>,
    pub followers: Option<u64>,
    pub views: Option<u64>,
    pub partner: Option<bool>,
}

/// Cache key of a channel: no leading `#`, lowercase.
pub fn channel_key(channel: &str) -> String {
    channel.trim().trim_start_matches('#').to_lowercase()
}
