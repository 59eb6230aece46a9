//! Domain types carried by the feed and the HTTP API.
//!
//! Derived values (`cpm`, `sane`) are methods over the raw fields, so they
//! are recomputed on every read and can never disagree with the fields they
//! come from.

pub mod history;
pub mod payload;
pub mod profile;
pub mod record;
pub mod topic;

pub use history::{HistoryPoint, parse_history};
pub use payload::Payload;
pub use profile::{Profile, channel_key};
pub use record::{ChannelRecord, LeaderboardEntry, Leaderboards};
pub use topic::{Topic, TopicKind};

#[cfg(test)]
mod tests;
