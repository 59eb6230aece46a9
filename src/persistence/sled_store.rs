//! Profile store backed by `sled`
//!
//! Profiles live in a `profiles` tree keyed by channel. Each value records
//! when it was stored so that entries older than the TTL can be dropped on
//! read and during `cleanup_expired`.
//!
//! Configuration options supported:
//! - `ttl`: optional time-to-live; `None` keeps profiles forever.

use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sled::{Db, Tree};
use tracing::warn;

use crate::model::Profile;
use crate::utils::Result;

const PROFILES_TREE: &str = "profiles";

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StoredProfile {
    pub channel: String,
    pub profile: Profile,
    /// Milliseconds since the UNIX epoch.
    pub stored_at: i64,
}

#[derive(Clone)]
pub struct ProfileStore {
    db: Db,
    tree: Tree,
    ttl: Option<Duration>,
}

impl ProfileStore {
    /// Open or create a sled database at `path`.
    pub fn open(path: &str, ttl: Option<Duration>) -> Result<Self> {
        let db = sled::open(path)?;
        let tree = db.open_tree(PROFILES_TREE)?;
        Ok(Self { db, tree, ttl })
    }

    pub fn store(&self, channel: &str, profile: &Profile) -> Result<()> {
        let entry = StoredProfile {
            channel: channel.to_string(),
            profile: profile.clone(),
            stored_at: Utc::now().timestamp_millis(),
        };
        let serialized = serde_json::to_vec(&entry)?;
        self.tree.insert(channel.as_bytes(), serialized)?;
        Ok(())
    }

    /// Returns the stored profile unless it is missing, unreadable or expired.
    /// Expired and unreadable entries are removed.
    pub fn load(&self, channel: &str) -> Option<Profile> {
        let bytes = match self.tree.get(channel.as_bytes()) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(e) => {
                warn!("failed to read profile '{channel}': {e}");
                return None;
            }
        };

        let entry: StoredProfile = match serde_json::from_slice(&bytes) {
            Ok(entry) => entry,
            Err(e) => {
                warn!("dropping unreadable profile '{channel}': {e}");
                self.remove(channel);
                return None;
            }
        };

        if self.is_expired(entry.stored_at, Utc::now().timestamp_millis()) {
            self.remove(channel);
            return None;
        }

        Some(entry.profile)
    }

    pub fn remove(&self, channel: &str) {
        if let Err(e) = self.tree.remove(channel.as_bytes()) {
            warn!("failed to remove profile '{channel}': {e}");
        }
    }

    /// Removes every expired profile and returns how many were dropped.
    pub fn cleanup_expired(&self) -> usize {
        let now = Utc::now().timestamp_millis();
        let expired: Vec<_> = self
            .tree
            .iter()
            .filter_map(|res| res.ok())
            .filter(|(_, value)| {
                serde_json::from_slice::<StoredProfile>(value)
                    .map(|entry| self.is_expired(entry.stored_at, now))
                    .unwrap_or(true)
            })
            .map(|(key, _)| key)
            .collect();

        for key in &expired {
            let _ = self.tree.remove(key);
        }
        expired.len()
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }

    fn is_expired(&self, stored_at: i64, now: i64) -> bool {
        match self.ttl {
            Some(ttl) => now - stored_at > ttl.as_millis() as i64,
            None => false,
        }
    }
}

impl std::fmt::Debug for ProfileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileStore")
            .field("db", &"sled::Db")
            .field("ttl", &self.ttl)
            .finish()
    }
}
