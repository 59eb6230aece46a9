//! Channel profiles
//!
//! `ProfileCache` is an in-memory cache with an explicit expiry policy.
//! `ProfileService` fronts a `ProfileSource` with that cache and, when
//! configured, a sled-backed `ProfileStore`. A failed lookup evicts the
//! channel from both so the next request tries again.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::api::http::ApiClient;
use crate::model::{Profile, channel_key};
use crate::persistence::ProfileStore;
use crate::utils::Result;

/// Anything that can look up a channel profile.
pub trait ProfileSource: Send + Sync {
    fn fetch_profile(&self, channel: &str) -> impl Future<Output = Result<Profile>> + Send;
}

impl ProfileSource for ApiClient {
    fn fetch_profile(&self, channel: &str) -> impl Future<Output = Result<Profile>> + Send {
        self.profile(channel)
    }
}

#[derive(Debug, Clone)]
struct CachedProfile {
    profile: Profile,
    fetched_at: Instant,
}

#[derive(Debug, Default)]
pub struct ProfileCache {
    entries: HashMap<String, CachedProfile>,
    ttl: Option<Duration>,
}

impl ProfileCache {
    /// `ttl == None` keeps entries until they are removed.
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
        }
    }

    pub fn get(&mut self, channel: &str) -> Option<Profile> {
        let key = channel_key(channel);
        let entry = self.entries.get(&key)?;
        if self.ttl.is_some_and(|ttl| entry.fetched_at.elapsed() > ttl) {
            debug!("profile of {key} expired");
            self.entries.remove(&key);
            return None;
        }
        Some(entry.profile.clone())
    }

    pub fn insert(&mut self, channel: &str, profile: Profile) {
        self.entries.insert(
            channel_key(channel),
            CachedProfile {
                profile,
                fetched_at: Instant::now(),
            },
        );
    }

    pub fn remove(&mut self, channel: &str) {
        self.entries.remove(&channel_key(channel));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub struct ProfileService<S> {
    source: S,
    cache: Mutex<ProfileCache>,
    store: Option<ProfileStore>,
}

impl<S: ProfileSource> ProfileService<S> {
    pub fn new(source: S, cache: ProfileCache) -> Self {
        Self {
            source,
            cache: Mutex::new(cache),
            store: None,
        }
    }

    pub fn with_store(mut self, store: ProfileStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn store(&self) -> Option<&ProfileStore> {
        self.store.as_ref()
    }

    fn cache(&self) -> std::sync::MutexGuard<'_, ProfileCache> {
        self.cache.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Cached profile of `channel`, without fetching.
    pub fn peek(&self, channel: &str) -> Option<Profile> {
        self.cache().get(channel)
    }

    pub async fn load(&self, channel: &str) -> Result<Profile> {
        let key = channel_key(channel);

        if let Some(profile) = self.cache().get(&key) {
            return Ok(profile);
        }

        if let Some(profile) = self.store.as_ref().and_then(|s| s.load(&key)) {
            debug!("profile of {key} restored from disk");
            self.cache().insert(&key, profile.clone());
            return Ok(profile);
        }

        match self.source.fetch_profile(&key).await {
            Ok(profile) => {
                debug!("finished loading profile of {key}");
                self.cache().insert(&key, profile.clone());
                if let Some(store) = &self.store {
                    if let Err(e) = store.store(&key, &profile) {
                        warn!("failed to persist profile of {key}: {e}");
                    }
                }
                Ok(profile)
            }
            Err(e) => {
                warn!("failed loading profile of {key}: {e}");
                self.cache().remove(&key);
                if let Some(store) = &self.store {
                    store.remove(&key);
                }
                Err(e)
            }
        }
    }
}
