//! Configuration loading.
//!
//! Sources, lowest priority first: built-in defaults, `config/default.*`
//! (optional) and `CANCERBOARD_*` environment variables, where `__` separates
//! nesting levels (`CANCERBOARD_FEED__URL`).

mod settings;

use std::time::Duration;

use crate::client::ReconnectPolicy;
use crate::config::settings::PartialSettings;
use config::{Config, ConfigError, Environment, File};

pub use settings::{ApiSettings, FeedSettings, ProfileSettings, RenderSettings, Settings};

/// Loads the configuration from the default file and environment variables
/// and merges it with default values.
pub fn load_config() -> Result<Settings, ConfigError> {
    let builder = Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(
            Environment::with_prefix("CANCERBOARD")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("feed.topics")
                .try_parsing(true),
        );

    let config = builder.build()?;
    let partial: PartialSettings = config.try_deserialize()?;
    let default = Settings::default();

    let feed = partial.feed;
    let api = partial.api;
    let render = partial.render;
    let profiles = partial.profiles;

    Ok(Settings {
        feed: FeedSettings {
            url: feed
                .as_ref()
                .and_then(|f| f.url.clone())
                .unwrap_or(default.feed.url),
            topics: feed
                .as_ref()
                .and_then(|f| f.topics.clone())
                .unwrap_or(default.feed.topics),
            reconnect: feed
                .as_ref()
                .and_then(|f| f.reconnect.clone())
                .unwrap_or(default.feed.reconnect),
            reconnect_delay_ms: feed
                .as_ref()
                .and_then(|f| f.reconnect_delay_ms)
                .unwrap_or(default.feed.reconnect_delay_ms),
            reconnect_max_delay_ms: feed
                .as_ref()
                .and_then(|f| f.reconnect_max_delay_ms)
                .unwrap_or(default.feed.reconnect_max_delay_ms),
        },
        api: ApiSettings {
            base_url: api
                .as_ref()
                .and_then(|a| a.base_url.clone())
                .unwrap_or(default.api.base_url),
            twitch_url: api
                .as_ref()
                .and_then(|a| a.twitch_url.clone())
                .unwrap_or(default.api.twitch_url),
            poll_interval_secs: api
                .as_ref()
                .and_then(|a| a.poll_interval_secs)
                .unwrap_or(default.api.poll_interval_secs),
            request_timeout_ms: api
                .as_ref()
                .and_then(|a| a.request_timeout_ms)
                .unwrap_or(default.api.request_timeout_ms),
        },
        render: RenderSettings {
            top_n: render
                .as_ref()
                .and_then(|r| r.top_n)
                .unwrap_or(default.render.top_n),
            chart_width: render
                .as_ref()
                .and_then(|r| r.chart_width)
                .unwrap_or(default.render.chart_width),
            chart_height: render
                .as_ref()
                .and_then(|r| r.chart_height)
                .unwrap_or(default.render.chart_height),
        },
        profiles: ProfileSettings {
            ttl_secs: profiles
                .as_ref()
                .and_then(|p| p.ttl_secs)
                .unwrap_or(default.profiles.ttl_secs),
            db_path: profiles
                .as_ref()
                .and_then(|p| p.db_path.clone())
                .or(default.profiles.db_path),
        },
    })
}

impl FeedSettings {
    /// Maps the textual `reconnect` setting onto a policy. Unknown names fall
    /// back to no reconnection.
    pub fn reconnect_policy(&self) -> ReconnectPolicy {
        let delay = Duration::from_millis(self.reconnect_delay_ms);
        match self.reconnect.to_lowercase().as_str() {
            "fixed" | "fixed-delay" => ReconnectPolicy::FixedDelay(delay),
            "backoff" => ReconnectPolicy::Backoff {
                initial: delay,
                max: Duration::from_millis(self.reconnect_max_delay_ms),
            },
            "none" => ReconnectPolicy::None,
            other => {
                tracing::warn!("unknown reconnect policy '{other}', reconnection disabled");
                ReconnectPolicy::None
            }
        }
    }
}

impl ApiSettings {
    /// `None` means requests never time out.
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_ms > 0).then(|| Duration::from_millis(self.request_timeout_ms))
    }
}

impl ProfileSettings {
    /// `None` means profiles never expire.
    pub fn ttl(&self) -> Option<Duration> {
        (self.ttl_secs > 0).then(|| Duration::from_secs(self.ttl_secs))
    }
}

#[cfg(test)]
mod tests;
