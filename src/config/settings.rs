use serde::Deserialize;

/// Top-level configuration settings for the dashboard.
///
/// Groups the push feed, the HTTP API, rendering and profile cache settings.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub feed: FeedSettings,
    pub api: ApiSettings,
    pub render: RenderSettings,
    pub profiles: ProfileSettings,
}

/// Configuration of the WebSocket push feed.
#[derive(Debug, Deserialize, Clone)]
pub struct FeedSettings {
    pub url: String,
    pub topics: Vec<String>,
    /// One of `none`, `fixed` or `backoff`.
    pub reconnect: String,
    pub reconnect_delay_ms: u64,
    pub reconnect_max_delay_ms: u64,
}

/// Configuration of the backend HTTP API and the Twitch profile API.
#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub twitch_url: String,
    pub poll_interval_secs: u64,
    /// Per-request timeout; `0` disables it.
    pub request_timeout_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RenderSettings {
    pub top_n: usize,
    pub chart_width: f64,
    pub chart_height: f64,
}

/// Profile cache policy.
///
/// `ttl_secs == 0` keeps entries forever. `db_path` enables the sled-backed
/// store so profiles survive restarts.
#[derive(Debug, Deserialize, Clone)]
pub struct ProfileSettings {
    pub ttl_secs: u64,
    pub db_path: Option<String>,
}

/// Partial configuration settings loaded from files or environment.
///
/// Missing values are filled from `Settings::default()`.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    pub feed: Option<PartialFeedSettings>,
    pub api: Option<PartialApiSettings>,
    pub render: Option<PartialRenderSettings>,
    pub profiles: Option<PartialProfileSettings>,
}

#[derive(Debug, Deserialize)]
pub struct PartialFeedSettings {
    pub url: Option<String>,
    pub topics: Option<Vec<String>>,
    pub reconnect: Option<String>,
    pub reconnect_delay_ms: Option<u64>,
    pub reconnect_max_delay_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct PartialApiSettings {
    pub base_url: Option<String>,
    pub twitch_url: Option<String>,
    pub poll_interval_secs: Option<u64>,
    pub request_timeout_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct PartialRenderSettings {
    pub top_n: Option<usize>,
    pub chart_width: Option<f64>,
    pub chart_height: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct PartialProfileSettings {
    pub ttl_secs: Option<u64>,
    pub db_path: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            feed: FeedSettings {
                url: "ws://127.0.0.1:3569".to_string(),
                topics: vec![
                    "twitchcancer.live".to_string(),
                    "twitchcancer.leaderboards".to_string(),
                ],
                reconnect: "none".to_string(),
                reconnect_delay_ms: 1000,
                reconnect_max_delay_ms: 30_000,
            },
            api: ApiSettings {
                base_url: "http://127.0.0.1:8080".to_string(),
                twitch_url: "https://api.twitch.tv/kraken".to_string(),
                poll_interval_secs: 60,
                request_timeout_ms: 10_000,
            },
            render: RenderSettings {
                top_n: 10,
                chart_width: 960.0,
                chart_height: 500.0,
            },
            profiles: ProfileSettings {
                ttl_secs: 3600,
                db_path: None,
            },
        }
    }
}
