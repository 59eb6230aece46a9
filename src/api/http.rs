//! HTTP client for the backend API and the Twitch channels API.

use std::time::Duration;

use reqwest::StatusCode;
use serde_json::Value;
use tracing::debug;

use crate::config::ApiSettings;
use crate::model::payload::decode_live;
use crate::model::{ChannelRecord, HistoryPoint, Leaderboards, Profile, channel_key, parse_history};
use crate::utils::{DashboardError, Result};

const TWITCH_ACCEPT: &str = "application/vnd.twitchtv.v3+json";

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    twitch_url: String,
}

impl ApiClient {
    pub fn new(settings: &ApiSettings) -> Result<Self> {
        Self::build(
            &settings.base_url,
            &settings.twitch_url,
            settings.request_timeout(),
        )
    }

    pub fn with_urls(base_url: &str, twitch_url: &str) -> Result<Self> {
        Self::build(base_url, twitch_url, Some(DEFAULT_REQUEST_TIMEOUT))
    }

    /// `timeout == None` lets requests wait forever.
    pub fn build(base_url: &str, twitch_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            twitch_url: twitch_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json(&self, request: reqwest::RequestBuilder, url: &str) -> Result<Value> {
        debug!("GET {url}");
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(DashboardError::NotFound(url.to_string()));
        }
        if !status.is_success() {
            return Err(DashboardError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.json::<Value>().await?)
    }

    /// `GET /history/{channel}`, ordered by date.
    pub async fn history(&self, channel: &str) -> Result<Vec<HistoryPoint>> {
        let url = format!("{}/history/{}", self.base_url, channel_key(channel));
        let body = self.get_json(self.http.get(&url), &url).await?;
        parse_history(&body)
    }

    /// `GET /live`
    pub async fn live(&self) -> Result<Vec<ChannelRecord>> {
        let url = format!("{}/live", self.base_url);
        let body = self.get_json(self.http.get(&url), &url).await?;
        decode_live(body)
    }

    /// `GET /leaderboards`
    pub async fn leaderboards(&self) -> Result<Leaderboards> {
        let url = format!("{}/leaderboards", self.base_url);
        let body = self.get_json(self.http.get(&url), &url).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// `GET {twitch}/channels/{channel}`. The Twitch API reports unknown
    /// channels either with a 404 or with an `error` body.
    pub async fn profile(&self, channel: &str) -> Result<Profile> {
        let key = channel_key(channel);
        let url = format!("{}/channels/{}", self.twitch_url, key);
        let request = self
            .http
            .get(&url)
            .header(reqwest::header::ACCEPT, TWITCH_ACCEPT);
        let body = self.get_json(request, &url).await?;

        if body.get("error").is_some() {
            return Err(DashboardError::NotFound(key));
        }
        Ok(serde_json::from_value(body)?)
    }
}
