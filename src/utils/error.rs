//! Error taxonomy for the dashboard.
//!
//! Every failure is terminal for the single operation that raised it. The
//! subscription loop logs and drops errors instead of propagating them, so
//! none of these variants can bring the rendering pipeline down.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    /// Transport-level failure on the feed or an HTTP request.
    #[error("connection error: {0}")]
    Connection(String),

    /// A message body or response that could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),

    /// A lookup (usually a channel profile) that returned nothing.
    #[error("not found: {0}")]
    NotFound(String),

    /// Non-success status from the backend.
    #[error("http {status} for {url}")]
    Http { status: u16, url: String },

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("storage error: {0}")]
    Storage(#[from] sled::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for DashboardError {
    fn from(e: serde_json::Error) -> Self {
        DashboardError::Parse(e.to_string())
    }
}

impl From<tungstenite::Error> for DashboardError {
    fn from(e: tungstenite::Error) -> Self {
        DashboardError::Connection(e.to_string())
    }
}

impl From<reqwest::Error> for DashboardError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => DashboardError::Http {
                status: status.as_u16(),
                url: e.url().map(|u| u.to_string()).unwrap_or_default(),
            },
            None if e.is_decode() => DashboardError::Parse(e.to_string()),
            None => DashboardError::Connection(e.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
