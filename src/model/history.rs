//! Channel history
//!
//! The history endpoint returns a list of single-key objects mapping a
//! timestamp to the counts for that minute:
//!
//! ```json
//! {"history": [{"2015-05-01 20:01:00": {"cancer": 12, "total": 40}}]}
//! ```

use chrono::{DateTime, NaiveDateTime};
use serde::Deserialize;
use serde_json::Value;

use crate::utils::{DashboardError, Result};

pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryPoint {
    pub date: NaiveDateTime,
    pub cancer: f64,
    pub total: f64,
}

impl HistoryPoint {
    /// Messages that were not cancerous.
    pub fn sane(&self) -> f64 {
        self.total - self.cancer
    }
}

#[derive(Debug, Deserialize)]
struct Counts {
    cancer: f64,
    total: f64,
}

#[derive(Debug, Deserialize)]
struct HistoryResponse {
    history: Vec<serde_json::Map<String, Value>>,
}

/// Parses a `/history/{channel}` response body into points ordered by date.
pub fn parse_history(body: &Value) -> Result<Vec<HistoryPoint>> {
    let response = HistoryResponse::deserialize(body)?;
    let mut points = Vec::with_capacity(response.history.len());

    for entry in response.history {
        // a well-formed entry has exactly one key; keep the last like the API does
        let Some((stamp, counts)) = entry.into_iter().last() else {
            continue;
        };
        let counts = Counts::deserialize(counts)?;
        points.push(HistoryPoint {
            date: parse_timestamp(&stamp)?,
            cancer: counts.cancer,
            total: counts.total,
        });
    }

    points.sort_by_key(|p| p.date);
    Ok(points)
}

/// Accepts `2015-05-01 20:01:00`, ISO `2015-05-01T20:01:00(.fff)` and RFC 3339.
pub fn parse_timestamp(stamp: &str) -> Result<NaiveDateTime> {
    let stamp = stamp.trim();
    NaiveDateTime::parse_from_str(stamp, DATE_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(stamp, "%Y-%m-%dT%H:%M:%S%.f"))
        .or_else(|_| DateTime::parse_from_rfc3339(stamp).map(|d| d.naive_utc()))
        .map_err(|_| DashboardError::Parse(format!("invalid timestamp '{stamp}'")))
}
