//! Bar leaderboard
//!
//! Ranks records by one numeric field, keeps the top `n` and scales each bar
//! linearly between the smallest and largest value of the whole input.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::model::{ChannelRecord, LeaderboardEntry};
use crate::render::scale::LinearScale;
use crate::utils::DashboardError;

pub const DEFAULT_TOP_N: usize = 10;

/// Bar widths are percentages in `[0, MAX_WIDTH]`.
pub const MAX_WIDTH: f64 = 99.0;

/// Numeric field a leaderboard is ranked by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Cancer,
    Messages,
    Cpm,
    /// The pre-computed value of a leaderboard entry.
    Value,
}

impl FromStr for Field {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cancer" => Ok(Field::Cancer),
            "messages" => Ok(Field::Messages),
            "cpm" => Ok(Field::Cpm),
            "value" => Ok(Field::Value),
            other => Err(DashboardError::Parse(format!("unknown field '{other}'"))),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::Cancer => "cancer",
            Field::Messages => "messages",
            Field::Cpm => "cpm",
            Field::Value => "value",
        })
    }
}

/// A record that can be placed on a leaderboard.
pub trait Ranked {
    fn channel(&self) -> &str;
    fn field(&self, field: Field) -> f64;
}

impl Ranked for ChannelRecord {
    fn channel(&self) -> &str {
        &self.channel
    }

    /// `Value` ranks live records by cancer.
    fn field(&self, field: Field) -> f64 {
        match field {
            Field::Cancer | Field::Value => self.cancer,
            Field::Messages => self.messages,
            Field::Cpm => self.cpm(),
        }
    }
}

impl Ranked for LeaderboardEntry {
    fn channel(&self) -> &str {
        &self.channel
    }

    fn field(&self, _field: Field) -> f64 {
        self.value
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub channel: String,
    pub value: f64,
    /// Percentage width in `[0, MAX_WIDTH]`.
    pub width: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BarRender {
    Loading,
    NoData,
    Bars(Vec<Bar>),
}

impl BarRender {
    pub fn bars(&self) -> &[Bar] {
        match self {
            BarRender::Bars(bars) => bars,
            _ => &[],
        }
    }
}

/// Pure layout of `records`.
pub fn layout_bars<R: Ranked>(records: &[R], field: Field, top_n: usize) -> BarRender {
    if records.is_empty() {
        return BarRender::NoData;
    }

    let Some(scale) = LinearScale::from_extent(
        records.iter().map(|r| r.field(field)),
        (0.0, MAX_WIDTH),
    ) else {
        return BarRender::NoData;
    };

    let mut ranked: Vec<&R> = records.iter().collect();
    // sort_by is stable: ties keep their input order
    ranked.sort_by(|a, b| {
        b.field(field)
            .partial_cmp(&a.field(field))
            .unwrap_or(Ordering::Equal)
    });

    let bars = ranked
        .into_iter()
        .take(top_n)
        .map(|record| {
            let value = record.field(field);
            Bar {
                channel: record.channel().to_string(),
                value,
                width: scale.apply(value).clamp(0.0, MAX_WIDTH),
                label: format!("{}: {}", record.channel(), value),
            }
        })
        .collect();

    BarRender::Bars(bars)
}

/// Leaderboard that keeps its last render while data is loading.
#[derive(Debug, Clone)]
pub struct BarChart {
    field: Field,
    top_n: usize,
    current: BarRender,
}

impl BarChart {
    pub fn new(field: Field) -> Self {
        Self::with_top_n(field, DEFAULT_TOP_N)
    }

    pub fn with_top_n(field: Field, top_n: usize) -> Self {
        Self {
            field,
            top_n,
            current: BarRender::Loading,
        }
    }

    pub fn field(&self) -> Field {
        self.field
    }

    pub fn current(&self) -> &BarRender {
        &self.current
    }

    /// `None` means the data is still loading and leaves the previous render
    /// in place.
    pub fn render<R: Ranked>(&mut self, records: Option<&[R]>) -> &BarRender {
        if let Some(records) = records {
            self.current = layout_bars(records, self.field, self.top_n);
        }
        &self.current
    }
}
