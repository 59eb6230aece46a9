//! Linear and time scales mapping data values onto output coordinates.
//!
//! Both scales guard against degenerate domains so a single point or a set of
//! equal values never yields NaN coordinates.

use chrono::{NaiveDateTime, TimeDelta};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Scale over the extent of `values`; `None` when there are none.
    pub fn from_extent(values: impl IntoIterator<Item = f64>, range: (f64, f64)) -> Option<Self> {
        let (min, max) = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<(f64, f64)>, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })?;
        Some(Self::new((min, max), range))
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn is_degenerate(&self) -> bool {
        (self.domain.1 - self.domain.0).abs() < f64::EPSILON
    }

    /// Maps `value`. A zero-width domain maps everything to the range end.
    pub fn apply(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if self.is_degenerate() {
            return r1;
        }
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    /// `count` evenly spaced domain values, both ends included. A zero-width
    /// domain has a single tick.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (d0, d1) = self.domain;
        if count < 2 || self.is_degenerate() {
            return vec![d0];
        }
        let step = (d1 - d0) / (count - 1) as f64;
        (0..count).map(|i| d0 + step * i as f64).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    domain: (NaiveDateTime, NaiveDateTime),
    range: (f64, f64),
}

impl TimeScale {
    pub fn new(domain: (NaiveDateTime, NaiveDateTime), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> (NaiveDateTime, NaiveDateTime) {
        self.domain
    }

    /// Maps `date`. A zero-width domain maps everything to the middle of the
    /// range.
    pub fn apply(&self, date: NaiveDateTime) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = (d1 - d0).num_milliseconds();
        if span == 0 {
            return (r0 + r1) / 2.0;
        }
        let offset = (date - d0).num_milliseconds();
        r0 + offset as f64 / span as f64 * (r1 - r0)
    }

    /// `count` evenly spaced dates, both ends included.
    pub fn ticks(&self, count: usize) -> Vec<NaiveDateTime> {
        let (d0, d1) = self.domain;
        let span = (d1 - d0).num_milliseconds();
        if count < 2 || span == 0 {
            return vec![d0];
        }
        let step = span as f64 / (count - 1) as f64;
        (0..count)
            .map(|i| d0 + TimeDelta::milliseconds((step * i as f64).round() as i64))
            .collect()
    }
}
