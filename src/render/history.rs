//! Stacked-area history chart
//!
//! Two series are stacked on a zero baseline: `cancer` first, then `sane`
//! (total minus cancer) on top of it. The top of the `sane` band therefore
//! traces the total message count. Each band is drawn as a cardinal spline
//! area and every stacked point carries a tooltip.

use chrono::NaiveDateTime;

use crate::model::HistoryPoint;
use crate::model::history::DATE_FORMAT;
use crate::render::scale::{LinearScale, TimeScale};

pub const DEFAULT_TENSION: f64 = 0.7;

/// Ticks per axis.
pub const AXIS_TICKS: usize = 6;

const TICK_DATE_FORMAT: &str = "%m-%d %H:%M";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Series {
    Cancer,
    Sane,
}

impl Series {
    pub const STACK_ORDER: [Series; 2] = [Series::Cancer, Series::Sane];

    pub fn name(&self) -> &'static str {
        match self {
            Series::Cancer => "cancer",
            Series::Sane => "sane",
        }
    }

    fn value(&self, point: &HistoryPoint) -> f64 {
        match self {
            Series::Cancer => point.cancer,
            Series::Sane => point.sane(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub title: String,
    pub text: String,
}

/// One series value at one date, positioned at the top of its band.
#[derive(Debug, Clone, PartialEq)]
pub struct StackedPoint {
    pub series: Series,
    pub date: NaiveDateTime,
    /// Baseline of the band.
    pub y0: f64,
    /// Thickness of the band (the series value).
    pub y: f64,
    pub cx: f64,
    pub cy: f64,
    pub tooltip: Tooltip,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesArea {
    pub series: Series,
    /// SVG path data of the filled band.
    pub path: String,
}

/// Axis tick at `position` along its axis, in chart coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub position: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryChart {
    pub width: f64,
    pub height: f64,
    pub x: TimeScale,
    pub y: LinearScale,
    /// Bottom time axis.
    pub x_ticks: Vec<Tick>,
    /// Left message-count axis.
    pub y_ticks: Vec<Tick>,
    pub areas: Vec<SeriesArea>,
    pub points: Vec<StackedPoint>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum HistoryRender {
    NoData,
    Chart(HistoryChart),
}

#[derive(Debug, Clone)]
pub struct HistoryChartRenderer {
    pub width: f64,
    pub height: f64,
    pub tension: f64,
}

impl HistoryChartRenderer {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
            tension: DEFAULT_TENSION,
        }
    }

    pub fn render(&self, history: &[HistoryPoint]) -> HistoryRender {
        let mut history: Vec<&HistoryPoint> = history.iter().collect();
        history.sort_by_key(|p| p.date);

        let (Some(first), Some(last)) = (history.first(), history.last()) else {
            return HistoryRender::NoData;
        };

        let x = TimeScale::new((first.date, last.date), (0.0, self.width));

        let max_total = history
            .iter()
            .map(|p| p.total)
            .filter(|t| t.is_finite())
            .fold(0.0_f64, f64::max);
        let y_max = if max_total > 0.0 { max_total } else { 1.0 };
        let y = LinearScale::new((0.0, y_max), (self.height, 0.0));

        let mut areas = Vec::with_capacity(Series::STACK_ORDER.len());
        let mut points = Vec::with_capacity(history.len() * Series::STACK_ORDER.len());
        let mut baseline = vec![0.0_f64; history.len()];

        for series in Series::STACK_ORDER {
            let mut top = Vec::with_capacity(history.len());
            let mut bottom = Vec::with_capacity(history.len());

            for (point, y0) in history.iter().zip(baseline.iter_mut()) {
                let value = series.value(point);
                let cx = x.apply(point.date);
                let cy = y.apply(*y0 + value);

                top.push((cx, cy));
                bottom.push((cx, y.apply(*y0)));

                points.push(StackedPoint {
                    series,
                    date: point.date,
                    y0: *y0,
                    y: value,
                    cx,
                    cy,
                    tooltip: Tooltip {
                        title: point.date.format(DATE_FORMAT).to_string(),
                        text: format!("{} {} messages", value, series.name()),
                    },
                });

                *y0 += value;
            }

            areas.push(SeriesArea {
                series,
                path: area_path(&top, &bottom, self.tension),
            });
        }

        let x_ticks = x
            .ticks(AXIS_TICKS)
            .into_iter()
            .map(|date| Tick {
                position: x.apply(date),
                label: date.format(TICK_DATE_FORMAT).to_string(),
            })
            .collect();
        let y_ticks = y
            .ticks(AXIS_TICKS)
            .into_iter()
            .map(|value| Tick {
                position: y.apply(value),
                label: fmt(value),
            })
            .collect();

        HistoryRender::Chart(HistoryChart {
            width: self.width,
            height: self.height,
            x,
            y,
            x_ticks,
            y_ticks,
            areas,
            points,
        })
    }
}

/// Closed path following `top` left to right and `bottom` back.
fn area_path(top: &[(f64, f64)], bottom: &[(f64, f64)], tension: f64) -> String {
    let reversed: Vec<(f64, f64)> = bottom.iter().rev().copied().collect();
    let mut path = cardinal(top, tension, 'M');
    path.push_str(&cardinal(&reversed, tension, 'L'));
    path.push('Z');
    path
}

/// Cardinal spline through `points` as cubic Bézier segments. Fewer than three
/// points degrade to straight lines.
pub fn cardinal(points: &[(f64, f64)], tension: f64, start: char) -> String {
    let Some(&(x0, y0)) = points.first() else {
        return String::new();
    };
    let mut path = format!("{start}{},{}", fmt(x0), fmt(y0));

    if points.len() < 3 {
        for &(x, y) in &points[1..] {
            path.push_str(&format!("L{},{}", fmt(x), fmt(y)));
        }
        return path;
    }

    let a = (1.0 - tension) / 2.0;
    let n = points.len();
    let tangents: Vec<(f64, f64)> = (0..n)
        .map(|i| {
            let prev = points[i.saturating_sub(1)];
            let next = points[(i + 1).min(n - 1)];
            (a * (next.0 - prev.0), a * (next.1 - prev.1))
        })
        .collect();

    for i in 0..n - 1 {
        let (px, py) = points[i];
        let (qx, qy) = points[i + 1];
        let (tx, ty) = tangents[i];
        let (ux, uy) = tangents[i + 1];
        path.push_str(&format!(
            "C{},{},{},{},{},{}",
            fmt(px + tx),
            fmt(py + ty),
            fmt(qx - ux),
            fmt(qy - uy),
            fmt(qx),
            fmt(qy)
        ));
    }
    path
}

fn fmt(v: f64) -> String {
    let rounded = (v * 100.0).round() / 100.0;
    // avoid "-0"
    if rounded == 0.0 {
        "0".to_string()
    } else {
        rounded.to_string()
    }
}
