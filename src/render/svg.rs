//! SVG serialization of render models.

use std::fmt::Write;

use crate::render::bars::BarRender;
use crate::render::history::{HistoryRender, Series};

/// Outer margins around the history plot area: top, right, bottom, left.
pub const MARGIN: (f64, f64, f64, f64) = (20.0, 20.0, 30.0, 50.0);

const BAR_HEIGHT: f64 = 24.0;
const BAR_GAP: f64 = 4.0;

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn placeholder(width: f64, height: f64, class: &str, text: &str) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}"><text class="{class}" x="{}" y="{}" text-anchor="middle">{}</text></svg>"#,
        width / 2.0,
        height / 2.0,
        escape(text)
    )
}

/// Bars as horizontal rectangles whose width is a percentage of `width`.
pub fn bars_to_svg(render: &BarRender, width: f64) -> String {
    let bars = match render {
        BarRender::Loading => return placeholder(width, BAR_HEIGHT, "loading", "Loading"),
        BarRender::NoData => return placeholder(width, BAR_HEIGHT, "no-data", "No data"),
        BarRender::Bars(bars) => bars,
    };

    let height = bars.len() as f64 * (BAR_HEIGHT + BAR_GAP);
    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" class="chart" width="{width}" height="{height}">"#
    );
    for (i, bar) in bars.iter().enumerate() {
        let y = i as f64 * (BAR_HEIGHT + BAR_GAP);
        let w = bar.width / 100.0 * width;
        let _ = write!(
            svg,
            r#"<g class="bar"><rect x="0" y="{y}" width="{w}" height="{BAR_HEIGHT}"/><text x="4" y="{}">{}</text></g>"#,
            y + BAR_HEIGHT * 0.7,
            escape(&bar.label)
        );
    }
    svg.push_str("</svg>");
    svg
}

/// Stacked areas plus one circle per point, each with a `<title>` tooltip.
pub fn history_to_svg(render: &HistoryRender, title: &str) -> String {
    let (top, right, bottom, left) = MARGIN;

    let chart = match render {
        HistoryRender::NoData => return placeholder(400.0, 100.0, "no-data", "No data"),
        HistoryRender::Chart(chart) => chart,
    };

    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}"><g transform="translate({left},{top})">"#,
        chart.width + left + right,
        chart.height + top + bottom,
    );
    let _ = write!(
        svg,
        r#"<text class="title" x="{}" y="10" text-anchor="middle">{}</text>"#,
        chart.width / 2.0,
        escape(title)
    );

    let _ = write!(
        svg,
        r#"<g class="x axis" transform="translate(0,{})"><path class="domain" d="M0,0H{}"/>"#,
        chart.height, chart.width
    );
    for tick in &chart.x_ticks {
        let _ = write!(
            svg,
            r#"<g class="tick" transform="translate({},0)"><line y2="6"/><text y="9" dy=".71em" text-anchor="middle">{}</text></g>"#,
            tick.position,
            escape(&tick.label)
        );
    }
    svg.push_str("</g>");

    let _ = write!(
        svg,
        r#"<g class="y axis"><path class="domain" d="M0,0V{}"/>"#,
        chart.height
    );
    for tick in &chart.y_ticks {
        let _ = write!(
            svg,
            r#"<g class="tick" transform="translate(0,{})"><line x2="-6"/><text x="-9" dy=".32em" text-anchor="end">{}</text></g>"#,
            tick.position,
            escape(&tick.label)
        );
    }
    svg.push_str(
        r#"<text transform="rotate(-90)" y="10" dy=".71em" style="text-anchor: end">Messages</text></g>"#,
    );

    for area in &chart.areas {
        let _ = write!(
            svg,
            r#"<g class="series"><path class="{}" d="{}"/></g>"#,
            area.series.name(),
            area.path
        );
    }

    for series in Series::STACK_ORDER {
        svg.push_str(r#"<g class="seriesPoints">"#);
        for point in chart.points.iter().filter(|p| p.series == series) {
            let _ = write!(
                svg,
                r#"<circle class="point {}" cx="{}" cy="{}" r="8"><title>{}&#10;{}</title></circle>"#,
                series.name(),
                point.cx,
                point.cy,
                escape(&point.tooltip.title),
                escape(&point.tooltip.text)
            );
        }
        svg.push_str("</g>");
    }

    svg.push_str("</g></svg>");
    svg
}
