//! Terminal rendering of bar leaderboards.

use crate::render::bars::{BarRender, MAX_WIDTH};

/// Width in cells of a full-width bar.
pub const BAR_CELLS: usize = 40;

pub fn bars_to_text(title: &str, render: &BarRender) -> String {
    let mut out = format!("== {title} ==\n");
    match render {
        BarRender::Loading => out.push_str("  loading...\n"),
        BarRender::NoData => out.push_str("  no data\n"),
        BarRender::Bars(bars) => {
            let label_width = bars.iter().map(|b| b.label.chars().count()).max().unwrap_or(0);
            for (rank, bar) in bars.iter().enumerate() {
                let cells = (bar.width / MAX_WIDTH * BAR_CELLS as f64).round() as usize;
                out.push_str(&format!(
                    "{:>2}. {:<label_width$} {}\n",
                    rank + 1,
                    bar.label,
                    "█".repeat(cells.max(1)),
                ));
            }
        }
    }
    out
}
