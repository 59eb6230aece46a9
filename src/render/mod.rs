//! The `render` module turns store data into render models.
//!
//! Renderers are pure functions of their input: `bars` lays out ranked
//! leaderboards and `history` builds stacked-area charts. `svg` and `text`
//! serialize those models for a browser or a terminal.

pub mod bars;
pub mod history;
pub mod scale;
pub mod svg;
pub mod text;

pub use bars::{Bar, BarChart, BarRender, Field, Ranked, layout_bars};
pub use history::{HistoryChart, HistoryChartRenderer, HistoryRender, Series, Tick};
pub use scale::{LinearScale, TimeScale};
