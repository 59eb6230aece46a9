//! The `dashboard` module wires the feed into the store and re-renders the
//! terminal leaderboards every time a watched topic changes.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::api::{ApiClient, SingleFlight, spawn_poller};
use crate::client::Connection;
use crate::config::{FeedSettings, RenderSettings};
use crate::model::{ChannelRecord, LeaderboardEntry, Payload, Topic};
use crate::render::text::bars_to_text;
use crate::render::{BarChart, BarRender, Field};
use crate::store::{SharedStore, TopicValue, ViewModelStore, bind};

/// Renders the live channel list of `value` into `chart`. An absent topic
/// keeps the previous render, an emptied one shows the placeholder.
pub fn render_live<'a>(value: &TopicValue, chart: &'a mut BarChart) -> &'a BarRender {
    match value {
        TopicValue::Absent => chart.render::<ChannelRecord>(None),
        TopicValue::Empty => chart.render::<ChannelRecord>(Some(&[])),
        TopicValue::Present(payload) => match payload.as_live() {
            Some(records) => chart.render(Some(records)),
            None => chart.render::<ChannelRecord>(None),
        },
    }
}

/// Renders one `metric`/`interval` board of a leaderboards value.
pub fn render_leaderboard<'a>(
    value: &TopicValue,
    metric: &str,
    interval: &str,
    chart: &'a mut BarChart,
) -> &'a BarRender {
    match value.payload().and_then(Payload::as_leaderboards) {
        Some(boards) => chart.render(Some(boards.get(metric, interval).unwrap_or(&[]))),
        None if matches!(value, TopicValue::Empty) => chart.render::<LeaderboardEntry>(Some(&[])),
        None => chart.render::<LeaderboardEntry>(None),
    }
}

/// Which leaderboard the dashboard shows next to the live list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSelection {
    pub metric: String,
    pub interval: String,
}

impl Default for BoardSelection {
    fn default() -> Self {
        Self {
            metric: "cancer".to_string(),
            interval: "minute".to_string(),
        }
    }
}

pub struct Dashboard {
    connection: Connection,
    store: SharedStore,
    live_chart: BarChart,
    board_chart: BarChart,
    board: BoardSelection,
    live_changes: UnboundedReceiver<TopicValue>,
    board_changes: UnboundedReceiver<TopicValue>,
    tasks: Vec<JoinHandle<()>>,
}

impl Dashboard {
    pub fn new(feed: &FeedSettings, render: &RenderSettings, board: BoardSelection) -> Self {
        let connection = Connection::new(feed.url.clone()).with_reconnect(feed.reconnect_policy());
        let store = ViewModelStore::shared();
        bind(&store, &connection);

        let (live_changes, board_changes) = {
            let mut guard = store.lock().unwrap_or_else(|p| p.into_inner());
            (guard.watch(&Topic::live()), guard.watch(&Topic::leaderboards()))
        };

        for topic in &feed.topics {
            connection.subscribe(Topic::new(topic.clone()));
        }

        Self {
            connection,
            store,
            live_chart: BarChart::with_top_n(Field::Cancer, render.top_n),
            board_chart: BarChart::with_top_n(Field::Value, render.top_n),
            board,
            live_changes,
            board_changes,
            tasks: Vec::new(),
        }
    }

    /// Opens the push feed.
    pub fn start_feed(&mut self) {
        info!("dashboard connecting to {}", self.connection.url());
        self.tasks.push(self.connection.connect());
    }

    /// Polls `/live` and `/leaderboards` every `every` instead of, or next to,
    /// the push feed.
    pub fn start_polling(&mut self, api: ApiClient, every: Duration) {
        let flights = Arc::new(SingleFlight::new());
        info!("dashboard polling every {}s", every.as_secs());

        let live_api = api.clone();
        self.tasks.push(spawn_poller(
            Topic::live(),
            self.store.clone(),
            every,
            flights.clone(),
            move || {
                let api = live_api.clone();
                async move { api.live().await.map(Payload::Live) }
            },
        ));
        self.tasks.push(spawn_poller(
            Topic::leaderboards(),
            self.store.clone(),
            every,
            flights,
            move || {
                let api = api.clone();
                async move { api.leaderboards().await.map(Payload::Leaderboards) }
            },
        ));
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    /// Current terminal frame: the live list followed by the selected board.
    pub fn frame(&mut self) -> String {
        let (live, boards) = {
            let store = self.store.lock().unwrap_or_else(|p| p.into_inner());
            (store.get(&Topic::live()), store.get(&Topic::leaderboards()))
        };

        let mut out = bars_to_text("live", render_live(&live, &mut self.live_chart));
        let title = format!("{} per {}", self.board.metric, self.board.interval);
        out.push_str(&bars_to_text(
            &title,
            render_leaderboard(&boards, &self.board.metric, &self.board.interval, &mut self.board_chart),
        ));
        out
    }

    /// Emits a frame on every change of the live or leaderboards topic until
    /// `shutdown` resolves, then stops the feed and every poller.
    pub async fn run_until<S, F>(mut self, shutdown: S, mut sink: F)
    where
        S: Future<Output = ()>,
        F: FnMut(String),
    {
        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                Some(_) = self.live_changes.recv() => debug!("live changed"),
                Some(_) = self.board_changes.recv() => debug!("leaderboards changed"),
                else => break,
            }
            sink(self.frame());
        }

        self.connection.close();
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests;
