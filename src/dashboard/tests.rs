use super::*;
use crate::config::Settings;
use crate::model::{ChannelRecord, LeaderboardEntry, Leaderboards};
use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use std::collections::BTreeMap;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::accept_async;
use tungstenite::protocol::Message as WsMessage;

const WAIT: Duration = Duration::from_secs(5);

fn live(records: &[(&str, f64, f64)]) -> TopicValue {
    TopicValue::Present(Payload::Live(
        records
            .iter()
            .map(|(c, cancer, messages)| ChannelRecord::new(*c, *cancer, *messages))
            .collect(),
    ))
}

fn boards(entries: &[(&str, f64)]) -> TopicValue {
    let rows = entries
        .iter()
        .map(|(channel, value)| LeaderboardEntry {
            channel: channel.to_string(),
            date: None,
            value: *value,
        })
        .collect();
    let mut intervals = BTreeMap::new();
    intervals.insert("minute".to_string(), rows);
    let mut metrics = BTreeMap::new();
    metrics.insert("cancer".to_string(), intervals);
    TopicValue::Present(Payload::Leaderboards(Leaderboards(metrics)))
}

fn channels(render: &BarRender) -> Vec<&str> {
    render.bars().iter().map(|b| b.channel.as_str()).collect()
}

#[test]
fn test_absent_live_keeps_loading() {
    let mut chart = BarChart::new(Field::Cancer);
    assert_eq!(render_live(&TopicValue::Absent, &mut chart), &BarRender::Loading);
}

#[test]
fn test_live_is_ranked_by_cancer() {
    let mut chart = BarChart::new(Field::Cancer);
    let render = render_live(&live(&[("a", 5.0, 10.0), ("b", 8.0, 10.0)]), &mut chart);
    assert_eq!(channels(render), vec!["b", "a"]);
}

#[test]
fn test_absent_after_data_keeps_previous_render() {
    let mut chart = BarChart::new(Field::Cancer);
    render_live(&live(&[("a", 5.0, 10.0)]), &mut chart);
    let render = render_live(&TopicValue::Absent, &mut chart);
    assert_eq!(channels(render), vec!["a"]);
}

#[test]
fn test_emptied_live_shows_placeholder() {
    let mut chart = BarChart::new(Field::Cancer);
    render_live(&live(&[("a", 5.0, 10.0)]), &mut chart);
    assert_eq!(render_live(&TopicValue::Empty, &mut chart), &BarRender::NoData);
}

#[test]
fn test_leaderboard_board_selection() {
    let mut chart = BarChart::new(Field::Value);
    let value = boards(&[("a", 1.0), ("b", 3.0), ("c", 2.0)]);

    let render = render_leaderboard(&value, "cancer", "minute", &mut chart);
    assert_eq!(channels(render), vec!["b", "c", "a"]);

    let render = render_leaderboard(&value, "cpm", "total", &mut chart);
    assert_eq!(render, &BarRender::NoData);
}

#[test]
fn test_leaderboard_of_emptied_topic() {
    let mut chart = BarChart::new(Field::Value);
    assert_eq!(
        render_leaderboard(&TopicValue::Absent, "cancer", "minute", &mut chart),
        &BarRender::Loading
    );
    assert_eq!(
        render_leaderboard(&TopicValue::Empty, "cancer", "minute", &mut chart),
        &BarRender::NoData
    );
}

#[test]
fn test_frame_before_any_data() {
    let settings = Settings::default();
    let mut dashboard = Dashboard::new(&settings.feed, &settings.render, BoardSelection::default());

    let frame = dashboard.frame();
    assert!(frame.contains("== live =="));
    assert!(frame.contains("== cancer per minute =="));
    assert_eq!(frame.matches("loading...").count(), 2);
    assert_eq!(dashboard.connection().subscriptions().len(), 2);
}

#[tokio::test]
async fn test_dashboard_renders_pushed_live_data() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let mut settings = Settings::default();
    settings.feed.url = format!("ws://{}", listener.local_addr().unwrap());

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();
        // both declared subscriptions arrive before any data is pushed
        for _ in 0..2 {
            ws.next().await.unwrap().unwrap();
        }
        let frame = json!({
            "topic": "twitchcancer.live",
            "data": [{"channel": "#forsen", "cancer": 30, "messages": 40}],
        });
        ws.send(WsMessage::text(frame.to_string())).await.unwrap();
        while let Some(Ok(_)) = ws.next().await {}
    });

    let mut dashboard = Dashboard::new(&settings.feed, &settings.render, BoardSelection::default());
    dashboard.start_feed();
    let (frames_tx, mut frames) = mpsc::unbounded_channel();
    let (stop, stopped) = oneshot::channel::<()>();
    let run = tokio::spawn(dashboard.run_until(
        async move {
            stopped.await.ok();
        },
        move |frame| {
            let _ = frames_tx.send(frame);
        },
    ));

    let frame = tokio::time::timeout(WAIT, frames.recv()).await.unwrap().unwrap();
    assert!(frame.contains("#forsen"));

    stop.send(()).unwrap();
    tokio::time::timeout(WAIT, run).await.unwrap().unwrap();
}

#[tokio::test]
async fn test_dashboard_renders_polled_data() {
    use axum::Router;
    use axum::routing::get;

    let app = Router::new()
        .route(
            "/live",
            get(|| async {
                axum::Json(json!({"channels": [{"channel": "#lirik", "cancer": 3, "messages": 9}]}))
            }),
        )
        .route(
            "/leaderboards",
            get(|| async {
                axum::Json(json!({"cancer": {"minute": [{"channel": "#lirik", "value": 3}]}}))
            }),
        );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let settings = Settings::default();
    let mut dashboard = Dashboard::new(&settings.feed, &settings.render, BoardSelection::default());
    let api = crate::api::ApiClient::with_urls(&url, &url).unwrap();
    dashboard.start_polling(api, Duration::from_secs(60));

    let (frames_tx, mut frames) = mpsc::unbounded_channel();
    let (stop, stopped) = oneshot::channel::<()>();
    let run = tokio::spawn(dashboard.run_until(
        async move {
            stopped.await.ok();
        },
        move |frame| {
            let _ = frames_tx.send(frame);
        },
    ));

    // one frame per polled topic
    let mut last = String::new();
    for _ in 0..2 {
        last = tokio::time::timeout(WAIT, frames.recv()).await.unwrap().unwrap();
    }
    assert_eq!(last.matches("#lirik").count(), 2);

    stop.send(()).unwrap();
    tokio::time::timeout(WAIT, run).await.unwrap().unwrap();
}
