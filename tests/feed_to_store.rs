//! End-to-end: a local feed pushes frames into a bound store, and the bar
//! renderer ranks what the store holds.

use std::time::Duration;

use cancerboard::client::Connection;
use cancerboard::model::{ChannelRecord, Payload, Topic};
use cancerboard::render::{BarChart, BarRender, Field};
use cancerboard::store::{TopicValue, ViewModelStore, bind};
use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio_tungstenite::accept_async;
use tungstenite::protocol::Message as WsMessage;

const WAIT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn integration_feed_to_store_to_bars() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}", listener.local_addr().unwrap());
    let (hang_up, hung_up) = oneshot::channel::<()>();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();
        for _ in 0..2 {
            ws.next().await.unwrap().unwrap();
        }

        let frames = [
            "not json".to_string(),
            json!({"topic": "twitchcancer.live", "data": [
                {"channel": "a", "cancer": 5, "messages": 10},
                {"channel": "b", "cancer": 8, "messages": 0},
            ]})
            .to_string(),
            json!({"topic": "twitchcancer.leaderboards", "data": {
                "cancer": {"minute": [{"channel": "a", "value": "5"}]}
            }})
            .to_string(),
        ];
        for frame in frames {
            ws.send(WsMessage::text(frame)).await.unwrap();
        }

        hung_up.await.ok();
        ws.close(None).await.ok();
    });

    let connection = Connection::new(url);
    let store = ViewModelStore::shared();
    bind(&store, &connection);
    let mut boards = store.lock().unwrap().watch(&Topic::leaderboards());
    let mut live = store.lock().unwrap().watch(&Topic::live());

    connection.subscribe(Topic::live());
    connection.subscribe(Topic::leaderboards());
    let task = connection.connect();

    let value = tokio::time::timeout(WAIT, boards.recv()).await.unwrap().unwrap();
    assert!(matches!(value, TopicValue::Present(Payload::Leaderboards(_))));

    let value = tokio::time::timeout(WAIT, live.recv()).await.unwrap().unwrap();
    let records = value.payload().and_then(Payload::as_live).unwrap().to_vec();
    assert_eq!(records[0].cpm(), 0.5);
    assert_eq!(records[1].cpm(), 0.0);

    let mut chart = BarChart::new(Field::Cancer);
    let render = chart.render(Some(records.as_slice()));
    let ranked: Vec<(&str, f64)> = render
        .bars()
        .iter()
        .map(|bar| (bar.channel.as_str(), bar.width))
        .collect();
    assert_eq!(ranked, vec![("b", 99.0), ("a", 0.0)]);

    // a close empties every subscribed topic
    hang_up.send(()).unwrap();
    tokio::time::timeout(WAIT, task).await.unwrap().unwrap();

    let store = store.lock().unwrap();
    assert_eq!(store.get(&Topic::live()), TopicValue::Empty);
    assert_eq!(store.get(&Topic::leaderboards()), TopicValue::Empty);
    drop(store);

    let nothing: &[ChannelRecord] = &[];
    assert_eq!(chart.render(Some(nothing)), &BarRender::NoData);
}
