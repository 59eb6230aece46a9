use super::history::parse_timestamp;
use super::payload::decode_live;
use super::*;
use chrono::NaiveDate;
use serde_json::json;

#[test]
fn test_topic_kinds() {
    assert_eq!(Topic::live().kind(), Some(TopicKind::Live));
    assert_eq!(Topic::leaderboards().kind(), Some(TopicKind::Leaderboards));
    assert_eq!(
        Topic::new("twitchcancer.leaderboards.monthly").kind(),
        Some(TopicKind::Leaderboards)
    );
    assert_eq!(
        Topic::new("twitchcancer.leaderboard.daily.cancer.minute").kind(),
        Some(TopicKind::Leaderboard)
    );
    assert_eq!(Topic::new("twitchcancer.status").kind(), Some(TopicKind::Status));
    assert_eq!(Topic::channel("#forsenlol").kind(), Some(TopicKind::Channel));
    assert_eq!(Topic::new("twitchcancer.channel.").kind(), None);
    assert_eq!(Topic::new("something.else").kind(), None);
}

#[test]
fn test_topic_argument() {
    assert_eq!(Topic::channel("#forsenlol").argument(), Some("forsenlol"));
    assert_eq!(
        Topic::new("twitchcancer.leaderboards.daily").argument(),
        Some("daily")
    );
    assert_eq!(Topic::live().argument(), None);
}

#[test]
fn test_cpm_is_rounded_to_two_decimals() {
    assert_eq!(ChannelRecord::new("a", 1.0, 3.0).cpm(), 0.33);
    assert_eq!(ChannelRecord::new("a", 2.0, 3.0).cpm(), 0.67);
    assert_eq!(ChannelRecord::new("a", 5.0, 10.0).cpm(), 0.5);
    assert_eq!(ChannelRecord::new("a", 5.0, 0.0).cpm(), 0.0);
}

#[test]
fn test_cpm_follows_raw_fields() {
    let mut record = ChannelRecord::new("a", 5.0, 10.0);
    assert_eq!(record.cpm(), 0.5);
    record.cancer = 8.0;
    assert_eq!(record.cpm(), 0.8);
}

#[test]
fn test_transported_cpm_is_ignored() {
    let records = decode_live(json!([
        {"channel": "a", "cancer": 1, "messages": 4, "cpm": 99.0}
    ]))
    .unwrap();
    assert_eq!(records[0].cpm(), 0.25);
}

#[test]
fn test_decode_live_bare_and_wrapped() {
    let bare = decode_live(json!([{"channel": "a", "cancer": 5, "messages": 10}])).unwrap();
    let wrapped = decode_live(json!({
        "channels": [{"channel": "a", "cancer": 5, "messages": 10}]
    }))
    .unwrap();
    assert_eq!(bare, wrapped);
    assert_eq!(bare[0], ChannelRecord::new("a", 5.0, 10.0));
}

#[test]
fn test_leaderboard_values_accept_strings_and_numbers() {
    let payload = Payload::decode(
        &Topic::leaderboards(),
        json!({
            "cancer": {
                "minute": [
                    {"channel": "#a", "date": "2015-05-01 20:01:00", "value": "42"},
                    {"channel": "#b", "value": 12.5}
                ]
            }
        }),
    )
    .unwrap();

    let boards = payload.as_leaderboards().unwrap();
    let minute = boards.get("cancer", "minute").unwrap();
    assert_eq!(minute[0].value, 42.0);
    assert_eq!(minute[0].date.as_deref(), Some("2015-05-01 20:01:00"));
    assert_eq!(minute[1].value, 12.5);
    assert!(boards.get("cancer", "total").is_none());
    assert_eq!(boards.metrics().collect::<Vec<_>>(), vec!["cancer"]);
}

#[test]
fn test_payload_shape_mismatch_is_a_parse_error() {
    let err = Payload::decode(&Topic::live(), json!({"oops": true})).unwrap_err();
    assert!(matches!(err, crate::utils::DashboardError::Parse(_)));
}

#[test]
fn test_unknown_topic_is_a_parse_error() {
    assert!(Payload::decode(&Topic::new("nope"), json!([])).is_err());
}

#[test]
fn test_raw_topics_keep_their_data() {
    let data = json!({"channel": "#a", "minute": {"cancer": 3}});
    let payload = Payload::decode(&Topic::channel("a"), data.clone()).unwrap();
    assert_eq!(payload, Payload::Raw(data));
}

#[test]
fn test_parse_history_orders_and_derives_sane() {
    let body = json!({
        "history": [
            {"2015-05-01 20:02:00": {"cancer": 10, "total": 30}},
            {"2015-05-01 20:01:00": {"cancer": 4, "total": 12}}
        ]
    });
    let points = parse_history(&body).unwrap();
    assert_eq!(points.len(), 2);
    assert!(points[0].date < points[1].date);
    assert_eq!(points[0].sane(), 8.0);
    for p in &points {
        assert_eq!(p.sane() + p.cancer, p.total);
    }
}

#[test]
fn test_parse_history_rejects_bad_timestamp() {
    let body = json!({"history": [{"yesterday": {"cancer": 1, "total": 2}}]});
    assert!(parse_history(&body).is_err());
}

#[test]
fn test_parse_timestamp_formats() {
    let expected = NaiveDate::from_ymd_opt(2015, 5, 1)
        .unwrap()
        .and_hms_opt(20, 1, 0)
        .unwrap();
    assert_eq!(parse_timestamp("2015-05-01 20:01:00").unwrap(), expected);
    assert_eq!(parse_timestamp("2015-05-01T20:01:00").unwrap(), expected);
    assert_eq!(parse_timestamp("2015-05-01T20:01:00+00:00").unwrap(), expected);
}

#[test]
fn test_empty_history() {
    let points = parse_history(&json!({"history": []})).unwrap();
    assert!(points.is_empty());
}

#[test]
fn test_channel_key_normalizes() {
    assert_eq!(channel_key("#ForsenLoL "), "forsenlol");
    assert_eq!(channel_key("lirik"), "lirik");
}

#[test]
fn test_profile_ignores_unknown_fields() {
    let profile: Profile = serde_json::from_value(json!({
        "display_name": "Forsen",
        "followers": 12,
        "_links": {"self": "x"}
    }))
    .unwrap();
    assert_eq!(profile.display_name.as_deref(), Some("Forsen"));
    assert_eq!(profile.followers, Some(12));
    assert!(profile.logo.is_none());
}
