use super::load_config;
use super::settings::Settings;
use crate::client::ReconnectPolicy;
use serial_test::serial;
use std::env;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_default_settings() {
    let settings = Settings::default();
    assert_eq!(settings.feed.url, "ws://127.0.0.1:3569");
    assert_eq!(
        settings.feed.topics,
        vec!["twitchcancer.live", "twitchcancer.leaderboards"]
    );
    assert_eq!(settings.api.base_url, "http://127.0.0.1:8080");
    assert_eq!(
        settings.api.request_timeout(),
        Some(Duration::from_millis(10_000))
    );
    assert_eq!(settings.render.top_n, 10);
    assert_eq!(settings.profiles.ttl_secs, 3600);
    assert!(settings.profiles.db_path.is_none());
}

#[test]
fn test_reconnect_policy_mapping() {
    let mut settings = Settings::default();
    assert_eq!(settings.feed.reconnect_policy(), ReconnectPolicy::None);

    settings.feed.reconnect = "fixed".to_string();
    assert_eq!(
        settings.feed.reconnect_policy(),
        ReconnectPolicy::FixedDelay(Duration::from_millis(1000))
    );

    settings.feed.reconnect = "backoff".to_string();
    assert_eq!(
        settings.feed.reconnect_policy(),
        ReconnectPolicy::Backoff {
            initial: Duration::from_millis(1000),
            max: Duration::from_millis(30_000),
        }
    );

    settings.feed.reconnect = "sometimes".to_string();
    assert_eq!(settings.feed.reconnect_policy(), ReconnectPolicy::None);
}

#[test]
fn test_zero_ttl_never_expires() {
    let mut settings = Settings::default();
    settings.profiles.ttl_secs = 0;
    assert!(settings.profiles.ttl().is_none());
}

#[test]
fn test_zero_request_timeout_disables_it() {
    let mut settings = Settings::default();
    settings.api.request_timeout_ms = 0;
    assert!(settings.api.request_timeout().is_none());
}

#[test]
#[serial]
fn load_config_from_env_overrides_defaults() {
    temp_env::with_vars(
        [
            ("CANCERBOARD_FEED__URL", Some("ws://feed.example:9000")),
            ("CANCERBOARD_RENDER__TOP_N", Some("5")),
            ("CANCERBOARD_FEED__TOPICS", Some("twitchcancer.live,twitchcancer.status")),
        ],
        || {
            let cfg = load_config().expect("load_config failed");
            assert_eq!(cfg.feed.url, "ws://feed.example:9000");
            assert_eq!(cfg.render.top_n, 5);
            assert_eq!(
                cfg.feed.topics,
                vec!["twitchcancer.live", "twitchcancer.status"]
            );
            assert_eq!(cfg.api.base_url, "http://127.0.0.1:8080");
        },
    );
}

#[test]
#[serial]
fn load_config_from_file_overrides_defaults() {
    let tmp = TempDir::new().expect("create tempdir");
    let orig = env::current_dir().expect("current_dir");
    env::set_current_dir(tmp.path()).expect("set current dir");

    fs::create_dir_all("config").expect("create config dir");
    let toml = r#"
        [feed]
        url = "wss://cancer.example/ws"
        reconnect = "backoff"

        [api]
        base_url = "https://cancer.example"
        request_timeout_ms = 2500

        [profiles]
        ttl_secs = 60
        db_path = "profiles_db"
    "#;
    fs::write("config/default.toml", toml).expect("write config file");

    let cfg = load_config();

    env::set_current_dir(orig).expect("restore cwd");

    let cfg = cfg.expect("load_config failed");
    assert_eq!(cfg.feed.url, "wss://cancer.example/ws");
    assert_eq!(cfg.feed.reconnect, "backoff");
    assert_eq!(cfg.api.base_url, "https://cancer.example");
    assert_eq!(cfg.api.twitch_url, "https://api.twitch.tv/kraken");
    assert_eq!(cfg.api.request_timeout_ms, 2500);
    assert_eq!(cfg.profiles.ttl_secs, 60);
    assert_eq!(cfg.profiles.db_path.as_deref(), Some("profiles_db"));
}
