use super::DashboardError;
use super::logging;

#[test]
fn logging_init_accepts_levels() {
    logging::init("info");
    logging::init("debug");
    logging::init("bogus");
}

#[test]
fn json_errors_become_parse_errors() {
    let err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
    let err: DashboardError = err.into();
    assert!(matches!(err, DashboardError::Parse(_)));
}

#[test]
fn http_error_display_names_status_and_url() {
    let err = DashboardError::Http {
        status: 404,
        url: "http://localhost/history/x".to_string(),
    };
    assert_eq!(err.to_string(), "http 404 for http://localhost/history/x");
}
