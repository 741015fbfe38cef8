use std::{sync::Arc, time::Duration};

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use countdown_bell::{
    create_router,
    services::{Endpoints, Notifier},
    state::{AppState, NotificationService, SettingsStore},
};
use serde_json::{json, Value};
use tower::ServiceExt;

struct TestApp {
    router: Router,
    state: Arc<AppState>,
    dir: tempfile::TempDir,
}

impl TestApp {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let settings = SettingsStore::open(dir.path().join("settings.json"));
        // Nothing listens on the discard port; no test here expects delivery
        let notifier = Notifier::new(Endpoints {
            bark_base: "http://127.0.0.1:9".into(),
            serverchan_base: "http://127.0.0.1:9/{id}".into(),
        });
        let state = Arc::new(AppState::new(0, "127.0.0.1".into(), settings, notifier, false));
        Self {
            router: create_router(Arc::clone(&state)),
            state,
            dir,
        }
    }

    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);
        let body = match body {
            Some(b) => {
                builder = builder.header("content-type", "application/json");
                Body::from(b.to_string())
            }
            None => Body::empty(),
        };
        let resp = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    async fn request_expect(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        expected: StatusCode,
    ) -> Value {
        let (status, value) = self.request(method, path, body).await;
        assert_eq!(status, expected, "{method} {path} returned {status:?} with body {value:?}");
        value
    }
}

#[tokio::test]
async fn duration_entry_is_clamped() {
    let app = TestApp::new();
    let body = app
        .request_expect(
            "POST",
            "/timer/duration",
            Some(json!({"hours": 30, "minutes": 5})),
            StatusCode::OK,
        )
        .await;
    assert_eq!(body["timer"]["display"], "23:05:00");
    assert_eq!(body["timer"]["title"], "Countdown Timer");
    assert_eq!(body["timer"]["phase"], "stopped");
    assert_eq!(body["timer"]["configured"]["hours"], 23);
}

#[tokio::test(start_paused = true)]
async fn start_stop_reset_flow() {
    let app = TestApp::new();
    app.request_expect("POST", "/timer/duration", Some(json!({"seconds": 10})), StatusCode::OK)
        .await;
    let started = app.request_expect("POST", "/timer/start", None, StatusCode::OK).await;
    assert_eq!(started["timer"]["is_running"], true);
    assert_eq!(started["timer"]["running_overlay"], true);

    tokio::time::sleep(Duration::from_millis(2500)).await;

    let status = app.request_expect("GET", "/status", None, StatusCode::OK).await;
    assert_eq!(status["timer"]["remaining_seconds"], 8);
    assert_eq!(status["timer"]["title"], "00:00:08");
    assert_eq!(status["last_action"], "start");

    let stopped = app.request_expect("POST", "/timer/stop", None, StatusCode::OK).await;
    assert_eq!(stopped["timer"]["remaining_seconds"], 8);
    assert_eq!(stopped["timer"]["title"], "Countdown Timer");

    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(app.state.get_countdown_state().unwrap().remaining_seconds, 8);

    let reset = app.request_expect("POST", "/timer/reset", None, StatusCode::OK).await;
    assert_eq!(reset["timer"]["remaining_seconds"], 10);
    assert_eq!(reset["timer"]["display"], "00:00:10");
}

#[tokio::test]
async fn starting_without_time_is_rejected() {
    let app = TestApp::new();
    let body = app.request_expect("POST", "/timer/start", None, StatusCode::CONFLICT).await;
    assert!(body["error"].as_str().unwrap().contains("no time remaining"));
}

#[tokio::test]
async fn presets_can_be_listed_and_applied() {
    let app = TestApp::new();
    let presets = app.request_expect("GET", "/timer/presets", None, StatusCode::OK).await;
    let labels: Vec<&str> = presets
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["label"].as_str().unwrap())
        .collect();
    assert_eq!(labels, vec!["4:00", "5:00", "9:30", "10:00"]);

    let applied = app
        .request_expect("POST", "/timer/presets/9:30", None, StatusCode::OK)
        .await;
    assert_eq!(applied["timer"]["display"], "09:30:00");

    app.request_expect("POST", "/timer/presets/7:15", None, StatusCode::NOT_FOUND)
        .await;
}

#[tokio::test]
async fn settings_are_persisted_on_every_change() {
    let app = TestApp::new();
    let initial = app.request_expect("GET", "/settings", None, StatusCode::OK).await;
    assert_eq!(initial["service"], "none");

    let saved = app
        .request_expect(
            "PUT",
            "/settings",
            Some(json!({"service": "bark", "barkKey": "k1"})),
            StatusCode::OK,
        )
        .await;
    assert_eq!(saved["barkKey"], "k1");

    let reopened = SettingsStore::open(app.dir.path().join("settings.json"));
    assert_eq!(reopened.current().service, NotificationService::Bark);
    assert_eq!(reopened.current().bark_key.as_deref(), Some("k1"));

    let status = app.request_expect("GET", "/status", None, StatusCode::OK).await;
    assert_eq!(status["notification_service"], "bark");
}

#[tokio::test]
async fn test_notification_reports_outcome() {
    let app = TestApp::new();
    let skipped = app
        .request_expect("POST", "/settings/test", Some(json!({"service": "none"})), StatusCode::OK)
        .await;
    assert_eq!(skipped["outcome"], "skipped");

    let failed = app
        .request_expect("POST", "/settings/test", Some(json!({"service": "serverchan"})), StatusCode::OK)
        .await;
    assert_eq!(failed["outcome"], "failed");
    assert_eq!(failed["service"], "serverchan");
}

#[tokio::test]
async fn health_reports_ok() {
    let app = TestApp::new();
    let body = app.request_expect("GET", "/health", None, StatusCode::OK).await;
    assert_eq!(body["status"], "ok");
}
