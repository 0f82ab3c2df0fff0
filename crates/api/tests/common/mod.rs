#![allow(dead_code)]

use std::net::SocketAddr;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Method, Request, Response};
use axum::Router;
use clicklog_core::error::SinkError;
use clicklog_core::sink::VisitSink;
use clicklog_core::visit::VisitRecord;
use http_body_util::BodyExt;
use tower::ServiceExt;
use tracing_subscriber::fmt::MakeWriter;

use clicklog_api::config::{ServerConfig, SheetsConfig};
use clicklog_api::router::build_app_router;
use clicklog_api::state::AppState;

/// Sink that keeps every appended record in memory.
#[derive(Default)]
pub struct RecordingSink {
    records: Mutex<Vec<VisitRecord>>,
}

impl RecordingSink {
    pub fn records(&self) -> Vec<VisitRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl VisitSink for RecordingSink {
    async fn append(&self, record: &VisitRecord) -> Result<(), SinkError> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

/// Sink that fails every append, counting the attempts.
#[derive(Default)]
pub struct FailingSink {
    attempts: Mutex<usize>,
}

impl FailingSink {
    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }
}

#[async_trait]
impl VisitSink for FailingSink {
    async fn append(&self, _record: &VisitRecord) -> Result<(), SinkError> {
        *self.attempts.lock().unwrap() += 1;
        Err(SinkError::Transport("connection refused".into()))
    }

    fn describe(&self) -> String {
        "unreachable".to_string()
    }
}

/// Sink that takes `delay` to answer, then records like [`RecordingSink`].
pub struct SlowSink {
    delay: Duration,
    inner: RecordingSink,
}

impl SlowSink {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            inner: RecordingSink::default(),
        }
    }

    pub fn records(&self) -> Vec<VisitRecord> {
        self.inner.records()
    }
}

#[async_trait]
impl VisitSink for SlowSink {
    async fn append(&self, record: &VisitRecord) -> Result<(), SinkError> {
        tokio::time::sleep(self.delay).await;
        self.inner.append(record).await
    }

    fn describe(&self) -> String {
        "slow".to_string()
    }
}

/// In-memory writer for asserting on formatted log output.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        request_timeout_secs: 30,
        append_timeout_secs: 20,
        trust_forwarded_for: false,
        sheets: SheetsConfig {
            credentials_file: "service-account.json".into(),
            spreadsheet_name: "ClickLogs".to_string(),
            spreadsheet_id: None,
            timeout_secs: 10,
        },
    }
}

/// Build the full application router around the given sink and config.
pub fn build_test_app_with(sink: Arc<dyn VisitSink>, config: ServerConfig) -> Router {
    let state = AppState {
        config: Arc::new(config.clone()),
        sink,
    };
    build_app_router(state, &config)
}

/// Build the full application router around the given sink.
pub fn build_test_app(sink: Arc<dyn VisitSink>) -> Router {
    build_test_app_with(sink, test_config())
}

/// Send a GET request.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Start a `POST /log` request as if it came from `peer`.
pub fn log_request(peer: SocketAddr) -> axum::http::request::Builder {
    Request::builder()
        .method(Method::POST)
        .uri("/log")
        .extension(ConnectInfo(peer))
}

/// Send a prepared request.
pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

/// Read the response body as UTF-8 text.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Read the response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
