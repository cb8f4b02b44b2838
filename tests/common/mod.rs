//! Shared fixtures: a local origin server and an app wired to a temp directory
#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, header},
    response::IntoResponse,
    routing::get,
};
use flate2::{Compression, write::GzEncoder};
use std::io::Write;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use fetchdrop::api::{router, state::AppState};
use fetchdrop::config::Config;
use fetchdrop::downloader::Downloader;

pub const PDF_BYTES: &[u8] = b"%PDF-1.4\nfake report body\n%%EOF";
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake png pixels";
pub const TEXT_BYTES: &[u8] = b"plain text notes";

/// Client timeout used by test configs; `/slow.txt` outlives it
pub const TEST_TIMEOUT_MS: u64 = 500;

/// Tracks how many `/tracked/*` requests are in flight at once
#[derive(Debug, Default)]
pub struct Tracker {
    current: AtomicUsize,
    peak: AtomicUsize,
    total: AtomicUsize,
}

impl Tracker {
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn total(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }
}

pub struct Origin {
    pub base: String,
    pub tracker: Arc<Tracker>,
}

impl Origin {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }
}

/// Start the mock origin on an ephemeral port
pub async fn start_origin() -> Origin {
    let tracker = Arc::new(Tracker::default());

    let app = Router::new()
        .route("/", get(png))
        .route("/files/report.pdf", get(pdf))
        .route("/avatar", get(png))
        .route("/images/logo", get(png))
        .route("/notes", get(text))
        .route("/blob", get(unknown_type))
        .route("/slow.txt", get(slow))
        .route("/compressed.txt", get(compressed))
        .route("/tracked/{name}", get(tracked))
        .with_state(tracker.clone());

    let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Origin {
        base: format!("http://{}", addr),
        tracker,
    }
}

async fn pdf() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/pdf")], PDF_BYTES)
}

async fn png() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "image/png")], PNG_BYTES)
}

async fn text() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], TEXT_BYTES)
}

async fn unknown_type() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/x-fetchdrop-test")], &b"opaque"[..])
}

/// Always gzip-encoded, whatever the client asked for
async fn compressed() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/plain"),
            (header::CONTENT_ENCODING, "gzip"),
        ],
        gzip(TEXT_BYTES),
    )
}

async fn slow() -> &'static str {
    tokio::time::sleep(Duration::from_millis(TEST_TIMEOUT_MS * 6)).await;
    "too late"
}

async fn tracked(State(tracker): State<Arc<Tracker>>) -> impl IntoResponse {
    let now = tracker.current.fetch_add(1, Ordering::SeqCst) + 1;
    tracker.peak.fetch_max(now, Ordering::SeqCst);
    tracker.total.fetch_add(1, Ordering::SeqCst);

    tokio::time::sleep(Duration::from_millis(100)).await;

    tracker.current.fetch_sub(1, Ordering::SeqCst);
    ([(header::CONTENT_TYPE, "text/plain")], "tracked")
}

pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// Serve `app` over real TCP on an ephemeral port
pub async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    addr
}

/// A port nothing is listening on
pub async fn closed_port_url() -> String {
    let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/gone.txt", addr)
}

pub fn test_config(dir: &Path, max_concurrency: usize) -> Config {
    let mut config = Config::default();
    config.downloads.dir = dir.to_path_buf();
    config.downloads.max_concurrency = max_concurrency;
    config.downloads.request_timeout_ms = TEST_TIMEOUT_MS;
    config.downloads.connect_timeout_ms = TEST_TIMEOUT_MS;
    config.logging.file = None;
    config
}

pub fn build_app(dir: &Path) -> Router {
    build_app_with(test_config(dir, 8))
}

pub fn build_app_with(config: Config) -> Router {
    let downloader = Downloader::from_config(&config.downloads).unwrap();
    router(AppState::new(config, downloader))
}

pub fn post_json(body: &str) -> Request<Body> {
    Request::builder()
        .uri("/download")
        .method("POST")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn post_gzip_json(body: &str) -> Request<Body> {
    Request::builder()
        .uri("/download")
        .method("POST")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::CONTENT_ENCODING, "gzip")
        .body(Body::from(gzip(body.as_bytes())))
        .unwrap()
}

/// Sorted names of the files in `dir`
pub fn files_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
