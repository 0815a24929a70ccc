//! End-to-end tests: real listener, real HTTP client.

mod common;

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use common::{start_bridge, CallLog, FakeFactory, RecordingStorage};
use kernel_bridge::config::{BridgeConfig, ServerContext};
use kernel_bridge::lifecycle::LifecycleState;
use kernel_bridge::{HttpServer, KernelBridge, Shutdown};

struct Running {
    addr: SocketAddr,
    bridge: Arc<KernelBridge<FakeFactory>>,
    shutdown: Shutdown,
    server: JoinHandle<std::io::Result<()>>,
}

async fn serve(factory: &FakeFactory, root: &Path, storage: Arc<RecordingStorage>) -> Running {
    let bridge = start_bridge(
        factory,
        root.to_path_buf(),
        ServerContext::new("test", false),
        storage,
    )
    .await
    .unwrap();
    let bridge = Arc::new(bridge);

    let server = HttpServer::new(bridge.clone(), root, &BridgeConfig::default());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server = tokio::spawn(server.run(listener, shutdown.subscribe()));

    Running {
        addr,
        bridge,
        shutdown,
        server,
    }
}

#[tokio::test]
async fn test_get_reaches_kernel() {
    let root = tempfile::tempdir().unwrap();
    let factory = FakeFactory::default();
    let storage = Arc::new(RecordingStorage::new(root.path()));
    let running = serve(&factory, root.path(), storage).await;

    let response = reqwest::Client::new()
        .get(format!("http://{}/echo?q=boots", running.addr))
        .header("Cookie", "session=xyz")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert!(response.headers().contains_key("x-request-id"));
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["query"]["q"], "boots");
    assert_eq!(body["cookies"]["session"], "xyz");
    assert_eq!(body["server_name"], "127.0.0.1");
    assert_eq!(body["environment"], "test");
}

#[tokio::test]
async fn test_form_post() {
    let root = tempfile::tempdir().unwrap();
    let factory = FakeFactory::default();
    let storage = Arc::new(RecordingStorage::new(root.path()));
    let running = serve(&factory, root.path(), storage).await;

    let body: Value = reqwest::Client::new()
        .post(format!("http://{}/echo", running.addr))
        .form(&[("name", "ada")])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["method"], "POST");
    assert_eq!(body["parsed"]["name"], "ada");
    assert_eq!(body["content"], "name=ada");
}

#[tokio::test]
async fn test_multipart_upload() {
    let root = tempfile::tempdir().unwrap();
    let factory = FakeFactory::default();
    let storage = Arc::new(RecordingStorage::new(root.path()));
    let running = serve(&factory, root.path(), storage.clone()).await;

    let part = Part::bytes(b"hello upload".to_vec())
        .file_name("notes.txt")
        .mime_str("text/plain")
        .unwrap();
    let form = Form::new().text("title", "notes").part("document", part);

    let body: Value = reqwest::Client::new()
        .post(format!("http://{}/upload", running.addr))
        .multipart(form)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let file = &body["files"][0];
    assert_eq!(file["field"], "document");
    assert_eq!(file["filename"], "notes.txt");
    assert_eq!(file["media_type"], "text/plain");
    assert_eq!(file["contents"], "hello upload");
    assert_eq!(CallLog::count(&storage.writes), 1);
}

#[tokio::test]
async fn test_error_statuses() {
    let root = tempfile::tempdir().unwrap();
    let factory = FakeFactory::default();
    let storage = Arc::new(RecordingStorage::new(root.path()));
    let running = serve(&factory, root.path(), storage).await;
    let client = reqwest::Client::new();

    let missing = client
        .get(format!("http://{}/missing", running.addr))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), 404);
    assert_eq!(
        missing.text().await.unwrap(),
        "No route found for \"GET /missing\""
    );

    let boom = client
        .get(format!("http://{}/boom", running.addr))
        .send()
        .await
        .unwrap();
    assert_eq!(boom.status(), 500);
}

#[tokio::test]
async fn test_static_files_served_from_public() {
    let root = tempfile::tempdir().unwrap();
    std::fs::create_dir(root.path().join("public")).unwrap();
    std::fs::write(root.path().join("public/robots.txt"), "User-agent: *").unwrap();

    let factory = FakeFactory::default();
    let storage = Arc::new(RecordingStorage::new(root.path()));
    let running = serve(&factory, root.path(), storage).await;

    let response = reqwest::get(format!("http://{}/public/robots.txt", running.addr))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "User-agent: *");
    assert_eq!(CallLog::count(&factory.calls.handled), 0);
}

#[tokio::test]
async fn test_shutdown_stops_server_and_kernel() {
    let root = tempfile::tempdir().unwrap();
    let factory = FakeFactory::default();
    let storage = Arc::new(RecordingStorage::new(root.path()));
    let running = serve(&factory, root.path(), storage).await;

    running.shutdown.trigger();
    running.server.await.unwrap().unwrap();

    assert_eq!(running.bridge.state(), LifecycleState::Shutdown);
    assert_eq!(CallLog::count(&factory.calls.shut_down), 1);
}
