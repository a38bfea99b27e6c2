//! Tests for the server lifecycle: bind, serve, drain

use super::*;
use crate::config::Config;
use crate::runtime::RuntimeProbe;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

async fn bind_loopback(config: Config) -> ProbeServer {
    ProbeServer::bind_addr(
        SocketAddr::from(([127, 0, 0, 1], 0)),
        Arc::new(config),
        Arc::new(RuntimeProbe::new()),
    )
    .await
    .expect("bind loopback")
}

/// Send a raw HTTP/1.1 request and read until the server closes the connection
async fn read_until_close(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    tokio::time::timeout(Duration::from_secs(5), stream.read_to_end(&mut buf))
        .await
        .expect("server should close the connection")
        .expect("read response");
    String::from_utf8_lossy(&buf).into_owned()
}

#[tokio::test]
async fn test_bind_enters_running() {
    let server = bind_loopback(Config::default()).await;

    assert_ne!(server.local_addr().port(), 0);
    assert_eq!(*server.lifecycle().borrow(), LifecycleState::Running);
}

#[tokio::test]
async fn test_bind_failure_is_reported() {
    let occupied = std::net::TcpListener::bind("0.0.0.0:0").expect("reserve a port");
    let port = occupied.local_addr().expect("local addr").port();

    let config = Config {
        port,
        ..Config::default()
    };
    let result = ProbeServer::bind(Arc::new(config), Arc::new(RuntimeProbe::new())).await;

    match result {
        Err(ServerError::Bind { port: reported, .. }) => assert_eq!(reported, port),
        Err(other) => panic!("expected bind error, got {}", other),
        Ok(_) => panic!("binding an occupied port should fail"),
    }
}

#[tokio::test]
async fn test_serves_probes_until_shutdown() {
    let server = bind_loopback(Config {
        app_name: "Demo".to_string(),
        app_version: "2.3.1".to_string(),
        ..Config::default()
    })
    .await;
    let addr = server.local_addr();
    let mut lifecycle = server.lifecycle();
    let (controller, signal) = shutdown_channel();
    let handle = tokio::spawn(server.run(signal));

    let client = reqwest::Client::new();
    let response = client
        .get(format!("http://{}/ready", addr))
        .send()
        .await
        .expect("GET /ready");
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.expect("body"), r#"{"status":"ready"}"#);

    let response = client
        .get(format!("http://{}/unknown", addr))
        .send()
        .await
        .expect("GET /unknown");
    assert_eq!(response.status(), 200);
    let html = response.text().await.expect("body");
    assert!(html.contains("Demo") && html.contains("2.3.1"));
    drop(client);

    controller.shutdown();

    let result = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("server should stop after drain")
        .expect("server task");
    assert!(result.is_ok());

    lifecycle
        .wait_for(|s| *s == LifecycleState::Stopped)
        .await
        .expect("lifecycle sender kept until stop");
}

/// Poll until the listener refuses connections
async fn wait_until_refused(addr: SocketAddr) -> bool {
    for _ in 0..50 {
        if TcpStream::connect(addr).await.is_err() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    false
}

#[tokio::test]
async fn test_in_flight_request_finishes_while_draining() {
    let server = bind_loopback(Config::default()).await;
    let addr = server.local_addr();
    let mut lifecycle = server.lifecycle();
    let (controller, signal) = shutdown_channel();
    let handle = tokio::spawn(server.run(signal));

    // Accepted before the signal, headers not yet terminated
    let mut stream = TcpStream::connect(addr).await.expect("connect");
    stream
        .write_all(b"GET /info HTTP/1.1\r\nHost: localhost\r\n")
        .await
        .expect("write request head");
    tokio::time::sleep(Duration::from_millis(20)).await;

    controller.shutdown();

    tokio::time::timeout(
        Duration::from_secs(5),
        lifecycle.wait_for(|s| *s == LifecycleState::Draining),
    )
    .await
    .expect("server should start draining")
    .expect("lifecycle sender alive while draining");

    assert!(wait_until_refused(addr).await, "new connections must be refused");
    assert!(!handle.is_finished(), "drain must wait for the open request");

    stream.write_all(b"\r\n").await.expect("finish request");

    let response = read_until_close(&mut stream).await;
    assert!(response.starts_with("HTTP/1.1 200 OK"), "{}", response);
    assert!(response.contains("\"hostname\""), "{}", response);
    assert!(response.trim_end().ends_with('}'), "full body expected");

    let result = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("server should stop after drain")
        .expect("server task");
    assert!(result.is_ok());
    assert_eq!(*lifecycle.borrow(), LifecycleState::Stopped);
}

#[tokio::test]
async fn test_bounded_drain_reaches_stopped() {
    let server = bind_loopback(Config {
        shutdown_timeout: Some(Duration::from_millis(100)),
        ..Config::default()
    })
    .await;
    let addr = server.local_addr();
    let lifecycle = server.lifecycle();
    let (controller, signal) = shutdown_channel();
    let handle = tokio::spawn(server.run(signal));

    // Connection stuck mid-request
    let mut stream = TcpStream::connect(addr).await.expect("connect");
    stream
        .write_all(b"GET /health HTTP/1.1\r\n")
        .await
        .expect("write partial request");
    tokio::time::sleep(Duration::from_millis(20)).await;

    controller.shutdown();

    let result = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("bounded drain should finish")
        .expect("server task");
    assert!(result.is_ok());
    assert_eq!(*lifecycle.borrow(), LifecycleState::Stopped);
}
