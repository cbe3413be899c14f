//! End-to-end tests for the canned-response server.

use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use tinyweb::http::response::SUCCESS_BODY;

mod common;

#[tokio::test]
async fn test_get_receives_page() {
    let server = common::start_server(1).await;

    let response = common::raw_request(server.addr, b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n").await;
    let text = String::from_utf8(response).unwrap();

    assert!(text.starts_with("HTTP/1.1 200"));
    assert!(text.ends_with(SUCCESS_BODY));

    server.shutdown.trigger();
    server.handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_post_receives_501() {
    let server = common::start_server(1).await;

    let response = common::raw_request(server.addr, b"POST / HTTP/1.1\r\n\r\n").await;
    assert_eq!(response, b"HTTP/1.1 501 Error Occurred\r\n\r\n");

    server.shutdown.trigger();
    server.handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_long_request_line() {
    let server = common::start_server(1).await;

    let request = format!("GET /{} HTTP/1.1\r\n\r\n", "a".repeat(4000));
    let response = common::raw_request(server.addr, request.as_bytes()).await;
    assert!(response.starts_with(b"HTTP/1.1 200"));

    server.shutdown.trigger();
    server.handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_connections_served_in_turn() {
    let server = common::start_server(1).await;

    for _ in 0..3 {
        let response = common::raw_request(server.addr, b"GET / HTTP/1.1\r\n\r\n").await;
        assert!(response.starts_with(b"HTTP/1.1 200"));
    }

    server.shutdown.trigger();
    server.handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_single_slot_serializes_connections() {
    let server = common::start_server(1).await;

    // First client sends its request line but holds back the blank line.
    let mut slow = TcpStream::connect(server.addr).await.unwrap();
    slow.write_all(b"GET / HTTP/1.1\r\n").await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    let addr = server.addr;
    let fast = tokio::spawn(async move { common::raw_request(addr, b"GET / HTTP/1.1\r\n\r\n").await });

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(!fast.is_finished(), "second connection must wait for the first");

    slow.write_all(b"\r\n").await.unwrap();
    let mut first = Vec::new();
    slow.read_to_end(&mut first).await.unwrap();
    assert!(first.starts_with(b"HTTP/1.1 200"));

    let second = tokio::time::timeout(Duration::from_secs(5), fast)
        .await
        .unwrap()
        .unwrap();
    assert!(second.starts_with(b"HTTP/1.1 200"));

    server.shutdown.trigger();
    server.handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_more_slots_overlap_connections() {
    let server = common::start_server(4).await;

    let mut slow = TcpStream::connect(server.addr).await.unwrap();
    slow.write_all(b"GET / HTTP/1.1\r\n").await.unwrap();

    let fast = tokio::time::timeout(
        Duration::from_secs(5),
        common::raw_request(server.addr, b"GET / HTTP/1.1\r\n\r\n"),
    )
    .await
    .expect("second connection should not wait for the stalled one");
    assert!(fast.starts_with(b"HTTP/1.1 200"));

    slow.write_all(b"\r\n").await.unwrap();
    let mut first = Vec::new();
    slow.read_to_end(&mut first).await.unwrap();
    assert!(first.starts_with(b"HTTP/1.1 200"));

    server.shutdown.trigger();
    server.handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_client_disconnect_does_not_stop_server() {
    let server = common::start_server(1).await;

    let stream = TcpStream::connect(server.addr).await.unwrap();
    drop(stream);

    let response = common::raw_request(server.addr, b"GET / HTTP/1.1\r\n\r\n").await;
    assert!(response.starts_with(b"HTTP/1.1 200"));

    server.shutdown.trigger();
    server.handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_shutdown_ends_run() {
    let server = common::start_server(1).await;
    assert_eq!(server.shutdown.receiver_count(), 1);

    server.shutdown.trigger();
    tokio::time::timeout(Duration::from_secs(5), server.handle)
        .await
        .unwrap()
        .unwrap()
        .unwrap();
}
