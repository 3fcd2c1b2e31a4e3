//! Server lifecycle tests
//!
//! Start a real listener on an ephemeral port, talk plain HTTP/1.1 to it and
//! stop it again.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use excel_generator::api::{AppContext, ServerConfig};

fn local_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        ..ServerConfig::default()
    }
}

async fn raw_request(addr: std::net::SocketAddr, request: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request.as_bytes()).await.unwrap();
    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    String::from_utf8_lossy(&response).into_owned()
}

#[tokio::test]
async fn test_start_reports_bound_address() {
    let server = AppContext::new(local_config()).start().await.unwrap();
    let addr = server.local_addr();

    assert!(addr.ip().is_loopback());
    assert_ne!(addr.port(), 0);

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_serves_health_then_stops() {
    let server = AppContext::new(local_config()).start().await.unwrap();
    let addr = server.local_addr();

    let response = raw_request(
        addr,
        "GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    )
    .await;
    assert!(response.starts_with("HTTP/1.1 200 OK"));
    assert!(response.contains("\"status\":\"OK\""));

    server.stop().await.unwrap();
    assert!(TcpStream::connect(addr).await.is_err());
}

#[tokio::test]
async fn test_serves_generated_file() {
    let server = AppContext::new(local_config()).start().await.unwrap();
    let body = r#"{"sheets":{"Sheet1":[["a",1]]},"filename":"live.xlsx"}"#;
    let request = format!(
        "POST /generate-excel HTTP/1.1\r\nHost: localhost\r\nOrigin: http://example.com\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    );

    let response = raw_request(server.local_addr(), &request).await;
    let lower = response.to_ascii_lowercase();
    assert!(response.starts_with("HTTP/1.1 200 OK"));
    assert!(lower.contains("content-disposition: attachment; filename=\"live.xlsx\""));
    assert!(lower.contains("access-control-allow-origin: *"));

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_two_contexts_run_independently() {
    let first = AppContext::new(local_config()).start().await.unwrap();
    let second = AppContext::new(local_config()).start().await.unwrap();

    assert_ne!(first.local_addr(), second.local_addr());

    first.stop().await.unwrap();
    let response = raw_request(
        second.local_addr(),
        "GET / HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    )
    .await;
    assert!(response.starts_with("HTTP/1.1 200 OK"));

    second.stop().await.unwrap();
}

#[tokio::test]
async fn test_start_fails_on_bad_host() {
    let config = ServerConfig {
        host: "definitely not an address".to_string(),
        ..local_config()
    };
    assert!(AppContext::new(config).start().await.is_err());
}
