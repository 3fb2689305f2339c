use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::integration::init_tracing;
use crate::utils::spawn_relay;

async fn raw_request(addr: std::net::SocketAddr, request: String) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    String::from_utf8_lossy(&response).into_owned()
}

#[tokio::test]
async fn test_post_connection_acknowledges() {
    init_tracing();

    let (addr, _state) = spawn_relay().await;
    let body = r#"{"connectionId":"abc","offer":{"type":"offer","sdp":"v=0"}}"#;
    let request = format!(
        "POST /api/connection HTTP/1.1\r\nHost: {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        addr,
        body.len(),
        body
    );

    let response = raw_request(addr, request).await;
    assert!(response.starts_with("HTTP/1.1 200"));
    assert!(response.contains(r#""success":true"#));
}

#[tokio::test]
async fn test_get_connection_requires_id() {
    init_tracing();

    let (addr, _state) = spawn_relay().await;
    let request = format!(
        "GET /api/connection HTTP/1.1\r\nHost: {}\r\nConnection: close\r\n\r\n",
        addr
    );

    let response = raw_request(addr, request).await;
    assert!(response.starts_with("HTTP/1.1 400"));
}
