use peerdrop_server::{AppState, serve_on};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Timeout for a single relay event to arrive (ms).
pub const EVENT_TIMEOUT_MS: u64 = 2000;

/// How long to wait before concluding nothing was delivered (ms).
pub const SILENCE_MS: u64 = 300;

/// Boot a relay on an ephemeral local port.
pub async fn spawn_relay() -> (SocketAddr, Arc<AppState>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test relay");
    let addr = listener.local_addr().expect("No local addr");
    let state = AppState::new();

    let server_state = state.clone();
    tokio::spawn(async move {
        if let Err(e) = serve_on(listener, server_state).await {
            tracing::error!("Test relay stopped: {:?}", e);
        }
    });

    (addr, state)
}

/// Poll until `check` holds or the timeout elapses.
pub async fn wait_until<F>(timeout_ms: u64, mut check: F) -> bool
where
    F: FnMut() -> bool,
{
    let start = std::time::Instant::now();
    let timeout = std::time::Duration::from_millis(timeout_ms);

    loop {
        if check() {
            return true;
        }
        if start.elapsed() > timeout {
            return false;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
}
