use crate::http::{get_connection, post_connection};
use crate::room::RoomManager;
use crate::signaling::{SignalingService, ws_handler};
use anyhow::{Context, Result};
use axum::Router;
use axum::routing::get;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

pub struct AppState {
    pub signaling: SignalingService,
    pub room_manager: RoomManager,
}

impl AppState {
    pub fn new() -> Arc<Self> {
        let signaling = SignalingService::new();
        let room_manager = RoomManager::new(Arc::new(signaling.clone()));

        Arc::new(Self {
            signaling,
            room_manager,
        })
    }
}

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub bind: SocketAddr,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 3001)),
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/ws", get(ws_handler))
        .route("/api/connection", get(get_connection).post(post_connection))
        .layer(cors)
        .with_state(state)
}

pub async fn serve(config: RelayConfig) -> Result<()> {
    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind relay on {}", config.bind))?;

    serve_on(listener, AppState::new()).await
}

/// Run the relay on an already bound listener.
pub async fn serve_on(listener: TcpListener, state: Arc<AppState>) -> Result<()> {
    let addr = listener.local_addr()?;
    info!("Signaling relay listening on ws://{}/ws", addr);

    axum::serve(listener, router(state))
        .await
        .context("Relay server stopped")?;
    Ok(())
}
