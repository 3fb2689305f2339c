use crate::AppState;
use crate::room::RoomCommand;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use peerdrop_core::{ClientEvent, PeerId, ServerEvent};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let peer_id = PeerId::new();

    ws.on_upgrade(move |socket| handle_socket(socket, peer_id, state))
}

fn into_command(peer_id: &PeerId, event: ClientEvent) -> RoomCommand {
    match event {
        ClientEvent::JoinRoom(room_id) => RoomCommand::Join {
            peer_id: peer_id.clone(),
            room_id,
        },
        ClientEvent::Signal(envelope) => RoomCommand::Signal {
            from: peer_id.clone(),
            envelope,
        },
        ClientEvent::SendMessage(msg) => RoomCommand::Message {
            from: peer_id.clone(),
            room_id: msg.room_id,
            message: msg.message,
        },
    }
}

async fn handle_socket(socket: WebSocket, peer_id: PeerId, state: Arc<AppState>) {
    info!("A user connected: {}", peer_id);

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();

    state.signaling.add_peer(peer_id.clone(), tx);
    state
        .signaling
        .send_signal(&peer_id, &ServerEvent::Welcome(peer_id.clone()));

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(msg).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let state = state.clone();
        let peer_id = peer_id.clone();

        async move {
            while let Some(Ok(msg)) = receiver.next().await {
                match msg {
                    Message::Text(text) => match serde_json::from_str::<ClientEvent>(text.as_str())
                    {
                        Ok(event) => {
                            state
                                .room_manager
                                .handle(into_command(&peer_id, event))
                                .await;
                        }
                        Err(e) => warn!("Invalid relay event from {}: {}", peer_id.short(), e),
                    },
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => {
            recv_task.abort();
            // Wait for the reader to stop, so a join it is still running cannot
            // re-add this participant after the leave below.
            let _ = recv_task.await;
        }
        _ = (&mut recv_task) => send_task.abort(),
    };

    state.signaling.remove_peer(&peer_id);
    state
        .room_manager
        .handle(RoomCommand::Disconnect {
            peer_id: peer_id.clone(),
        })
        .await;
    info!("User disconnected: {}", peer_id);
}
