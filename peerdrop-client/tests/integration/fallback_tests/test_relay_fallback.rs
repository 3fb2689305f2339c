use peerdrop_client::{ManagerEvent, NegotiationState, Role};
use peerdrop_core::{
    ApplicationMessage, ClientEvent, PeerMessage, RoomId, RoomMessage, ServerEvent,
};
use serde_json::json;

use crate::integration::init_tracing;
use crate::utils::{EVENT_TIMEOUT_MS, RawParticipant, connect_manager, next_event, spawn_relay};

#[tokio::test]
async fn test_messages_fall_back_to_relay_without_channel() {
    init_tracing();

    let (addr, _state) = spawn_relay().await;
    let room_id = RoomId::from("r2");
    let (a, mut a_events) = connect_manager(addr).await;
    a.join_room(room_id.clone()).await.unwrap();

    let mut raw = RawParticipant::connect(addr).await.unwrap();
    raw.send(ClientEvent::JoinRoom(room_id.clone())).await.unwrap();
    assert_eq!(
        raw.recv().await.unwrap(),
        ServerEvent::RoomUsers(vec![a.local_id().clone()])
    );

    let joined = next_event(&mut a_events, EVENT_TIMEOUT_MS, |e| {
        matches!(e, ManagerEvent::PeerJoined(_))
    })
    .await;
    assert_eq!(joined, Some(ManagerEvent::PeerJoined(raw.peer_id.clone())));

    // A offers to the newcomer straight away.
    let ServerEvent::Signal(offer) = raw.recv().await.unwrap() else {
        panic!("expected an offer");
    };
    assert_eq!(offer.user_id, *a.local_id());
    assert_eq!(offer.signal["type"], "offer");

    let sessions = a.sessions().await.unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].role, Role::Initiator);
    assert_eq!(sessions[0].state, NegotiationState::OfferSent);
    assert!(!sessions[0].channel_open);

    let sent = a
        .send_message(ApplicationMessage::password("hunter2"))
        .await
        .unwrap();
    assert!(!sent, "No channel is open, so the relay carries it");

    assert_eq!(
        raw.recv_non_signal().await.unwrap(),
        ServerEvent::ReceiveMessage(PeerMessage {
            user_id: a.local_id().clone(),
            message: json!({ "type": "password", "content": "hunter2" }),
        })
    );

    raw.send(ClientEvent::SendMessage(RoomMessage {
        room_id,
        message: json!({ "type": "text", "content": "via relay" }),
    }))
    .await
    .unwrap();

    let received = next_event(&mut a_events, EVENT_TIMEOUT_MS, |e| {
        matches!(e, ManagerEvent::MessageReceived { .. })
    })
    .await;
    assert_eq!(
        received,
        Some(ManagerEvent::MessageReceived {
            from: raw.peer_id.clone(),
            message: ApplicationMessage::text("via relay"),
        })
    );
    assert!(!a.is_connected());

    a.close().await.unwrap();
}

#[tokio::test]
async fn test_files_never_use_the_relay() {
    init_tracing();

    let (addr, _state) = spawn_relay().await;
    let room_id = RoomId::from("r3");
    let (a, mut a_events) = connect_manager(addr).await;
    a.join_room(room_id.clone()).await.unwrap();

    let mut raw = RawParticipant::connect(addr).await.unwrap();
    raw.send(ClientEvent::JoinRoom(room_id)).await.unwrap();
    raw.recv().await.unwrap();
    next_event(&mut a_events, EVENT_TIMEOUT_MS, |e| {
        matches!(e, ManagerEvent::PeerJoined(_))
    })
    .await
    .unwrap();

    let meta = peerdrop_core::FileMeta {
        name: "a.bin".into(),
        size: 3,
        mime_type: "application/octet-stream".into(),
    };
    let err = a
        .send_file(meta, bytes::Bytes::from_static(b"abc"))
        .await
        .unwrap_err();
    assert!(matches!(err, peerdrop_client::ClientError::NoOpenChannel));

    a.close().await.unwrap();
}
