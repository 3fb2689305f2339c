use peerdrop_core::{ClientEvent, RoomId, ServerEvent};

use crate::integration::init_tracing;
use crate::utils::{EVENT_TIMEOUT_MS, RelayTestClient, SILENCE_MS, spawn_relay, wait_until};

#[tokio::test]
async fn test_every_connection_gets_a_unique_id() {
    init_tracing();

    let (addr, state) = spawn_relay().await;
    let a = RelayTestClient::connect(addr).await.unwrap();
    let b = RelayTestClient::connect(addr).await.unwrap();

    assert_ne!(a.peer_id, b.peer_id);
    assert!(state.signaling.is_registered(&a.peer_id));
    assert!(state.signaling.is_registered(&b.peer_id));
}

#[tokio::test]
async fn test_two_participant_room_lifecycle() {
    init_tracing();

    let (addr, state) = spawn_relay().await;
    let room_id = RoomId::from("r1");
    let mut a = RelayTestClient::connect(addr).await.unwrap();
    let mut b = RelayTestClient::connect(addr).await.unwrap();

    a.send(ClientEvent::JoinRoom(room_id.clone())).await.unwrap();
    assert_eq!(a.recv().await.unwrap(), ServerEvent::RoomUsers(vec![]));

    b.send(ClientEvent::JoinRoom(room_id.clone())).await.unwrap();
    assert_eq!(
        b.recv().await.unwrap(),
        ServerEvent::RoomUsers(vec![a.peer_id.clone()])
    );
    assert_eq!(
        a.recv().await.unwrap(),
        ServerEvent::UserConnected(b.peer_id.clone())
    );

    let b_id = b.peer_id.clone();
    b.close().await.unwrap();

    assert_eq!(a.recv().await.unwrap(), ServerEvent::UserDisconnected(b_id));
    assert!(
        wait_until(EVENT_TIMEOUT_MS, || {
            state.room_manager.members(&room_id) == Some(vec![a.peer_id.clone()])
        })
        .await
    );

    let a_id = a.peer_id.clone();
    a.close().await.unwrap();

    assert!(wait_until(EVENT_TIMEOUT_MS, || !state.room_manager.contains_room(&room_id)).await);
    assert!(wait_until(EVENT_TIMEOUT_MS, || !state.signaling.is_registered(&a_id)).await);
}

#[tokio::test]
async fn test_room_broadcast_skips_sender() {
    init_tracing();

    let (addr, _state) = spawn_relay().await;
    let room_id = RoomId::from("r1");
    let mut a = RelayTestClient::connect(addr).await.unwrap();
    let mut b = RelayTestClient::connect(addr).await.unwrap();

    a.send(ClientEvent::JoinRoom(room_id.clone())).await.unwrap();
    a.recv().await.unwrap();
    b.send(ClientEvent::JoinRoom(room_id.clone())).await.unwrap();
    b.recv().await.unwrap();
    a.recv().await.unwrap();

    let raw = format!(
        r#"{{"event":"send-message","data":{{"roomId":"{}","message":{{"type":"text","content":"hello"}}}}}}"#,
        room_id
    );
    a.send_raw(&raw).await.unwrap();

    let ServerEvent::ReceiveMessage(received) = b.recv().await.unwrap() else {
        panic!("expected receive-message");
    };
    assert_eq!(received.user_id, a.peer_id);
    assert_eq!(received.message["content"], "hello");
    assert!(a.is_silent_for(SILENCE_MS).await);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_join_then_abrupt_disconnect_leaves_no_room() {
    init_tracing();

    let (addr, state) = spawn_relay().await;
    let mut ids = Vec::new();

    for i in 0..20 {
        let mut client = RelayTestClient::connect(addr).await.unwrap();
        let room_id = RoomId::from(format!("drop-{}", i));
        client.send(ClientEvent::JoinRoom(room_id.clone())).await.unwrap();
        ids.push((client.peer_id.clone(), room_id));
        // Dropped without a close frame, possibly while the join is in flight.
        drop(client);
    }

    for (peer_id, room_id) in &ids {
        assert!(
            wait_until(EVENT_TIMEOUT_MS, || {
                !state.room_manager.contains_room(room_id)
                    && !state.signaling.is_registered(peer_id)
            })
            .await,
            "room {} outlived its only participant",
            room_id
        );
    }
    assert_eq!(state.room_manager.room_count(), 0);
}
