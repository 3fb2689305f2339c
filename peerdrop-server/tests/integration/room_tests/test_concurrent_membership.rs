use peerdrop_core::{PeerId, RoomId, ServerEvent};
use peerdrop_server::RoomManager;
use std::sync::Arc;
use std::time::Duration;

use crate::integration::{create_test_rooms, init_tracing};
use crate::utils::MockSignalingOutput;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_joins_assign_each_pair_one_initiator() {
    init_tracing();

    let (rooms, signaling) = create_test_rooms();
    let room_id = RoomId::from("busy");
    let peers: Vec<PeerId> = (0..16).map(|_| PeerId::new()).collect();

    let handles: Vec<_> = peers
        .iter()
        .cloned()
        .map(|peer| {
            let rooms = rooms.clone();
            let room_id = room_id.clone();
            tokio::spawn(async move { rooms.join(peer, room_id).await })
        })
        .collect();
    for handle in handles {
        handle.await.expect("join task panicked");
    }

    assert_eq!(rooms.members(&room_id).map(|m| m.len()), Some(peers.len()));

    // For every pair exactly one side saw the other in its snapshot (it will
    // answer) and the other side was told about the newcomer (it will offer).
    for (i, a) in peers.iter().enumerate() {
        let a_snapshot = signaling.room_users_for(a).unwrap_or_default();
        let a_announced = signaling.connected_announcements_for(a);

        for b in peers.iter().skip(i + 1) {
            let b_snapshot = signaling.room_users_for(b).unwrap_or_default();
            let b_announced = signaling.connected_announcements_for(b);

            let a_responds = a_snapshot.contains(b);
            let b_responds = b_snapshot.contains(a);
            assert!(a_responds ^ b_responds, "Exactly one responder per pair");

            if a_responds {
                assert!(b_announced.contains(a));
                assert!(!a_announced.contains(b));
            } else {
                assert!(a_announced.contains(b));
                assert!(!b_announced.contains(a));
            }
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_joins_racing_leaves_leave_consistent_state() {
    init_tracing();

    let (rooms, _signaling) = create_test_rooms();
    let room_id = RoomId::from("churn");
    let stayers: Vec<PeerId> = (0..8).map(|_| PeerId::new()).collect();
    let leavers: Vec<PeerId> = (0..8).map(|_| PeerId::new()).collect();

    let mut handles = Vec::new();
    for peer in stayers.iter().cloned() {
        let rooms = rooms.clone();
        let room_id = room_id.clone();
        handles.push(tokio::spawn(async move { rooms.join(peer, room_id).await }));
    }
    for peer in leavers.iter().cloned() {
        let rooms = rooms.clone();
        let room_id = room_id.clone();
        handles.push(tokio::spawn(async move {
            rooms.join(peer.clone(), room_id).await;
            tokio::task::yield_now().await;
            rooms.leave(&peer).await;
        }));
    }
    for handle in handles {
        handle.await.expect("membership task panicked");
    }

    let mut members = rooms.members(&room_id).expect("Room must survive");
    let mut want = stayers.clone();
    members.sort();
    want.sort();
    assert_eq!(members, want);

    let handles: Vec<_> = stayers
        .iter()
        .cloned()
        .map(|peer| {
            let rooms = rooms.clone();
            tokio::spawn(async move { rooms.leave(&peer).await })
        })
        .collect();
    for handle in handles {
        handle.await.expect("leave task panicked");
    }

    assert!(!rooms.contains_room(&room_id));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_leave_during_join_is_announced_after_snapshot() {
    init_tracing();

    let signaling = MockSignalingOutput::stalling_snapshots(Duration::from_millis(100));
    let rooms = RoomManager::new(Arc::new(signaling.clone()));
    let room_id = RoomId::from("race");
    let x = PeerId::new();
    let y = PeerId::new();

    rooms.join(x.clone(), room_id.clone()).await;

    let join = tokio::spawn({
        let rooms = rooms.clone();
        let (y, room_id) = (y.clone(), room_id.clone());
        async move { rooms.join(y, room_id).await }
    });

    // Y's join now holds the room while its snapshot is being delivered.
    while signaling.stalls_started() == 0 {
        tokio::task::yield_now().await;
    }
    rooms.leave(&x).await;
    join.await.expect("join task panicked");

    assert_eq!(
        signaling.events_for(&y),
        vec![
            ServerEvent::RoomUsers(vec![x.clone()]),
            ServerEvent::UserDisconnected(x.clone()),
        ]
    );
    assert_eq!(rooms.members(&room_id), Some(vec![y.clone()]));
}
