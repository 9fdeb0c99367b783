use std::time::Duration;

use tokio::sync::mpsc::{channel, Receiver};
use tokio::time::delay_for;

use server::connection::{ConnectionCommand, ConnectionEvent};
use server::server::{spawn_server, ServerCommand, ServerTx};
use system::serde_json::json;
use system::{ChatMessage, ClientCommand, ConnectionId, ServerEvent};

async fn connect(srv_tx: &mut ServerTx) -> (ConnectionId, Receiver<ConnectionEvent>) {
    let (tx, mut rx) = channel(32);
    srv_tx
        .send(ServerCommand::Connection(ConnectionCommand::Connect { tx }))
        .await
        .expect("server loop must be running");
    match rx.recv().await {
        Some(ConnectionEvent::Connected { connection_id }) => (connection_id, rx),
        other => panic!("expected Connected, got {:?}", other),
    }
}

async fn send(srv_tx: &mut ServerTx, from: ConnectionId, command: ClientCommand) {
    srv_tx
        .send(ServerCommand::Connection(ConnectionCommand::FromClient {
            from,
            command,
        }))
        .await
        .expect("server loop must be running");
}

async fn next_event(rx: &mut Receiver<ConnectionEvent>) -> ServerEvent {
    match rx.recv().await {
        Some(ConnectionEvent::Event(event)) => event,
        other => panic!("expected an event, got {:?}", other),
    }
}

async fn assert_silent(rx: &mut Receiver<ConnectionEvent>) {
    delay_for(Duration::from_millis(50)).await;
    if let Ok(event) = rx.try_recv() {
        panic!("expected no event, got {:?}", event);
    }
}

#[tokio::test]
async fn late_joiner_replays_chat_then_sees_live_messages() {
    let mut srv_tx = spawn_server(Duration::from_secs(3600));

    let (c1, mut rx1) = connect(&mut srv_tx).await;
    send(&mut srv_tx, c1, ClientCommand::JoinRoom {
        room_id: "r1".into(),
    })
    .await;
    // Replay for the room creator: no members, empty logs.
    assert_eq!(
        next_event(&mut rx1).await,
        ServerEvent::AllOtherMembers { members: vec![] }
    );
    for _ in 0..3 {
        next_event(&mut rx1).await;
    }

    send(&mut srv_tx, c1, ClientCommand::SendChat {
        room_id: "r1".into(),
        body: "hi".into(),
    })
    .await;
    assert_eq!(
        next_event(&mut rx1).await,
        ServerEvent::ChatMessage {
            message: ChatMessage {
                sender: c1,
                body: "hi".into()
            }
        }
    );

    let (c2, mut rx2) = connect(&mut srv_tx).await;
    send(&mut srv_tx, c2, ClientCommand::JoinRoom {
        room_id: "r1".into(),
    })
    .await;
    assert_eq!(
        next_event(&mut rx2).await,
        ServerEvent::AllOtherMembers { members: vec![c1] }
    );
    assert_eq!(
        next_event(&mut rx2).await,
        ServerEvent::DrawingHistory { events: vec![] }
    );
    next_event(&mut rx2).await; // notes snapshot
    assert_eq!(
        next_event(&mut rx2).await,
        ServerEvent::ChatHistory {
            messages: vec![ChatMessage {
                sender: c1,
                body: "hi".into()
            }]
        }
    );

    send(&mut srv_tx, c2, ClientCommand::SendChat {
        room_id: "r1".into(),
        body: "hello".into(),
    })
    .await;
    let expected = ServerEvent::ChatMessage {
        message: ChatMessage {
            sender: c2,
            body: "hello".into(),
        },
    };
    assert_eq!(next_event(&mut rx1).await, expected);
    assert_eq!(next_event(&mut rx2).await, expected);
}

#[tokio::test]
async fn relay_to_a_disconnected_peer_delivers_nothing() {
    let mut srv_tx = spawn_server(Duration::from_secs(3600));

    let (c1, mut rx1) = connect(&mut srv_tx).await;
    let (c2, rx2) = connect(&mut srv_tx).await;
    drop(rx2);
    srv_tx
        .send(ServerCommand::Connection(ConnectionCommand::Disconnect {
            from: c2,
        }))
        .await
        .expect("server loop must be running");

    send(&mut srv_tx, c1, ClientCommand::RelayOffer {
        target: c2,
        caller: c1,
        signal: json!({"type": "offer", "sdp": "v=0"}),
    })
    .await;

    assert_silent(&mut rx1).await;
}

#[tokio::test]
async fn disconnect_fans_out_to_every_room_of_the_connection() {
    let mut srv_tx = spawn_server(Duration::from_secs(3600));

    let (c1, _rx1) = connect(&mut srv_tx).await;
    let (c2, mut rx2) = connect(&mut srv_tx).await;
    let (c3, mut rx3) = connect(&mut srv_tx).await;

    for (id, room) in [(c1, "a"), (c1, "b"), (c2, "a"), (c3, "b")].iter() {
        send(&mut srv_tx, *id, ClientCommand::JoinRoom {
            room_id: (*room).into(),
        })
        .await;
    }
    // Skip both joiners' replay events.
    for _ in 0..4 {
        next_event(&mut rx2).await;
        next_event(&mut rx3).await;
    }

    srv_tx
        .send(ServerCommand::Connection(ConnectionCommand::Disconnect {
            from: c1,
        }))
        .await
        .expect("server loop must be running");

    assert_eq!(
        next_event(&mut rx2).await,
        ServerEvent::MemberLeft { connection_id: c1 }
    );
    assert_eq!(
        next_event(&mut rx3).await,
        ServerEvent::MemberLeft { connection_id: c1 }
    );
    assert_silent(&mut rx2).await;
    assert_silent(&mut rx3).await;
}
