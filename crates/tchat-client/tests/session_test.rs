//! Session behavior against the in-memory relay.
//!
//! # Oracle Pattern
//!
//! Tests end with oracle checks on what the relay observed (frames written,
//! connections opened, reads outstanding) rather than on session internals.

use tchat_client::{
    Config, ConnectionState, Direction, ListenEvent, Message, Session, SessionError,
    TransportError,
};
use tchat_harness::{SimConnector, SimRelay};

const ENDPOINT: &str = "sim://relay";

fn session(relay: &SimRelay) -> Session<SimConnector> {
    let mut session = Session::new(relay.connector(), ENDPOINT, "1234");
    session.set_username("nina");
    session
}

async fn connected(relay: &SimRelay) -> Session<SimConnector> {
    let mut session = session(relay);
    session.connect().await.unwrap();
    session
}

#[tokio::test]
async fn handshake_registers_identity() {
    let relay = SimRelay::new();
    let mut session = connected(&relay).await;
    session.handshake().await.unwrap();

    let sent = relay.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].direction, Direction::ClientToServer);
    assert_eq!(sent[0].config, Config::Username);
    assert_eq!(sent[0].sender, "nina");
    assert_eq!(sent[0].password, "1234");
    assert_eq!(sent[0].content, "");
    assert!(!sent[0].timestamp.is_empty());
}

#[tokio::test]
async fn list_command_sends_one_frame() {
    let relay = SimRelay::new();
    let mut session = connected(&relay).await;
    session.send_command(":list").await.unwrap();

    let sent = relay.take_sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].config, Config::List);
    assert_eq!(sent[0].direction, Direction::ClientToServer);
    assert_eq!(sent[0].content, "");
}

#[tokio::test]
async fn unknown_command_never_reaches_the_wire() {
    let relay = SimRelay::new();
    let mut session = connected(&relay).await;

    let err = session.send_command(":bogus").await.unwrap_err();
    assert!(matches!(err, SessionError::UnknownCommand(ref input) if input == ":bogus"));
    assert_eq!(err.to_string(), "Invalid Command: :bogus");
    assert_eq!(relay.sent_count(), 0);
    assert!(session.is_connected());
}

#[tokio::test]
async fn empty_chat_is_a_no_op() {
    let relay = SimRelay::new();
    let mut session = connected(&relay).await;
    session.send_chat("").await.unwrap();
    assert_eq!(relay.sent_count(), 0);
}

#[tokio::test]
async fn chat_is_broadcast() {
    let relay = SimRelay::new();
    let mut session = connected(&relay).await;
    session.send_message_or_command("hello").await.unwrap();

    let sent = relay.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].direction, Direction::ClientToAll);
    assert_eq!(sent[0].config, Config::Chat);
    assert_eq!(sent[0].content, "hello");
}

#[tokio::test]
async fn sends_keep_issue_order() {
    let relay = SimRelay::new();
    let mut session = connected(&relay).await;
    session.handshake().await.unwrap();
    for content in ["one", "two", "three"] {
        session.send_chat(content).await.unwrap();
    }

    let contents: Vec<_> = relay.sent().into_iter().map(|m| m.content).collect();
    assert_eq!(contents, ["", "one", "two", "three"]);
}

#[tokio::test]
async fn close_is_idempotent() {
    let relay = SimRelay::new();
    let mut session = connected(&relay).await;

    session.close_conn().await.unwrap();
    assert_eq!(session.state(), ConnectionState::Disconnected);
    assert!(!relay.is_open());
    assert_eq!(relay.sent().last().map(|m| m.config.clone()), Some(Config::Close));

    session.close_conn().await.unwrap();
    assert!(!session.is_connected());

    let err = session.send_chat("late").await.unwrap_err();
    assert!(matches!(err, SessionError::Send(TransportError::NotConnected)));
    assert_eq!(relay.sent_count(), 1);
}

#[tokio::test]
async fn close_tears_down_even_when_notice_fails() {
    let relay = SimRelay::new();
    let mut session = connected(&relay).await;
    relay.fail_sends(true);

    let err = session.close_conn().await.unwrap_err();
    assert_eq!(err.to_string(), "Error sending data to the server...");
    assert!(!session.is_connected());
    assert!(!relay.is_open());

    relay.fail_sends(false);
    assert!(session.send_chat("late").await.is_err());
}

#[tokio::test]
async fn failed_write_marks_session_down() {
    let relay = SimRelay::new();
    let mut session = connected(&relay).await;
    relay.fail_sends(true);

    let err = session.send_chat("hello").await.unwrap_err();
    assert!(matches!(err, SessionError::Send(TransportError::Stream(_))));
    assert_eq!(session.state(), ConnectionState::Disconnected);
}

#[tokio::test]
async fn connect_can_be_retried() {
    let relay = SimRelay::new();
    let mut session = session(&relay);

    relay.refuse_connections(true);
    let err = session.connect().await.unwrap_err();
    assert!(err.is_connection_failure());
    assert_eq!(err.to_string(), "Server Connection Failed: Try Again Later!");
    assert_eq!(session.state(), ConnectionState::Disconnected);

    relay.refuse_connections(false);
    session.connect().await.unwrap();
    assert!(session.is_connected());
    assert_eq!(session.epoch(), 1);
    assert_eq!(relay.connections(), 1);
}

#[tokio::test]
async fn receive_one_decodes_inbound_frame() {
    let relay = SimRelay::new();
    let mut session = connected(&relay).await;
    relay.broadcast("omar", "hi nina");

    let message = session.receive_one().await.unwrap();
    assert_eq!(message.sender, "omar");
    assert_eq!(message.content, "hi nina");
    assert_eq!(message.direction, Direction::ServerToAll);
    assert!(session.can_listen());
}

#[tokio::test]
async fn binary_frames_are_accepted() {
    let relay = SimRelay::new();
    let mut session = connected(&relay).await;
    relay.push_binary(br#"{"sender":"Server","content":"welcome"}"#.to_vec());

    let message = session.receive_one().await.unwrap();
    assert!(message.is_from_server());
    assert_eq!(message.timestamp, "");
}

#[tokio::test]
async fn malformed_frame_marks_session_down() {
    let relay = SimRelay::new();
    let mut session = connected(&relay).await;
    relay.push_raw("not json");

    let err = session.receive_one().await.unwrap_err();
    assert!(matches!(err, SessionError::Decode(_)));
    assert_eq!(err.to_string(), "Disconnected!");
    assert!(!session.is_connected());
    assert!(!session.can_listen());
}

#[tokio::test]
async fn receive_while_listener_out_is_refused() {
    let relay = SimRelay::new();
    let mut session = connected(&relay).await;

    let listener = session.arm_listener().unwrap();
    assert!(session.arm_listener().is_none());
    assert!(matches!(session.receive_one().await, Err(SessionError::ListenerBusy)));
    assert_eq!(relay.reads_started(), 0);

    relay.announce("hello");
    let outcome = listener.listen().await;
    assert!(outcome.is_message());
    assert_eq!(
        session.complete_listen(outcome),
        Some(ListenEvent::Message(Message {
            sender: "Server".into(),
            direction: Direction::ServerToClient,
            content: "hello".into(),
            ..Message::default()
        }))
    );
    assert!(session.can_listen());
    assert_eq!(relay.max_reads_in_flight(), 1);
}

#[tokio::test]
async fn receive_without_connection_fails() {
    let relay = SimRelay::new();
    let mut session = session(&relay);
    let err = session.receive_one().await.unwrap_err();
    assert!(matches!(err, SessionError::Receive(TransportError::NotConnected)));
}

#[tokio::test]
async fn dropped_connection_yields_one_disconnect() {
    let relay = SimRelay::new();
    let mut session = connected(&relay).await;

    let listener = session.arm_listener().unwrap();
    relay.drop_connection();
    let outcome = listener.listen().await;
    assert!(!outcome.is_message());

    match session.complete_listen(outcome) {
        Some(ListenEvent::Disconnected { summary, cause }) => {
            assert_eq!(summary, "Disconnected!");
            assert!(cause.contains("reset by peer"));
        },
        other => panic!("expected disconnect, got {other:?}"),
    }
    assert!(!session.is_connected());
    assert!(session.arm_listener().is_none());
}

#[tokio::test]
async fn stale_outcome_is_discarded() {
    let relay = SimRelay::new();
    let mut session = connected(&relay).await;

    let old = session.arm_listener().unwrap();
    relay.drop_connection();
    let outcome = old.listen().await;

    session.connect().await.unwrap();
    assert_eq!(session.epoch(), 2);
    assert_eq!(outcome.epoch(), 1);
    assert!(session.complete_listen(outcome).is_none());

    assert!(session.is_connected());
    assert!(session.can_listen());
}
