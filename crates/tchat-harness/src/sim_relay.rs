//! In-memory relay implementing the client transport traits.
//!
//! A [`SimRelay`] stands in for the WebSocket relay. Tests push inbound
//! frames, drop or refuse connections and make writes fail, then inspect the
//! frames the client wrote. Every [`SimReader::recv`] call is counted while
//! it is pending, so tests can assert that reads never overlap.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tchat_client::{Connector, FrameReader, FrameWriter, Payload, TransportError};
use tchat_proto::{Config, Direction, Message, SERVER_SENDER};
use tokio::sync::mpsc;

type Inbound = mpsc::UnboundedSender<Result<Payload, TransportError>>;

#[derive(Default)]
struct RelayState {
    /// Successful connects so far. Also the id of the newest connection.
    connections: u64,
    /// Id of the open connection, if any.
    current: Option<u64>,
    inbound: Option<Inbound>,
    refuse: bool,
    fail_sends: bool,
    stall_sends: bool,
    /// Raw JSON written by the client, oldest first.
    sent: Vec<String>,
    reads_in_flight: usize,
    max_reads_in_flight: usize,
    reads_started: u64,
}

/// Scriptable in-memory relay.
///
/// Cheap to clone; clones share state.
#[derive(Clone, Default)]
pub struct SimRelay {
    state: Arc<Mutex<RelayState>>,
}

impl SimRelay {
    /// Create a relay that accepts connections.
    pub fn new() -> Self {
        Self::default()
    }

    /// Connector dialing this relay.
    pub fn connector(&self) -> SimConnector {
        SimConnector { relay: self.clone() }
    }

    /// Deliver raw text to the open connection.
    ///
    /// Returns `false` if no connection is open.
    pub fn push_raw(&self, text: impl Into<String>) -> bool {
        self.push(Ok(Payload::Text(text.into())))
    }

    /// Deliver raw bytes as a binary frame.
    pub fn push_binary(&self, bytes: impl Into<Vec<u8>>) -> bool {
        self.push(Ok(Payload::Binary(bytes.into())))
    }

    /// Deliver an encoded message.
    pub fn push_message(&self, message: &Message) -> bool {
        match tchat_proto::encode(message) {
            Ok(json) => self.push_raw(json),
            Err(e) => {
                tracing::warn!(error = %e, "sim relay could not encode message");
                false
            },
        }
    }

    /// Deliver a chat line as if broadcast by another client.
    pub fn broadcast(&self, sender: &str, content: &str) -> bool {
        self.push_message(&Message {
            sender: sender.to_owned(),
            direction: Direction::ServerToAll,
            config: Config::Chat,
            content: content.to_owned(),
            ..Message::default()
        })
    }

    /// Deliver a system message from the relay.
    pub fn announce(&self, content: &str) -> bool {
        self.push_message(&Message {
            sender: SERVER_SENDER.to_owned(),
            direction: Direction::ServerToClient,
            content: content.to_owned(),
            ..Message::default()
        })
    }

    /// Reset the open connection. The pending or next read fails and further
    /// writes on it fail.
    pub fn drop_connection(&self) {
        let mut state = self.lock();
        state.current = None;
        if let Some(inbound) = state.inbound.take() {
            let _ = inbound.send(Err(TransportError::Stream("connection reset by peer".into())));
        }
    }

    /// Make future connects fail (or succeed again).
    pub fn refuse_connections(&self, refuse: bool) {
        self.lock().refuse = refuse;
    }

    /// Make every write fail (or succeed again).
    pub fn fail_sends(&self, fail: bool) {
        self.lock().fail_sends = fail;
    }

    /// Make every write hang forever (or complete again).
    pub fn stall_sends(&self, stall: bool) {
        self.lock().stall_sends = stall;
    }

    /// Frames written by the client, decoded. Undecodable writes are skipped.
    pub fn sent(&self) -> Vec<Message> {
        self.lock().sent.iter().filter_map(|raw| tchat_proto::decode(raw).ok()).collect()
    }

    /// Drain and decode the written frames.
    pub fn take_sent(&self) -> Vec<Message> {
        let raw = std::mem::take(&mut self.lock().sent);
        raw.iter().filter_map(|raw| tchat_proto::decode(raw).ok()).collect()
    }

    /// Number of frames written by the client.
    pub fn sent_count(&self) -> usize {
        self.lock().sent.len()
    }

    /// Successful connects so far.
    pub fn connections(&self) -> u64 {
        self.lock().connections
    }

    /// True while a connection is open.
    pub fn is_open(&self) -> bool {
        self.lock().current.is_some()
    }

    /// Reads currently waiting.
    pub fn reads_in_flight(&self) -> usize {
        self.lock().reads_in_flight
    }

    /// Highest number of reads ever waiting at once.
    pub fn max_reads_in_flight(&self) -> usize {
        self.lock().max_reads_in_flight
    }

    /// Reads started so far.
    pub fn reads_started(&self) -> u64 {
        self.lock().reads_started
    }

    fn push(&self, frame: Result<Payload, TransportError>) -> bool {
        self.lock().inbound.as_ref().is_some_and(|inbound| inbound.send(frame).is_ok())
    }

    fn lock(&self) -> MutexGuard<'_, RelayState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Connector dialing a [`SimRelay`].
pub struct SimConnector {
    relay: SimRelay,
}

impl Connector for SimConnector {
    type Writer = SimWriter;
    type Reader = SimReader;

    async fn connect(&mut self, endpoint: &str) -> Result<(SimWriter, SimReader), TransportError> {
        let mut state = self.relay.lock();
        if state.refuse {
            return Err(TransportError::Connection(format!("{endpoint}: connection refused")));
        }

        let (tx, rx) = mpsc::unbounded_channel();
        state.connections += 1;
        let id = state.connections;
        state.current = Some(id);
        state.inbound = Some(tx);
        drop(state);

        tracing::debug!(id, "sim relay accepted connection");
        Ok((SimWriter { relay: self.relay.clone(), id }, SimReader { relay: self.relay.clone(), rx }))
    }
}

/// Sending half of a simulated connection.
pub struct SimWriter {
    relay: SimRelay,
    id: u64,
}

impl FrameWriter for SimWriter {
    async fn send(&mut self, payload: String) -> Result<(), TransportError> {
        let stalled = self.relay.lock().stall_sends;
        if stalled {
            return std::future::pending().await;
        }

        let mut state = self.relay.lock();
        if state.fail_sends {
            return Err(TransportError::Stream("simulated write failure".into()));
        }
        if state.current != Some(self.id) {
            return Err(TransportError::Closed);
        }
        state.sent.push(payload);
        Ok(())
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        let mut state = self.relay.lock();
        if state.current == Some(self.id) {
            state.current = None;
            state.inbound = None;
        }
        Ok(())
    }
}

/// Receiving half of a simulated connection.
pub struct SimReader {
    relay: SimRelay,
    rx: mpsc::UnboundedReceiver<Result<Payload, TransportError>>,
}

impl FrameReader for SimReader {
    async fn recv(&mut self) -> Result<Payload, TransportError> {
        let _read = ReadGuard::enter(&self.relay);
        self.rx.recv().await.unwrap_or(Err(TransportError::Closed))
    }
}

/// Counts a pending read for as long as it lives.
struct ReadGuard {
    relay: SimRelay,
}

impl ReadGuard {
    fn enter(relay: &SimRelay) -> Self {
        let mut state = relay.lock();
        state.reads_in_flight += 1;
        state.reads_started += 1;
        state.max_reads_in_flight = state.max_reads_in_flight.max(state.reads_in_flight);
        drop(state);
        Self { relay: relay.clone() }
    }
}

impl Drop for ReadGuard {
    fn drop(&mut self) {
        let mut state = self.relay.lock();
        state.reads_in_flight = state.reads_in_flight.saturating_sub(1);
    }
}
