//! Connection and protocol state machine.
//!
//! # Lifecycle
//!
//! `Disconnected -> Connecting -> Connected -> Disconnected`. A failed
//! connect returns to `Disconnected` and may simply be retried. Any read or
//! write failure, and every [`Session::close_conn`], ends in `Disconnected`.
//! Nothing reconnects automatically.
//!
//! # Caller contract
//!
//! Sends are not gated on [`Session::is_connected`]. The event loop checks
//! the status before sending. A send with no connection handle installed
//! fails with [`SessionError::Send`].

use tchat_proto::{Config, Direction, Message, timestamp_now};

use crate::{
    Command, Connector, FrameWriter, ListenEvent, ListenOutcome, Listener, SessionError,
    TransportError,
};

/// Connection state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectionState {
    /// No open connection.
    #[default]
    Disconnected,
    /// Dial in progress.
    Connecting,
    /// Open connection, no close sent or observed.
    Connected,
}

/// Client session with the relay.
///
/// Exclusively owns the connection. The writer never leaves the session; the
/// reader is lent to one [`Listener`] at a time.
pub struct Session<C: Connector> {
    connector: C,
    endpoint: String,
    username: Option<String>,
    /// Skeleton for outbound frames (sender, password).
    template: Message,
    state: ConnectionState,
    writer: Option<C::Writer>,
    /// Parked reader. `None` while a listener holds it or when disconnected.
    reader: Option<C::Reader>,
    /// Incremented on every successful connect.
    epoch: u64,
}

impl<C: Connector> Session<C> {
    /// Create a disconnected session.
    pub fn new(connector: C, endpoint: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            connector,
            endpoint: endpoint.into(),
            username: None,
            template: Message { password: password.into(), ..Message::default() },
            state: ConnectionState::Disconnected,
            writer: None,
            reader: None,
            epoch: 0,
        }
    }

    /// Set the local display name used as `sender` on every outbound frame.
    pub fn set_username(&mut self, username: impl Into<String>) {
        let username = username.into();
        self.template.sender.clone_from(&username);
        self.username = Some(username);
    }

    /// Local display name. `None` until set.
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Relay address.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// True iff a connection is open and no close has been sent or observed.
    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    /// Number of successful connects so far.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// True if the reader is parked and a listener could be armed.
    pub fn can_listen(&self) -> bool {
        self.is_connected() && self.reader.is_some()
    }

    /// Open the connection.
    ///
    /// Safe to call again after a failure. A previous connection, if any, is
    /// dropped.
    pub async fn connect(&mut self) -> Result<(), SessionError> {
        self.state = ConnectionState::Connecting;
        tracing::debug!(endpoint = %self.endpoint, "connecting");

        match self.connector.connect(&self.endpoint).await {
            Ok((writer, reader)) => {
                self.writer = Some(writer);
                self.reader = Some(reader);
                self.epoch += 1;
                self.state = ConnectionState::Connected;
                tracing::debug!(epoch = self.epoch, "connected");
                Ok(())
            },
            Err(e) => {
                self.state = ConnectionState::Disconnected;
                tracing::error!(endpoint = %self.endpoint, error = %e, "failed to connect to the server");
                Err(SessionError::Connection(e))
            },
        }
    }

    /// Register the local identity with the relay.
    ///
    /// Must be sent once per successful connect, before any chat traffic.
    pub async fn handshake(&mut self) -> Result<(), SessionError> {
        let frame = self.frame(Direction::ClientToServer, Config::Username, "");
        self.send_frame(frame).await
    }

    /// Ask the relay for the online users. The answer arrives later as an
    /// ordinary inbound message.
    pub async fn list_clients(&mut self) -> Result<(), SessionError> {
        let frame = self.frame(Direction::ClientToServer, Config::List, "");
        self.send_frame(frame).await
    }

    /// Broadcast a chat message. Empty content is a no-op.
    pub async fn send_chat(&mut self, content: &str) -> Result<(), SessionError> {
        if content.is_empty() {
            return Ok(());
        }
        let frame = self.frame(Direction::ClientToAll, Config::Chat, content);
        self.send_frame(frame).await
    }

    /// Run an in-chat command.
    ///
    /// Unknown commands fail with [`SessionError::UnknownCommand`] and never
    /// reach the wire.
    pub async fn send_command(&mut self, input: &str) -> Result<(), SessionError> {
        match Command::parse(input) {
            Some(Command::List) => self.list_clients().await,
            None => Err(SessionError::UnknownCommand(input.to_owned())),
        }
    }

    /// Dispatch compose-box input: commands by sigil, everything else as chat.
    pub async fn send_message_or_command(&mut self, input: &str) -> Result<(), SessionError> {
        if Command::is_command(input) {
            self.send_command(input).await
        } else {
            self.send_chat(input).await
        }
    }

    /// Gracefully disconnect.
    ///
    /// Sends a close notice as a best effort, then closes the connection
    /// whether or not the notice went out. The session is `Disconnected`
    /// afterwards in every case. Calling it again is harmless.
    pub async fn close_conn(&mut self) -> Result<(), SessionError> {
        let frame = self.frame(Direction::ClientToServer, Config::Close, "");
        self.state = ConnectionState::Disconnected;
        self.reader = None;

        let Some(mut writer) = self.writer.take() else {
            tracing::debug!("close requested with no open connection");
            return Ok(());
        };

        let notice = match tchat_proto::encode(&frame) {
            Ok(json) => writer.send(json).await.map_err(SessionError::Send),
            Err(e) => Err(SessionError::Encode(e)),
        };
        if let Err(e) = &notice {
            tracing::warn!(error = %e.cause(), "failed to send close notice");
        }

        if let Err(e) = writer.close().await {
            tracing::warn!(error = %e, "failed to close connection");
        }
        tracing::debug!("connection closed");

        notice
    }

    /// Perform exactly one blocking read.
    ///
    /// Fails with [`SessionError::ListenerBusy`] if a [`Listener`] currently
    /// holds the reader. On a read or decode failure the session is marked
    /// disconnected.
    pub async fn receive_one(&mut self) -> Result<Message, SessionError> {
        let Some(listener) = self.arm_listener() else {
            return Err(if self.is_connected() {
                SessionError::ListenerBusy
            } else {
                SessionError::Receive(TransportError::NotConnected)
            });
        };

        let outcome = listener.listen().await;
        self.finish_listen(outcome)
    }

    /// Lend the reader to a new [`Listener`].
    ///
    /// `None` when not connected or when a listener is already out.
    pub fn arm_listener(&mut self) -> Option<Listener<C::Reader>> {
        if !self.is_connected() {
            return None;
        }
        self.reader.take().map(|reader| Listener::new(reader, self.epoch))
    }

    /// Take back a listener's reader and translate its result.
    ///
    /// Returns `None` for outcomes from an earlier connection, which are
    /// discarded.
    pub fn complete_listen(&mut self, outcome: ListenOutcome<C::Reader>) -> Option<ListenEvent> {
        if outcome.epoch != self.epoch {
            tracing::debug!(stale = outcome.epoch, current = self.epoch, "dropping stale listen");
            return None;
        }

        Some(match self.finish_listen(outcome) {
            Ok(message) => ListenEvent::Message(message),
            Err(e) => ListenEvent::Disconnected { summary: e.to_string(), cause: e.cause() },
        })
    }

    fn finish_listen(
        &mut self,
        outcome: ListenOutcome<C::Reader>,
    ) -> Result<Message, SessionError> {
        let ListenOutcome { reader, result, .. } = outcome;
        match result {
            Ok(message) => {
                tracing::info!(sender = %message.sender, content = %message.content, "message from server");
                if self.is_connected() {
                    self.reader = Some(reader);
                }
                Ok(message)
            },
            Err(e) => {
                tracing::warn!(error = %e.cause(), "listen failed, marking connection down");
                self.state = ConnectionState::Disconnected;
                Err(e)
            },
        }
    }

    /// Build an outbound frame from the template. Direction, config and
    /// content are always set here, never inherited from a previous send.
    fn frame(&self, direction: Direction, config: Config, content: &str) -> Message {
        Message {
            sender: self.template.sender.clone(),
            direction,
            config,
            content: content.to_owned(),
            password: self.template.password.clone(),
            timestamp: timestamp_now(),
        }
    }

    async fn send_frame(&mut self, frame: Message) -> Result<(), SessionError> {
        let result = self.write(&frame).await;
        if let Err(e) = &result {
            tracing::warn!(config = %frame.config, error = %e.cause(), "send failed, marking connection down");
            self.state = ConnectionState::Disconnected;
        }
        result
    }

    async fn write(&mut self, frame: &Message) -> Result<(), SessionError> {
        let json = tchat_proto::encode(frame).map_err(SessionError::Encode)?;
        let writer =
            self.writer.as_mut().ok_or(SessionError::Send(TransportError::NotConnected))?;
        writer.send(json).await.map_err(SessionError::Send)
    }
}
