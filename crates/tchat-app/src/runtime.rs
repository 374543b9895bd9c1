//! Generic runtime for application orchestration.
//!
//! The Runtime drives the event loop, coordinating between:
//! - [`App`]: UI state machine
//! - [`Session`]: relay connection and protocol
//! - [`ListenSlot`]: the single in-flight listener read
//! - [`Driver`]: platform-specific input and rendering
//!
//! Each cycle races the next input event against the in-flight listener
//! read. Whichever wins is fed to the App, the resulting actions are
//! executed, and the listener is re-armed if the session is still connected.

use std::time::Duration;

use tchat_client::{Connector, ListenEvent, ListenOutcome, Session, SessionError, TransportError};

use crate::{App, AppAction, AppEvent, ClientConfig, Driver, ListenSlot};

/// Longest wait for the close notice and socket close on quit.
pub const CLOSE_TIMEOUT: Duration = Duration::from_secs(3);

/// Generic runtime that orchestrates App, Session and Driver.
///
/// # Type Parameters
///
/// - `D`: Platform-specific input and rendering driver
/// - `C`: Connector used to dial the relay
pub struct Runtime<D, C>
where
    D: Driver,
    C: Connector,
{
    driver: D,
    app: App,
    session: Session<C>,
    listener: ListenSlot<C::Reader>,
    close_timeout: Duration,
}

/// What woke the loop.
enum Wake<R> {
    Input(AppEvent),
    Listen(ListenOutcome<R>),
}

impl<D, C> Runtime<D, C>
where
    D: Driver,
    C: Connector,
{
    /// Create a runtime. Nothing connects until a username is entered.
    pub fn new(driver: D, connector: C, config: ClientConfig) -> Self {
        let ClientConfig { endpoint, password, timestamps } = config;
        Self {
            driver,
            app: App::new(timestamps),
            session: Session::new(connector, endpoint, password),
            listener: ListenSlot::new(),
            close_timeout: CLOSE_TIMEOUT,
        }
    }

    /// Bound the close on quit by `timeout` instead of [`CLOSE_TIMEOUT`].
    pub fn with_close_timeout(mut self, timeout: Duration) -> Self {
        self.close_timeout = timeout;
        self
    }

    /// Run the event loop until the user quits.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver fails to read input or to render.
    pub async fn run(mut self) -> Result<(), D::Error> {
        let result = self.run_loop().await;
        self.listener.clear();
        self.driver.stop();
        result
    }

    async fn run_loop(&mut self) -> Result<(), D::Error> {
        self.driver.render(&self.app)?;

        loop {
            if self.process_cycle().await? {
                return Ok(());
            }
        }
    }

    /// Process one cycle of the event loop.
    ///
    /// Returns `true` if the application should quit.
    async fn process_cycle(&mut self) -> Result<bool, D::Error> {
        self.listener.arm(&mut self.session);

        let wake = tokio::select! {
            biased;

            event = self.driver.poll_event() => Wake::Input(event?),
            outcome = self.listener.next() => Wake::Listen(outcome),
        };

        let actions = match wake {
            Wake::Input(event) => self.app.handle(event),
            Wake::Listen(outcome) => match self.session.complete_listen(outcome) {
                Some(ListenEvent::Message(message)) => {
                    self.app.handle(AppEvent::MessageReceived(message))
                },
                Some(ListenEvent::Disconnected { summary, cause }) => {
                    self.app.handle(AppEvent::Disconnected { summary, cause })
                },
                None => Vec::new(),
            },
        };

        self.process_actions(actions).await
    }

    /// Execute actions returned by the App, feeding session outcomes back.
    ///
    /// Returns `true` if should quit.
    async fn process_actions(&mut self, initial_actions: Vec<AppAction>) -> Result<bool, D::Error> {
        let mut pending_actions = initial_actions;

        while !pending_actions.is_empty() {
            let actions = std::mem::take(&mut pending_actions);

            for action in actions {
                let events = match action {
                    AppAction::Render => {
                        self.driver.render(&self.app)?;
                        Vec::new()
                    },
                    AppAction::Quit => return Ok(true),
                    AppAction::Join { username } => self.join(username).await,
                    AppAction::Send { content } => self.send(&content).await,
                    AppAction::Close => match self.close().await {
                        Ok(()) => return Ok(true),
                        Err(e) => {
                            tracing::warn!(error = %e.cause(), "close on quit failed");
                            vec![AppEvent::CloseFailed { message: e.to_string() }]
                        },
                    },
                };

                for event in events.into_iter().chain(self.sync_connection()) {
                    pending_actions.extend(self.app.handle(event));
                }
            }
        }
        Ok(false)
    }

    /// Commit the username, connect and register with the relay.
    ///
    /// The first listener is armed by the next cycle once both succeed.
    async fn join(&mut self, username: String) -> Vec<AppEvent> {
        self.session.set_username(username);

        if let Err(e) = self.session.connect().await {
            return vec![AppEvent::ConnectFailed { summary: e.to_string() }];
        }
        if let Err(e) = self.session.handshake().await {
            return vec![AppEvent::SendFailed { message: e.to_string() }];
        }

        tracing::info!(
            username = self.session.username(),
            endpoint = self.session.endpoint(),
            "joined relay"
        );
        Vec::new()
    }

    /// Close the session within the close timeout.
    ///
    /// The session is already disconnected when the timeout fires, so a
    /// stalled connection is simply dropped.
    async fn close(&mut self) -> Result<(), SessionError> {
        tokio::time::timeout(self.close_timeout, self.session.close_conn())
            .await
            .unwrap_or(Err(SessionError::Send(TransportError::TimedOut)))
    }

    async fn send(&mut self, content: &str) -> Vec<AppEvent> {
        match self.session.send_message_or_command(content).await {
            Ok(()) => Vec::new(),
            Err(e) => vec![AppEvent::SendFailed { message: e.to_string() }],
        }
    }

    /// Event for the App if its view of the connection is stale.
    fn sync_connection(&self) -> Option<AppEvent> {
        let state = self.session.state();
        (self.app.connection_state() != state).then_some(AppEvent::ConnectionChanged(state))
    }

    /// Application state.
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Relay session.
    pub fn session(&self) -> &Session<C> {
        &self.session
    }

    /// Listener slot.
    pub fn listener(&self) -> &ListenSlot<C::Reader> {
        &self.listener
    }
}
