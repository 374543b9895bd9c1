//! Application state machine.
//!
//! [`App`] manages everything the user sees, decoupled from I/O and from the
//! session. It consumes [`crate::AppEvent`] inputs and produces
//! [`crate::AppAction`] instructions for the runtime to execute.
//!
//! # Responsibilities
//!
//! - Identity screen: collects the username before any chat is possible.
//! - Compose box editing and submission with local echo.
//! - The chat log, formatted and wrapped when lines are added.
//! - The one-shot error latch for connection failures.
//! - Mirrors the session's connection state for the status bar and for
//!   deciding between sending and surfacing a local error.

use tchat_client::ConnectionState;
use tchat_proto::timestamp_now;

use crate::{
    AppAction, AppEvent, Identity, InputState, KeyInput, LineKind, LogLine, MESSAGE_CHAR_LIMIT,
    NOT_CONNECTED, USERNAME_CHAR_LIMIT, WELCOME, format,
};

/// Application state machine.
///
/// Pure state machine that processes events and produces actions.
/// No I/O dependencies, fully testable without a terminal or relay.
#[derive(Debug, Clone)]
pub struct App {
    identity: Identity,
    input: InputState,
    log: Vec<LogLine>,
    /// Set once a connection failure has been shown.
    error_shown: bool,
    connection: ConnectionState,
    /// Terminal dimensions (columns, rows). Zero until the first resize.
    terminal_size: (u16, u16),
    timestamps: bool,
}

impl App {
    /// Create an App on the identity screen.
    pub fn new(timestamps: bool) -> Self {
        Self {
            identity: Identity::Pending,
            input: InputState::with_limit(USERNAME_CHAR_LIMIT),
            log: Vec::new(),
            error_shown: false,
            connection: ConnectionState::Disconnected,
            terminal_size: (0, 0),
            timestamps,
        }
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        match event {
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::Resize(cols, rows) => {
                self.terminal_size = (cols, rows);
                vec![AppAction::Render]
            },
            AppEvent::ConnectionChanged(state) => {
                if state == ConnectionState::Connected {
                    self.error_shown = false;
                }
                self.connection = state;
                vec![AppAction::Render]
            },
            AppEvent::MessageReceived(message) => {
                let line = format::incoming(&message, self.timestamps, self.wrap_width());
                self.log.push(line);
                vec![AppAction::Render]
            },
            AppEvent::Disconnected { summary, cause } => {
                tracing::debug!(%cause, "connection lost");
                self.connection = ConnectionState::Disconnected;
                self.show_error_once(summary)
            },
            AppEvent::ConnectFailed { summary } => {
                self.connection = ConnectionState::Disconnected;
                self.show_error_once(summary)
            },
            AppEvent::SendFailed { message } | AppEvent::CloseFailed { message } => {
                self.log.push(format::error(message));
                vec![AppAction::Render]
            },
        }
    }

    fn handle_key(&mut self, key: KeyInput) -> Vec<AppAction> {
        match key {
            KeyInput::Esc | KeyInput::Interrupt => self.quit(),
            KeyInput::Enter => match self.identity {
                Identity::Pending => self.submit_username(),
                Identity::Set(_) => self.submit_message(),
            },
            _ => {
                if self.input.apply(key) {
                    vec![AppAction::Render]
                } else {
                    vec![]
                }
            },
        }
    }

    /// Close gracefully if connected, otherwise quit right away.
    pub fn quit(&self) -> Vec<AppAction> {
        if self.is_connected() { vec![AppAction::Close] } else { vec![AppAction::Quit] }
    }

    fn submit_username(&mut self) -> Vec<AppAction> {
        let username = self.input.take();
        if username.is_empty() {
            return vec![];
        }

        self.identity = Identity::Set(username.clone());
        self.input = InputState::with_limit(MESSAGE_CHAR_LIMIT);
        vec![AppAction::Join { username }, AppAction::Render]
    }

    fn submit_message(&mut self) -> Vec<AppAction> {
        let content = self.input.take();
        if content.is_empty() {
            return vec![];
        }

        let stamp = self.timestamps.then(timestamp_now);
        self.log.push(format::own(&content, stamp.as_deref(), self.wrap_width()));

        if self.is_connected() {
            vec![AppAction::Send { content }, AppAction::Render]
        } else {
            self.log.push(format::error(NOT_CONNECTED));
            vec![AppAction::Render]
        }
    }

    fn show_error_once(&mut self, summary: String) -> Vec<AppAction> {
        if self.error_shown {
            return vec![AppAction::Render];
        }
        self.error_shown = true;
        self.log.push(format::error(summary));
        vec![AppAction::Render]
    }

    /// Identity screen progress.
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Committed username. `None` while on the identity screen.
    pub fn username(&self) -> Option<&str> {
        match &self.identity {
            Identity::Pending => None,
            Identity::Set(name) => Some(name),
        }
    }

    /// Text input, either the username or the compose box.
    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Chat log, oldest first.
    pub fn log(&self) -> &[LogLine] {
        &self.log
    }

    /// Lines to display: the log, or the welcome text while it is empty.
    pub fn display_lines(&self) -> Vec<LogLine> {
        if self.log.is_empty() {
            vec![LogLine::new(LineKind::Info, WELCOME)]
        } else {
            self.log.clone()
        }
    }

    /// True once a connection failure has been shown.
    pub fn error_shown(&self) -> bool {
        self.error_shown
    }

    /// Last known connection state.
    pub fn connection_state(&self) -> ConnectionState {
        self.connection
    }

    /// True if the last known state is connected.
    pub fn is_connected(&self) -> bool {
        self.connection == ConnectionState::Connected
    }

    /// Terminal dimensions (columns, rows).
    pub fn terminal_size(&self) -> (u16, u16) {
        self.terminal_size
    }

    /// Width used to wrap new log lines. 0 disables wrapping.
    pub fn wrap_width(&self) -> usize {
        usize::from(self.terminal_size.0.saturating_sub(format::BORDER_WIDTH))
    }

    /// True if timestamps are appended to log lines.
    pub fn timestamps(&self) -> bool {
        self.timestamps
    }
}

#[cfg(test)]
mod tests {
    use tchat_proto::Message;

    use super::*;

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            let _ = app.handle(AppEvent::Key(KeyInput::Char(c)));
        }
    }

    fn joined_app() -> App {
        let mut app = App::new(false);
        type_text(&mut app, "nina");
        let _ = app.handle(AppEvent::Key(KeyInput::Enter));
        let _ = app.handle(AppEvent::ConnectionChanged(ConnectionState::Connected));
        app
    }

    #[test]
    fn empty_username_is_ignored() {
        let mut app = App::new(false);
        let actions = app.handle(AppEvent::Key(KeyInput::Enter));
        assert!(actions.is_empty());
        assert_eq!(app.identity(), &Identity::Pending);
    }

    #[test]
    fn username_submission_joins() {
        let mut app = App::new(false);
        type_text(&mut app, "nina");
        let actions = app.handle(AppEvent::Key(KeyInput::Enter));

        assert_eq!(actions, vec![
            AppAction::Join { username: "nina".into() },
            AppAction::Render
        ]);
        assert_eq!(app.username(), Some("nina"));
        assert!(app.input().is_empty());
        assert_eq!(app.input().limit(), MESSAGE_CHAR_LIMIT);
    }

    #[test]
    fn username_is_limited() {
        let mut app = App::new(false);
        type_text(&mut app, &"x".repeat(USERNAME_CHAR_LIMIT + 10));
        assert_eq!(app.input().len(), USERNAME_CHAR_LIMIT);
    }

    #[test]
    fn enter_echoes_then_sends() {
        let mut app = joined_app();
        type_text(&mut app, "hello");
        let actions = app.handle(AppEvent::Key(KeyInput::Enter));

        assert_eq!(actions, vec![AppAction::Send { content: "hello".into() }, AppAction::Render]);
        assert_eq!(app.log(), &[LogLine::new(LineKind::Own, "You: hello")]);
        assert!(app.input().is_empty());
    }

    #[test]
    fn enter_while_disconnected_surfaces_local_error() {
        let mut app = joined_app();
        let _ = app.handle(AppEvent::ConnectionChanged(ConnectionState::Disconnected));
        type_text(&mut app, "hello");
        let actions = app.handle(AppEvent::Key(KeyInput::Enter));

        assert_eq!(actions, vec![AppAction::Render]);
        assert_eq!(app.log(), &[
            LogLine::new(LineKind::Own, "You: hello"),
            LogLine::new(LineKind::Error, NOT_CONNECTED),
        ]);
    }

    #[test]
    fn quit_closes_only_when_connected() {
        let mut app = joined_app();
        assert_eq!(app.handle(AppEvent::Key(KeyInput::Interrupt)), vec![AppAction::Close]);

        let _ = app.handle(AppEvent::ConnectionChanged(ConnectionState::Disconnected));
        assert_eq!(app.handle(AppEvent::Key(KeyInput::Esc)), vec![AppAction::Quit]);
    }

    #[test]
    fn disconnect_banner_is_latched() {
        let mut app = joined_app();
        for _ in 0..3 {
            let _ = app.handle(AppEvent::Disconnected {
                summary: "Disconnected!".into(),
                cause: "connection closed by peer".into(),
            });
        }
        let _ = app.handle(AppEvent::ConnectFailed { summary: "again".into() });

        assert_eq!(app.log(), &[LogLine::new(LineKind::Error, "Disconnected!")]);
        assert!(app.error_shown());
        assert!(!app.is_connected());
    }

    #[test]
    fn latch_resets_on_new_connection() {
        let mut app = joined_app();
        let dropped = || AppEvent::Disconnected {
            summary: "Disconnected!".into(),
            cause: "connection reset by peer".into(),
        };
        let _ = app.handle(dropped());
        let _ = app.handle(AppEvent::ConnectionChanged(ConnectionState::Disconnected));
        assert!(app.error_shown());

        let _ = app.handle(AppEvent::ConnectionChanged(ConnectionState::Connected));
        assert!(!app.error_shown());
        let _ = app.handle(dropped());
        let _ = app.handle(dropped());

        let errors = app.log().iter().filter(|line| line.kind == LineKind::Error).count();
        assert_eq!(errors, 2);
    }

    #[test]
    fn send_failures_are_not_latched() {
        let mut app = joined_app();
        let _ = app.handle(AppEvent::SendFailed { message: "Invalid Command: :x".into() });
        let _ = app.handle(AppEvent::SendFailed { message: "Invalid Command: :x".into() });
        assert_eq!(app.log().len(), 2);
        assert!(!app.error_shown());
    }

    #[test]
    fn resize_sets_wrap_width() {
        let mut app = joined_app();
        assert_eq!(app.wrap_width(), 0);
        let _ = app.handle(AppEvent::Resize(12, 40));
        assert_eq!(app.wrap_width(), 10);

        let _ = app.handle(AppEvent::MessageReceived(Message {
            sender: "al".into(),
            content: "pha beta gamma".into(),
            ..Message::default()
        }));
        assert_eq!(app.log()[0].text, "al: pha beta\ngamma");
    }

    #[test]
    fn welcome_until_first_line() {
        let mut app = joined_app();
        assert_eq!(app.display_lines(), vec![LogLine::new(LineKind::Info, WELCOME)]);
        let _ = app.handle(AppEvent::SendFailed { message: "x".into() });
        assert_eq!(app.display_lines(), app.log().to_vec());
    }
}
