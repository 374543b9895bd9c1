//! Observable application state types.
//!
//! These are the view model: what the renderer needs, already formatted and
//! wrapped, with no access to the session.

/// Text shown in place of the chat log until the first line arrives.
pub const WELCOME: &str = "Welcome to the chat room!\nType a message and press Enter to send.";

/// Local error for compose-box input while the connection is down.
pub const NOT_CONNECTED: &str = "Not connected: message not sent";

/// Identity screen progress.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Identity {
    /// Username not chosen yet. Chat is blocked.
    #[default]
    Pending,
    /// Username committed to the session.
    Set(String),
}

/// Render style of a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Local echo of our own message.
    Own,
    /// Message from another user.
    Incoming,
    /// Message from the relay itself.
    Server,
    /// Error line.
    Error,
    /// Informational text such as the welcome banner.
    Info,
}

/// One entry of the chat log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    /// Render style.
    pub kind: LineKind,
    /// Formatted text. May contain line breaks from wrapping.
    pub text: String,
}

impl LogLine {
    /// Create a log line.
    pub fn new(kind: LineKind, text: impl Into<String>) -> Self {
        Self { kind, text: text.into() }
    }
}
