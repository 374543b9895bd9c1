//! Application input events.
//!
//! Events originate from two sources:
//! - User interaction (keys, resize) delivered by the [`crate::Driver`].
//! - Session outcomes fed back by the [`crate::Runtime`].

use tchat_client::ConnectionState;
use tchat_proto::Message;

use crate::KeyInput;

/// Events processed by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Keyboard input.
    Key(KeyInput),

    /// Terminal resize (columns, rows).
    Resize(u16, u16),

    /// Session connection state changed.
    ConnectionChanged(ConnectionState),

    /// A frame arrived from the relay.
    MessageReceived(Message),

    /// The listener read failed and the connection is down.
    Disconnected {
        /// One-line text for the chat log.
        summary: String,
        /// Underlying cause, for logs only.
        cause: String,
    },

    /// Connecting after the identity screen failed.
    ConnectFailed {
        /// One-line text for the chat log.
        summary: String,
    },

    /// A send or command failed.
    SendFailed {
        /// One-line text for the chat log.
        message: String,
    },

    /// The graceful close on quit failed.
    CloseFailed {
        /// One-line text for the chat log.
        message: String,
    },
}
