//! Error types.
//!
//! [`SessionError`] renders as the single line shown in the chat log. The
//! underlying cause is kept as the error source for logs.

use std::error::Error as _;

use tchat_proto::CodecError;
use thiserror::Error;

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Dial or upgrade failed.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Read or write failed on an open connection.
    #[error("stream error: {0}")]
    Stream(String),

    /// Peer closed the connection or the stream ended.
    #[error("connection closed by peer")]
    Closed,

    /// No connection handle is installed.
    #[error("not connected")]
    NotConnected,

    /// The operation did not finish in time.
    #[error("timed out")]
    TimedOut,
}

/// Session errors.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Connect failed. Fatal to this attempt only.
    #[error("Server Connection Failed: Try Again Later!")]
    Connection(#[source] TransportError),

    /// Writing a frame failed.
    #[error("Error sending data to the server...")]
    Send(#[source] TransportError),

    /// Encoding an outbound frame failed.
    #[error("Error sending data to the server...")]
    Encode(#[source] CodecError),

    /// Reading a frame failed.
    #[error("Disconnected!")]
    Receive(#[source] TransportError),

    /// An inbound frame was malformed.
    #[error("Disconnected!")]
    Decode(#[source] CodecError),

    /// Input used the command sigil but names no known command. Never sent.
    #[error("Invalid Command: {0}")]
    UnknownCommand(String),

    /// A listener already holds the reader.
    #[error("a listener is already waiting on this connection")]
    ListenerBusy,
}

impl SessionError {
    /// Internal cause for logs, or the message itself when there is none.
    pub fn cause(&self) -> String {
        self.source().map_or_else(|| self.to_string(), ToString::to_string)
    }

    /// True if the error came from the connection rather than local validation.
    pub fn is_connection_failure(&self) -> bool {
        !matches!(self, Self::UnknownCommand(_) | Self::ListenerBusy)
    }
}
