//! Client session core
//!
//! Owns the single connection to the chat relay and the rules for what may
//! be sent on it. The UI never touches the connection directly: it drives a
//! [`Session`] and schedules [`Listener`] reads.
//!
//! # Architecture
//!
//! The session is generic over a [`Connector`], which dials the relay and
//! hands back a split connection: a [`FrameWriter`] that stays inside the
//! session and a [`FrameReader`] that is lent out to exactly one
//! [`Listener`] at a time. Because the reader is moved, not shared, a second
//! concurrent read cannot be expressed.
//!
//! # Components
//!
//! - [`Session`]: connect, handshake, send, receive, close
//! - [`Listener`]: single-read unit of work that returns the reader when done
//! - [`Command`]: in-chat commands typed with the `:` sigil
//! - [`SessionError`]: error taxonomy with user-facing one-line messages
//!
//! # Transport (optional)
//!
//! With the `transport` feature enabled, this crate also provides:
//! - [`transport::WsConnector`]: WebSocket connector (`ws://` and `wss://`)

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod command;
mod connection;
mod error;
mod listener;
mod session;

#[cfg(feature = "transport")]
pub mod transport;

pub use command::{COMMAND_SIGIL, Command};
pub use connection::{Connector, FrameReader, FrameWriter, Payload};
pub use error::{SessionError, TransportError};
pub use listener::{ListenEvent, ListenOutcome, Listener};
pub use session::{ConnectionState, Session};
pub use tchat_proto::{Config, Direction, Message};
