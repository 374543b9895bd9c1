//! Single-read listener task.
//!
//! A [`Listener`] is not a background reader feeding a queue. It performs
//! one read, then hands the reader back inside its [`ListenOutcome`]. The
//! scheduler decides whether to lend the reader out again, so reads are
//! chained strictly one after another off the previous completion.

use tchat_proto::Message;

use crate::{FrameReader, Payload, SessionError};

/// Unit of work that owns the connection reader for exactly one read.
///
/// Obtained from [`crate::Session::arm_listener`]. While a `Listener` exists,
/// the session has no reader and cannot start another read.
#[derive(Debug)]
pub struct Listener<R> {
    reader: R,
    epoch: u64,
}

impl<R: FrameReader> Listener<R> {
    pub(crate) fn new(reader: R, epoch: u64) -> Self {
        Self { reader, epoch }
    }

    /// Connection epoch this listener reads from.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Perform one blocking read and decode.
    ///
    /// Never fails directly: the result travels in the outcome together with
    /// the reader so the session can decide what happens next.
    pub async fn listen(mut self) -> ListenOutcome<R> {
        let result = match self.reader.recv().await {
            Ok(payload) => decode_payload(&payload),
            Err(e) => Err(SessionError::Receive(e)),
        };
        ListenOutcome { reader: self.reader, epoch: self.epoch, result }
    }
}

fn decode_payload(payload: &Payload) -> Result<Message, SessionError> {
    match payload {
        Payload::Text(text) => tchat_proto::decode(text),
        Payload::Binary(bytes) => tchat_proto::decode_bytes(bytes),
    }
    .map_err(SessionError::Decode)
}

/// Result of one [`Listener::listen`] call.
///
/// Must be returned to [`crate::Session::complete_listen`], which re-parks
/// the reader or records the disconnect.
#[derive(Debug)]
pub struct ListenOutcome<R> {
    pub(crate) reader: R,
    pub(crate) epoch: u64,
    pub(crate) result: Result<Message, SessionError>,
}

impl<R> ListenOutcome<R> {
    /// Connection epoch the read was issued against.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// True if the read produced a message.
    pub fn is_message(&self) -> bool {
        self.result.is_ok()
    }
}

/// Scheduler-facing event produced by completing a listen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenEvent {
    /// A frame arrived and decoded.
    Message(Message),

    /// The read failed. The connection is marked down and no further listen
    /// may be scheduled until a fresh connect.
    Disconnected {
        /// One-line text for the chat log.
        summary: String,
        /// Underlying cause for logs.
        cause: String,
    },
}
