//! Connection abstraction.
//!
//! A full-duplex, message-oriented connection split into its two halves.
//! Each call moves exactly one logical frame; framing belongs to the
//! underlying transport.

use std::future::Future;

use crate::TransportError;

/// One inbound frame as delivered by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Text frame.
    Text(String),
    /// Binary frame. Expected to carry UTF-8 JSON.
    Binary(Vec<u8>),
}

/// Dials the relay.
///
/// # Implementations
///
/// - **WebSocket**: [`crate::transport::WsConnector`] (feature `transport`)
/// - **Simulation**: in-memory relay used by tests
pub trait Connector: Send {
    /// Sending half handed to the session.
    type Writer: FrameWriter;

    /// Receiving half lent to listeners.
    type Reader: FrameReader;

    /// Open a connection to `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint cannot be reached or rejects the
    /// upgrade.
    fn connect(
        &mut self,
        endpoint: &str,
    ) -> impl Future<Output = Result<(Self::Writer, Self::Reader), TransportError>> + Send;
}

/// Sending half of a connection.
pub trait FrameWriter: Send {
    /// Write one frame.
    fn send(&mut self, payload: String) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Close the connection. Safe to call on a broken connection.
    fn close(&mut self) -> impl Future<Output = Result<(), TransportError>> + Send;
}

/// Receiving half of a connection.
pub trait FrameReader: Send + 'static {
    /// Wait for the next frame.
    ///
    /// Control traffic (ping/pong) is consumed internally. A close from the
    /// peer or end of stream is [`TransportError::Closed`].
    fn recv(&mut self) -> impl Future<Output = Result<Payload, TransportError>> + Send;
}
