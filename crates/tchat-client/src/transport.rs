//! WebSocket transport for the client.
//!
//! Provides [`WsConnector`], which dials the relay with `tokio-tungstenite`
//! and splits the socket into a [`WsWriter`] and [`WsReader`]. One JSON
//! message per WebSocket data frame. TLS for `wss://` endpoints uses rustls
//! with the webpki root store.

use futures::{
    SinkExt, StreamExt,
    stream::{SplitSink, SplitStream},
};
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, tungstenite::Message as WsMessage};

use crate::{Connector, FrameReader, FrameWriter, Payload, TransportError};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Connector for `ws://` and `wss://` relay endpoints.
#[derive(Debug, Clone, Copy, Default)]
pub struct WsConnector;

impl Connector for WsConnector {
    type Writer = WsWriter;
    type Reader = WsReader;

    async fn connect(&mut self, endpoint: &str) -> Result<(WsWriter, WsReader), TransportError> {
        install_crypto_provider();
        let (socket, response) = tokio_tungstenite::connect_async(endpoint)
            .await
            .map_err(|e| TransportError::Connection(e.to_string()))?;
        tracing::debug!(status = %response.status(), "websocket upgrade complete");

        let (sink, stream) = socket.split();
        Ok((WsWriter { sink }, WsReader { stream }))
    }
}

/// Select ring as the process-wide rustls provider unless one is set.
fn install_crypto_provider() {
    if rustls::crypto::CryptoProvider::get_default().is_none() {
        let _ = rustls::crypto::ring::default_provider().install_default();
    }
}

/// Sending half of a WebSocket connection.
pub struct WsWriter {
    sink: SplitSink<WsStream, WsMessage>,
}

impl FrameWriter for WsWriter {
    async fn send(&mut self, payload: String) -> Result<(), TransportError> {
        self.sink
            .send(WsMessage::Text(payload))
            .await
            .map_err(|e| TransportError::Stream(format!("write failed: {e}")))
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.sink.close().await.map_err(|e| TransportError::Stream(format!("close failed: {e}")))
    }
}

/// Receiving half of a WebSocket connection.
pub struct WsReader {
    stream: SplitStream<WsStream>,
}

impl FrameReader for WsReader {
    async fn recv(&mut self) -> Result<Payload, TransportError> {
        loop {
            match self.stream.next().await {
                Some(Ok(WsMessage::Text(text))) => return Ok(Payload::Text(text)),
                Some(Ok(WsMessage::Binary(bytes))) => return Ok(Payload::Binary(bytes)),
                Some(Ok(WsMessage::Close(frame))) => {
                    tracing::debug!(?frame, "relay closed the connection");
                    return Err(TransportError::Closed);
                },
                // Ping replies are queued by tungstenite itself
                Some(Ok(WsMessage::Ping(_) | WsMessage::Pong(_) | WsMessage::Frame(_))) => {},
                Some(Err(e)) => return Err(TransportError::Stream(format!("read failed: {e}"))),
                None => return Err(TransportError::Closed),
            }
        }
    }
}
