use fastwebsockets::{Frame, OpCode, Role, WebSocket};

use crate::endpoint::{Scheme, parse_endpoint};
use crate::error::{ConnectionError, ProtocolError};
use crate::handshake::{self, HandshakeKey};
use crate::transport::Transport;

/// An established client websocket session. The session owns the socket and
/// releases it when dropped, on every exit path.
pub struct Connection {
    ws: WebSocket<Transport>,
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection").finish_non_exhaustive()
    }
}

impl Connection {
    /// Connects to a `ws://` or `wss://` endpoint and completes the
    /// websocket handshake.
    pub async fn open(endpoint: &str) -> Result<Self, ConnectionError> {
        let ep = parse_endpoint(endpoint)?;
        tracing::debug!(host = ep.host, port = ep.port, "connecting");

        let mut stream = Transport::connect(&ep).await?;

        let key = HandshakeKey::generate();
        handshake::send_upgrade_request(&mut stream, &ep, &key.nonce).await?;
        handshake::read_upgrade_response(&mut stream, &key.expected_accept).await?;
        tracing::debug!("websocket handshake complete");

        let mut ws = WebSocket::after_handshake(stream, Role::Client);
        ws.set_auto_close(true);
        ws.set_auto_pong(true);
        if matches!(ep.scheme, Scheme::Wss) {
            // TLS backends generally buffer writes, so gathering is less effective.
            ws.set_writev(false);
        }

        Ok(Self { ws })
    }

    /// Sends one text frame.
    pub async fn send_text(&mut self, text: &str) -> Result<(), ProtocolError> {
        self.ws
            .write_frame(Frame::text(text.as_bytes().into()))
            .await?;
        Ok(())
    }

    /// Waits for the next text frame. Ping/pong are answered in place by the
    /// frame layer; a close frame or a dropped peer before any text arrives
    /// is a protocol error.
    pub async fn recv_text(&mut self) -> Result<String, ProtocolError> {
        loop {
            let frame = self.ws.read_frame().await?;
            match frame.opcode {
                OpCode::Text => return Ok(std::str::from_utf8(&frame.payload)?.to_owned()),
                OpCode::Close => return Err(ProtocolError::ClosedBeforeReply),
                OpCode::Binary => return Err(ProtocolError::UnexpectedBinary),
                _ => {}
            }
        }
    }

    /// Announces the close (status 1000), waits for the peer's farewell, then
    /// drops. Best-effort: failures here are ignored, and dropping alone
    /// still releases the socket.
    pub async fn close(mut self) {
        let _ = self.ws.write_frame(Frame::close(1000, &[])).await;
        let _ = self.ws.read_frame().await;
        tracing::debug!("connection closed");
    }
}
