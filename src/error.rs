//! Error taxonomy for the probe: failures reaching the endpoint versus
//! failures of the frame exchange once the connection is up.

use crate::endpoint::EndpointError;
use crate::handshake::HandshakeError;
use crate::transport::TransportError;

/// The endpoint was unreachable or refused the websocket handshake.
#[derive(thiserror::Error, Debug)]
pub enum ConnectionError {
    #[error(transparent)]
    Endpoint(#[from] EndpointError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Handshake(#[from] HandshakeError),
}

/// The connection was established but the peer closed it or broke the frame
/// protocol before a reply arrived.
#[derive(thiserror::Error, Debug)]
pub enum ProtocolError {
    #[error("connection closed before a reply arrived")]
    ClosedBeforeReply,
    #[error("expected a text reply, received a binary frame")]
    UnexpectedBinary,
    #[error("reply is not valid utf-8")]
    Utf8(#[from] std::str::Utf8Error),
    #[error(transparent)]
    Frame(#[from] fastwebsockets::WebSocketError),
}

/// Top-level failure of one probe run. Everything up to and including the
/// 101 response is a connection error; everything after is a protocol error.
#[derive(thiserror::Error, Debug)]
pub enum ProbeError {
    #[error("connection error: {0}")]
    Connection(#[from] ConnectionError),
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}
