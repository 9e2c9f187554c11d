use base64::{Engine as _, engine::general_purpose::STANDARD as b64};
use httparse::Status;
use memchr::memmem::Finder;
use monoio_compat::{AsyncReadExt, AsyncWriteExt};
use rand::RngCore;
use sha1::{Digest, Sha1};
use smallvec::SmallVec;

use crate::endpoint::Endpoint;

const WS_GUID: &str = "258EAFA5-E914-47DA-95CA-C5AB0DC85B11";
const MAX_RESPONSE_BYTES: usize = 16 * 1024;

#[derive(thiserror::Error, Debug)]
pub enum HandshakeError {
    #[error("connection closed during the websocket handshake")]
    Eof,
    #[error("handshake response headers exceed 16 KiB")]
    Oversized,
    #[error("server rejected the upgrade with a non-101 status")]
    Rejected,
    #[error("response is missing the websocket upgrade headers")]
    MissingHeaders,
    #[error("Sec-WebSocket-Accept does not match the handshake key")]
    AcceptMismatch,
    #[error("malformed handshake response")]
    Malformed,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Utf8(#[from] std::str::Utf8Error),
}

/// Client nonce for one upgrade attempt, paired with the accept value the
/// server must answer with.
pub struct HandshakeKey {
    pub nonce: String,
    pub expected_accept: String,
}

impl HandshakeKey {
    pub fn generate() -> Self {
        let mut bytes = [0u8; 16];
        rand::rng().fill_bytes(&mut bytes);
        let nonce = b64.encode(bytes);
        let expected_accept = accept_key(&nonce);
        HandshakeKey {
            nonce,
            expected_accept,
        }
    }
}

/// Computes the `Sec-WebSocket-Accept` value for a `Sec-WebSocket-Key`.
pub fn accept_key(key: &str) -> String {
    let mut sha1 = Sha1::new();
    sha1.update(key.as_bytes());
    sha1.update(WS_GUID.as_bytes());
    b64.encode(sha1.finalize())
}

pub async fn send_upgrade_request<S>(
    stream: &mut S,
    endpoint: &Endpoint<'_>,
    nonce: &str,
) -> Result<(), HandshakeError>
where
    S: AsyncWriteExt + Unpin,
{
    let mut request = SmallVec::<[u8; 512]>::new();
    request.extend_from_slice(b"GET ");
    request.extend_from_slice(endpoint.path_and_query.as_bytes());
    request.extend_from_slice(b" HTTP/1.1\r\nHost: ");
    request.extend_from_slice(endpoint.host.as_bytes());
    if !endpoint.is_default_port() {
        request.push(b':');
        request.extend_from_slice(endpoint.port.to_string().as_bytes());
    }
    request.extend_from_slice(
        b"\r\nUpgrade: websocket\r\nConnection: Upgrade\r\nSec-WebSocket-Version: 13\r\nSec-WebSocket-Key: ",
    );
    request.extend_from_slice(nonce.as_bytes());
    request.extend_from_slice(b"\r\n\r\n");

    stream.write_all(&request).await?;
    stream.flush().await?;
    Ok(())
}

pub async fn read_upgrade_response<S>(
    stream: &mut S,
    expected_accept: &str,
) -> Result<(), HandshakeError>
where
    S: AsyncReadExt + Unpin,
{
    let mut raw = Vec::with_capacity(2048);
    let mut chunk = [0u8; 1024];
    let finder = Finder::new(b"\r\n\r\n");
    let mut scan_from = 0;

    loop {
        if finder.find(&raw[scan_from..]).is_some() {
            break;
        }
        // Re-scan the tail in case the terminator straddles two reads.
        scan_from = raw.len().saturating_sub(3);

        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Err(HandshakeError::Eof);
        }
        raw.extend_from_slice(&chunk[..n]);
        if raw.len() > MAX_RESPONSE_BYTES {
            return Err(HandshakeError::Oversized);
        }
    }

    validate_upgrade_response(&raw, expected_accept)
}

fn validate_upgrade_response(raw: &[u8], expected_accept: &str) -> Result<(), HandshakeError> {
    let mut headers = [httparse::EMPTY_HEADER; 32];
    let mut response = httparse::Response::new(&mut headers);
    let Ok(Status::Complete(_)) = response.parse(raw) else {
        return Err(HandshakeError::Malformed);
    };

    if response.code != Some(101) {
        return Err(HandshakeError::Rejected);
    }

    let connection =
        header_value(response.headers, "Connection").ok_or(HandshakeError::MissingHeaders)?;
    if !has_token(connection, "upgrade")? {
        return Err(HandshakeError::MissingHeaders);
    }

    let upgrade =
        header_value(response.headers, "Upgrade").ok_or(HandshakeError::MissingHeaders)?;
    if !std::str::from_utf8(upgrade)?.eq_ignore_ascii_case("websocket") {
        return Err(HandshakeError::MissingHeaders);
    }

    let accept = header_value(response.headers, "Sec-WebSocket-Accept")
        .ok_or(HandshakeError::MissingHeaders)?;
    if std::str::from_utf8(accept)? != expected_accept {
        return Err(HandshakeError::AcceptMismatch);
    }

    Ok(())
}

fn header_value<'a>(headers: &'a [httparse::Header<'a>], name: &str) -> Option<&'a [u8]> {
    headers
        .iter()
        .find(|h| h.name.eq_ignore_ascii_case(name))
        .map(|h| h.value)
}

fn has_token(value: &[u8], token: &str) -> Result<bool, std::str::Utf8Error> {
    let text = std::str::from_utf8(value)?;
    Ok(text
        .split(',')
        .any(|part| part.trim().eq_ignore_ascii_case(token)))
}
