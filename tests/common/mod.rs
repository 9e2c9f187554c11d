//! In-process WebSocket servers for exercising the probe.

use std::future::Future;

use anyhow::{Context, Result, bail};
use fastwebsockets::{OpCode, Role, WebSocket};
use monoio::net::{TcpListener, TcpStream};
use monoio_compat::{AsyncReadExt, AsyncWriteExt, StreamWrapper};

use ws_probe::handshake::accept_key;

pub fn block_on<F: Future>(fut: F) -> F::Output {
    let mut runtime = monoio::RuntimeBuilder::<monoio::FusionDriver>::new()
        .enable_all()
        .build()
        .expect("failed to build monoio runtime");
    runtime.block_on(fut)
}

/// Accepts one connection and answers the websocket upgrade.
pub async fn accept_websocket(
    listener: &TcpListener,
) -> Result<WebSocket<StreamWrapper<TcpStream>>> {
    let (stream, _) = listener.accept().await?;
    let mut stream = StreamWrapper::new(stream);

    let request = read_request_headers(&mut stream).await?;
    let key = sec_websocket_key(&request)?;

    let response = format!(
        "HTTP/1.1 101 Switching Protocols\r\n\
         Upgrade: websocket\r\n\
         Connection: Upgrade\r\n\
         Sec-WebSocket-Accept: {}\r\n\r\n",
        accept_key(&key)
    );
    stream.write_all(response.as_bytes()).await?;
    stream.flush().await?;

    let mut ws = WebSocket::after_handshake(stream, Role::Server);
    ws.set_auto_close(true);
    ws.set_auto_pong(true);
    ws.set_writev(false);
    Ok(ws)
}

pub async fn read_request_headers(stream: &mut StreamWrapper<TcpStream>) -> Result<Vec<u8>> {
    let mut raw = Vec::with_capacity(1024);
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            bail!("client hung up during the handshake");
        }
        raw.extend_from_slice(&chunk[..n]);
        if raw.windows(4).any(|w| w == b"\r\n\r\n") {
            return Ok(raw);
        }
        if raw.len() > 16 * 1024 {
            bail!("oversized handshake request");
        }
    }
}

fn sec_websocket_key(raw: &[u8]) -> Result<String> {
    let mut headers = [httparse::EMPTY_HEADER; 32];
    let mut request = httparse::Request::new(&mut headers);
    let status = request.parse(raw).context("malformed upgrade request")?;
    if !status.is_complete() {
        bail!("incomplete upgrade request");
    }
    let key = request
        .headers
        .iter()
        .find(|h| h.name.eq_ignore_ascii_case("Sec-WebSocket-Key"))
        .context("request is missing Sec-WebSocket-Key")?;
    Ok(std::str::from_utf8(key.value)?.trim().to_owned())
}

/// What the server observed while serving one probe exchange.
pub struct EchoReport {
    pub message: String,
    pub farewell: OpCode,
    pub peer_gone: bool,
}

/// Serves exactly one probe: echoes the first text frame back, then records
/// the client's farewell and whether the socket was released afterwards.
pub async fn echo_once(listener: &TcpListener) -> Result<EchoReport> {
    let mut ws = accept_websocket(listener).await?;

    let frame = ws.read_frame().await?;
    if frame.opcode != OpCode::Text {
        bail!("expected a text frame, got {:?}", frame.opcode);
    }
    let message = std::str::from_utf8(&frame.payload)?.to_owned();
    ws.write_frame(frame).await?;

    let farewell = ws.read_frame().await?;
    let peer_gone = ws.read_frame().await.is_err();

    Ok(EchoReport {
        message,
        farewell: farewell.opcode,
        peer_gone,
    })
}
