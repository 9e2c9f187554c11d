//! # ws-probe
//!
//! A one-shot WebSocket probe for the [`monoio`] async runtime using
//! `io_uring` on Linux. It opens a connection to a `ws://` or `wss://`
//! endpoint, sends a single text message, awaits a single reply, prints both,
//! and closes: a round-trip health check for WebSocket servers.
//!
//! ## Features
//!
//! - **🚀 monoio native**: built on `monoio` with `io_uring` for efficient I/O on Linux
//! - **🔒 TLS Support**: full `wss://` support via `monoio-rustls` with `webpki-roots` validation
//! - **🤝 Real handshake**: RFC 6455 client upgrade with `Sec-WebSocket-Accept` verification
//! - **🧹 Scoped connections**: the socket is released on every exit path, success or failure
//! - **🔧 Simple API**: one `Connector` for the probe, one `Connection` for finer control
//!
//! ## Quick Start
//!
//! Add to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! ws-probe = "0.1"
//! monoio = "0.2"
//! anyhow = "1.0"
//! ```
//!
//! ## Probe Example
//!
//! ```no_run
//! use ws_probe::Connector;
//!
//! #[monoio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // One round trip: prints "Sent: ..." and "Received: ..."
//!     Connector::new("ws://localhost:8765", "Hello, server!")
//!         .run()
//!         .await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Connection Example
//!
//! ```no_run
//! use ws_probe::Connection;
//!
//! #[monoio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut connection = Connection::open("wss://echo.websocket.org/").await?;
//!     connection.send_text("Hello, WebSocket!").await?;
//!     let reply = connection.recv_text().await?;
//!     println!("Received: {}", reply);
//!     connection.close().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Errors
//!
//! A probe fails in one of two ways: [`ConnectionError`] when the endpoint is
//! unreachable or refuses the handshake, and [`ProtocolError`] when the peer
//! closes or breaks the frame protocol before a reply arrives. Neither is
//! recovered from; both propagate to the caller.
//!
//! ## Platform Support
//!
//! - **Linux**: full support with `io_uring` (recommended)
//! - **macOS/Windows**: limited support (falls back to standard async I/O)
//!
//! [`monoio`]: https://docs.rs/monoio

pub mod connection;
pub mod connector;
pub mod endpoint;
pub mod error;
pub mod handshake;
pub mod transport;

pub use connection::Connection;
pub use connector::Connector;
pub use error::{ConnectionError, ProbeError, ProtocolError};
