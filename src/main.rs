//! One-shot probe binary: sends a single text frame to the fixed endpoint,
//! awaits a single reply, and prints both lines.

use anyhow::Result;
use tracing_subscriber::EnvFilter;
use ws_probe::Connector;

const ENDPOINT: &str = "ws://localhost:8765";
const MESSAGE: &str = "Hello, server!";

#[monoio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries only the Sent/Received lines.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    Connector::new(ENDPOINT, MESSAGE).run().await?;
    Ok(())
}
