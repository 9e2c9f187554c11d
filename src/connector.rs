use crate::connection::Connection;
use crate::error::ProbeError;

/// One-shot request/response probe: opens a connection to an endpoint, sends
/// a single text message, awaits a single reply, prints both lines, closes.
///
/// Each [`run`](Connector::run) uses a fresh connection; connections are
/// never reused.
pub struct Connector {
    endpoint: String,
    message: String,
}

impl Connector {
    pub fn new(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Connector {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Performs the exchange once. Failures are not handled here; they
    /// propagate to the caller.
    pub async fn run(&self) -> Result<(), ProbeError> {
        let mut connection = Connection::open(&self.endpoint).await?;

        connection.send_text(&self.message).await?;
        println!("Sent: {}", self.message);

        let reply = connection.recv_text().await?;
        println!("Received: {}", reply);

        connection.close().await;
        Ok(())
    }
}
