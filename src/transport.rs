use monoio::net::TcpStream;
use monoio_compat::StreamWrapper;
use monoio_rustls::{ClientTlsStream, TlsConnector};
use rustls::pki_types::ServerName;
use rustls::{ClientConfig, RootCertStore};
use std::sync::{Arc, OnceLock};

use crate::endpoint::{Endpoint, Scheme};

#[derive(thiserror::Error, Debug)]
pub enum TransportError {
    #[error("host is not a valid tls server name")]
    ServerName,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Tls(#[from] monoio_rustls::TlsError),
}

/// Plain TCP or TLS over TCP, both wrapped in `monoio_compat::StreamWrapper`
/// so the websocket layer sees tokio-style AsyncRead/AsyncWrite.
#[allow(clippy::large_enum_variant)]
pub enum Transport {
    Plain(StreamWrapper<TcpStream>),
    Tls(StreamWrapper<ClientTlsStream<TcpStream>>),
}

impl Transport {
    /// Establishes the underlying stream for an endpoint: TCP for `ws`,
    /// TCP + rustls for `wss`.
    pub async fn connect(endpoint: &Endpoint<'_>) -> Result<Self, TransportError> {
        let tcp = TcpStream::connect((endpoint.host, endpoint.port)).await?;
        match endpoint.scheme {
            Scheme::Ws => Ok(Transport::Plain(StreamWrapper::new(tcp))),
            Scheme::Wss => {
                let dns = ServerName::try_from(endpoint.host.to_owned())
                    .map_err(|_| TransportError::ServerName)?;
                let tls = tls_connector().connect(dns, tcp).await?;
                Ok(Transport::Tls(StreamWrapper::new(tls)))
            }
        }
    }
}

fn tls_connector() -> &'static TlsConnector {
    static CONNECTOR: OnceLock<TlsConnector> = OnceLock::new();
    CONNECTOR.get_or_init(|| {
        // Install default crypto provider
        let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

        let roots = RootCertStore {
            roots: webpki_roots::TLS_SERVER_ROOTS.to_vec(),
        };
        let cfg = ClientConfig::builder()
            .with_root_certificates(roots)
            .with_no_client_auth();
        TlsConnector::from(Arc::new(cfg))
    })
}

impl monoio_compat::AsyncRead for Transport {
    fn poll_read(
        self: core::pin::Pin<&mut Self>,
        cx: &mut core::task::Context<'_>,
        buf: &mut tokio::io::ReadBuf<'_>,
    ) -> core::task::Poll<std::io::Result<()>> {
        unsafe {
            match self.get_unchecked_mut() {
                Transport::Plain(s) => core::pin::Pin::new_unchecked(s).poll_read(cx, buf),
                Transport::Tls(s) => core::pin::Pin::new_unchecked(s).poll_read(cx, buf),
            }
        }
    }
}

impl monoio_compat::AsyncWrite for Transport {
    fn poll_write(
        self: core::pin::Pin<&mut Self>,
        cx: &mut core::task::Context<'_>,
        buf: &[u8],
    ) -> core::task::Poll<Result<usize, std::io::Error>> {
        unsafe {
            match self.get_unchecked_mut() {
                Transport::Plain(s) => core::pin::Pin::new_unchecked(s).poll_write(cx, buf),
                Transport::Tls(s) => core::pin::Pin::new_unchecked(s).poll_write(cx, buf),
            }
        }
    }

    fn poll_flush(
        self: core::pin::Pin<&mut Self>,
        cx: &mut core::task::Context<'_>,
    ) -> core::task::Poll<Result<(), std::io::Error>> {
        unsafe {
            match self.get_unchecked_mut() {
                Transport::Plain(s) => core::pin::Pin::new_unchecked(s).poll_flush(cx),
                Transport::Tls(s) => core::pin::Pin::new_unchecked(s).poll_flush(cx),
            }
        }
    }

    fn poll_shutdown(
        self: core::pin::Pin<&mut Self>,
        cx: &mut core::task::Context<'_>,
    ) -> core::task::Poll<Result<(), std::io::Error>> {
        unsafe {
            match self.get_unchecked_mut() {
                Transport::Plain(s) => core::pin::Pin::new_unchecked(s).poll_shutdown(cx),
                Transport::Tls(s) => core::pin::Pin::new_unchecked(s).poll_shutdown(cx),
            }
        }
    }
}
