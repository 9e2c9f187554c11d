#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Ws,
    Wss,
}

impl Scheme {
    pub fn default_port(self) -> u16 {
        match self {
            Scheme::Ws => 80,
            Scheme::Wss => 443,
        }
    }
}

/// Parsed form of a `ws://` or `wss://` address string. Borrows from the
/// input; the address itself never changes after parsing.
#[derive(Debug, Clone)]
pub struct Endpoint<'a> {
    pub scheme: Scheme,
    pub host: &'a str,
    pub port: u16,
    pub path_and_query: &'a str,
}

impl Endpoint<'_> {
    pub fn is_default_port(&self) -> bool {
        self.port == self.scheme.default_port()
    }
}

#[derive(thiserror::Error, Debug)]
pub enum EndpointError {
    #[error("endpoint must start with ws:// or wss://")]
    Scheme,
    #[error("endpoint host is empty")]
    Host,
    #[error("invalid endpoint port")]
    Port,
}

pub fn parse_endpoint(input: &str) -> Result<Endpoint<'_>, EndpointError> {
    let (scheme, rest) = if let Some(s) = input.strip_prefix("wss://") {
        (Scheme::Wss, s)
    } else if let Some(s) = input.strip_prefix("ws://") {
        (Scheme::Ws, s)
    } else {
        return Err(EndpointError::Scheme);
    };

    let (host_port, path_and_query) = match rest.find('/') {
        Some(i) => (&rest[..i], &rest[i..]),
        None => (rest, "/"),
    };

    let (host, port) = match host_port.rsplit_once(':') {
        Some((h, p)) => (h, p.parse().map_err(|_| EndpointError::Port)?),
        None => (host_port, scheme.default_port()),
    };
    if host.is_empty() {
        return Err(EndpointError::Host);
    }

    Ok(Endpoint {
        scheme,
        host,
        port,
        path_and_query,
    })
}
