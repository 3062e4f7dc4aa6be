//! Blocking HTTP/1.0 over `std::net::TcpStream`.

use std::io::{ErrorKind, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use bytes::Bytes;
use tracing::{debug, trace};

use crate::codec::{HttpMessageParser, first_line, parse_status_code};
use crate::config::ClientConfig;
use crate::protocol::{HttpClientError, Request};
use crate::transport::{HttpTransport, wire};

/// Plain socket transport; the last resort in the default chain.
#[derive(Debug)]
pub struct SocketTransport {
    enabled: bool,
    read_timeout: Duration,
    user_agent: String,
    parser: HttpMessageParser,
    exchange: Exchange,
}

/// Scratch state of one request.
#[derive(Debug, Default)]
struct Exchange {
    wire_request: Option<Bytes>,
    status_line: Option<String>,
}

impl SocketTransport {
    pub const NAME: &'static str = "socket";

    pub fn new(read_timeout: Duration, user_agent: impl Into<String>) -> Self {
        Self { enabled: true, read_timeout, user_agent: user_agent.into(), parser: HttpMessageParser, exchange: Exchange::default() }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        let mut transport = Self::new(config.read_timeout(), config.user_agent.clone());
        transport.enabled = config.is_transport_enabled(Self::NAME);
        transport
    }

    fn connect(&self, request: &Request) -> Result<TcpStream, HttpClientError> {
        let (host, port) = wire::target(request)?;
        let addr = (host.as_str(), port)
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| HttpClientError::transport(format!("could not resolve {host} for {request}")))?;

        trace!(%addr, "connecting");
        let stream = TcpStream::connect_timeout(&addr, self.read_timeout).map_err(|e| match e.kind() {
            ErrorKind::TimedOut => HttpClientError::timeout(request),
            _ => HttpClientError::transport(format!("could not open socket to {request}: {e}")),
        })?;
        stream.set_read_timeout(Some(self.read_timeout))?;
        stream.set_write_timeout(Some(self.read_timeout))?;
        Ok(stream)
    }
}

impl HttpTransport for SocketTransport {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn is_available(&self) -> bool {
        if !self.enabled {
            debug!(transport = Self::NAME, "disabled by configuration");
        }
        self.enabled
    }

    fn can_handle(&self, request: &Request) -> bool {
        wire::is_plain_http(request)
    }

    fn prepare_to_handle_new_request(&mut self, request: &Request) -> Result<(), HttpClientError> {
        debug!("building request bytes");
        self.exchange.wire_request = Some(wire::encode_request(&self.parser, request, &self.user_agent));
        Ok(())
    }

    fn handle_request(&mut self, request: &Request) -> Result<Bytes, HttpClientError> {
        let wire_request = self
            .exchange
            .wire_request
            .clone()
            .ok_or_else(|| HttpClientError::transport(format!("{} transport was not prepared for {request}", Self::NAME)))?;

        let mut stream = self.connect(request)?;
        stream.write_all(&wire_request)?;
        stream.flush()?;

        let mut raw = Vec::new();
        if let Err(e) = stream.read_to_end(&mut raw) {
            return Err(match e.kind() {
                ErrorKind::WouldBlock | ErrorKind::TimedOut => HttpClientError::timeout(request),
                _ => HttpClientError::transport(format!("could not read response to {request}: {e}")),
            });
        }
        trace!(len = raw.len(), "read raw response");

        self.exchange.status_line = Some(first_line(&raw).into_owned());
        Ok(Bytes::from(raw))
    }

    fn response_code(&self) -> Result<u16, HttpClientError> {
        let status_line = self.exchange.status_line.as_deref().ok_or_else(|| HttpClientError::malformed("no status line was read"))?;
        parse_status_code(status_line)
    }

    fn tear_down(&mut self) {
        self.exchange = Exchange::default();
    }
}
