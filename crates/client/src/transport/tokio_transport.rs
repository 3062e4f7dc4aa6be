//! HTTP/1.0 over a tokio socket, driven to completion on the calling thread.
//!
//! A current-thread runtime is built for each request in
//! `prepare_to_handle_new_request` and dropped again in `tear_down`, so the
//! transport keeps no reactor alive between requests.

use std::time::Duration;

use bytes::Bytes;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::runtime::{Builder, Handle, Runtime};
use tokio::time;
use tracing::{debug, trace};

use crate::codec::{HttpMessageParser, first_line, parse_status_code};
use crate::config::ClientConfig;
use crate::protocol::{HttpClientError, Request};
use crate::transport::{HttpTransport, wire};

#[derive(Debug)]
pub struct TokioTransport {
    enabled: bool,
    read_timeout: Duration,
    user_agent: String,
    parser: HttpMessageParser,
    exchange: Exchange,
}

#[derive(Debug, Default)]
struct Exchange {
    runtime: Option<Runtime>,
    wire_request: Option<Bytes>,
    status_line: Option<String>,
}

impl TokioTransport {
    pub const NAME: &'static str = "tokio";

    pub fn new(read_timeout: Duration, user_agent: impl Into<String>) -> Self {
        Self { enabled: true, read_timeout, user_agent: user_agent.into(), parser: HttpMessageParser, exchange: Exchange::default() }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        let mut transport = Self::new(config.read_timeout(), config.user_agent.clone());
        transport.enabled = config.is_transport_enabled(Self::NAME);
        transport
    }
}

async fn exchange(host: String, port: u16, wire_request: Bytes) -> Result<Vec<u8>, std::io::Error> {
    let mut stream = TcpStream::connect((host.as_str(), port)).await?;
    stream.write_all(&wire_request).await?;
    stream.flush().await?;

    let mut raw = Vec::new();
    stream.read_to_end(&mut raw).await?;
    Ok(raw)
}

impl HttpTransport for TokioTransport {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    /// Unavailable when disabled, or when called from inside a tokio runtime,
    /// where blocking on a second runtime would panic.
    fn is_available(&self) -> bool {
        if !self.enabled {
            debug!(transport = Self::NAME, "disabled by configuration");
            return false;
        }

        if Handle::try_current().is_ok() {
            debug!(transport = Self::NAME, "already inside a tokio runtime");
            return false;
        }

        true
    }

    fn can_handle(&self, request: &Request) -> bool {
        wire::is_plain_http(request)
    }

    fn prepare_to_handle_new_request(&mut self, request: &Request) -> Result<(), HttpClientError> {
        debug!("building runtime and request bytes");
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| HttpClientError::transport(format!("could not build tokio runtime: {e}")))?;

        self.exchange.runtime = Some(runtime);
        self.exchange.wire_request = Some(wire::encode_request(&self.parser, request, &self.user_agent));
        Ok(())
    }

    fn handle_request(&mut self, request: &Request) -> Result<Bytes, HttpClientError> {
        let not_prepared = || HttpClientError::transport(format!("{} transport was not prepared for {request}", Self::NAME));
        let runtime = self.exchange.runtime.as_ref().ok_or_else(not_prepared)?;
        let wire_request = self.exchange.wire_request.clone().ok_or_else(not_prepared)?;
        let (host, port) = wire::target(request)?;
        let read_timeout = self.read_timeout;

        let result = runtime.block_on(async move { time::timeout(read_timeout, exchange(host, port, wire_request)).await });

        let raw = match result {
            Ok(Ok(raw)) => raw,
            Ok(Err(e)) => return Err(HttpClientError::transport(format!("could not exchange {request}: {e}"))),
            Err(_elapsed) => return Err(HttpClientError::timeout(request)),
        };
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
