//! Transport backed by the `ureq` blocking HTTP library.
//!
//! `ureq` parses the response itself, so this transport writes the status line
//! and headers back out in wire form before handing them to the common
//! assembly step. The library has already removed chunk framing by then, so
//! `Transfer-Encoding` is left out of the rebuilt message.
//!
//! Redirects are not followed; a 3xx comes back as the response, as it does
//! from the socket-level transports.

use std::fmt;
use std::time::Duration;

use bytes::{Bytes, BytesMut};
use http::header::{CONTENT_TYPE, TRANSFER_ENCODING, USER_AGENT};
use http::request::Parts;
use tracing::{debug, trace};
use ureq::Agent;

use crate::config::ClientConfig;
use crate::protocol::{HttpClientError, HttpMessage, Request};
use crate::transport::HttpTransport;

#[derive(Debug)]
pub struct UreqTransport {
    enabled: bool,
    read_timeout: Duration,
    user_agent: String,
    exchange: Exchange,
}

#[derive(Default)]
struct Exchange {
    agent: Option<Agent>,
    request: Option<(Parts, Option<Bytes>)>,
    status_code: Option<u16>,
}

impl fmt::Debug for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Exchange")
            .field("agent", &self.agent.is_some())
            .field("request", &self.request.as_ref().map(|(parts, _)| &parts.uri))
            .field("status_code", &self.status_code)
            .finish()
    }
}

impl UreqTransport {
    pub const NAME: &'static str = "ureq";

    pub fn new(read_timeout: Duration, user_agent: impl Into<String>) -> Self {
        Self { enabled: true, read_timeout, user_agent: user_agent.into(), exchange: Exchange::default() }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        let mut transport = Self::new(config.read_timeout(), config.user_agent.clone());
        transport.enabled = config.is_transport_enabled(Self::NAME);
        transport
    }

    fn build_request(&self, request: &Request) -> Result<(Parts, Option<Bytes>), HttpClientError> {
        let mut builder = http::Request::builder().method(request.method().clone()).uri(request.uri().clone());

        let headers = request.headers();
        for (name, values) in headers.iter() {
            for value in values {
                builder = builder.header(name, value.as_str());
            }
        }
        if !headers.contains(USER_AGENT) {
            builder = builder.header(USER_AGENT, self.user_agent.as_str());
        }

        let entity = request.entity();
        if let Some(content_type) = entity.and_then(|entity| entity.content_type())
            && !headers.contains(CONTENT_TYPE)
        {
            builder = builder.header(CONTENT_TYPE, content_type);
        }

        let body = entity.map(|entity| entity.content().clone());
        let (parts, ()) = builder.body(()).map_err(|e| HttpClientError::invalid_request(format!("{request}: {e}")))?.into_parts();
        Ok((parts, body))
    }
}

fn map_error(request: &Request, error: ureq::Error) -> HttpClientError {
    match error {
        ureq::Error::Timeout(_) => HttpClientError::timeout(request),
        ureq::Error::Io(e) => HttpClientError::transport(format!("io failure for {request}: {e}")),
        e => HttpClientError::transport(format!("{request} failed: {e}")),
    }
}

impl HttpTransport for UreqTransport {
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
        let scheme = request.scheme();
        scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https")
    }

    fn prepare_to_handle_new_request(&mut self, request: &Request) -> Result<(), HttpClientError> {
        debug!("building agent");
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .max_redirects(0)
            .max_redirects_will_error(false)
            .timeout_global(Some(self.read_timeout))
            .build()
            .new_agent();

        self.exchange.request = Some(self.build_request(request)?);
        self.exchange.agent = Some(agent);
        Ok(())
    }

    fn handle_request(&mut self, request: &Request) -> Result<Bytes, HttpClientError> {
        let not_prepared = || HttpClientError::transport(format!("{} transport was not prepared for {request}", Self::NAME));
        let agent = self.exchange.agent.as_ref().ok_or_else(not_prepared)?;
        let (parts, body) = self.exchange.request.take().ok_or_else(not_prepared)?;

        let result = match body {
            Some(body) => agent.run(http::Request::from_parts(parts, &body[..])),
            None => agent.run(http::Request::from_parts(parts, ())),
        };
        let mut response = result.map_err(|e| map_error(request, e))?;

        let status = response.status();
        let body = response.body_mut().read_to_vec().map_err(|e| map_error(request, e))?;
        trace!(status = status.as_u16(), len = body.len(), "received response");

        let mut raw = BytesMut::with_capacity(body.len() + 512);
        raw.extend_from_slice(
            format!("{:?} {} {}\r\n", response.version(), status.as_str(), status.canonical_reason().unwrap_or_default()).as_bytes(),
        );
        for (name, value) in response.headers() {
            if name == TRANSFER_ENCODING {
                continue;
            }
            raw.extend_from_slice(name.as_str().as_bytes());
            raw.extend_from_slice(b": ");
            raw.extend_from_slice(value.as_bytes());
            raw.extend_from_slice(b"\r\n");
        }
        raw.extend_from_slice(b"\r\n");
        raw.extend_from_slice(&body);

        self.exchange.status_code = Some(status.as_u16());
        Ok(raw.freeze())
    }

    fn response_code(&self) -> Result<u16, HttpClientError> {
        self.exchange.status_code.ok_or_else(|| HttpClientError::malformed("no response status was recorded"))
    }

    fn tear_down(&mut self) {
        self.exchange = Exchange::default();
    }
}
