//! Chain-of-responsibility adapter around one transport.
//!
//! [`HttpExecutionCommand`] is the fixed driver for the transport lifecycle.
//! For every request it:
//!
//! 1. declines, untouched, if the transport is unavailable or cannot handle
//!    the request
//! 2. calls `prepare_to_handle_new_request`, then `handle_request`
//! 3. assembles a [`Response`] from the raw message: status from
//!    `response_code`, headers from the header block, entity from the body
//! 4. calls `tear_down`, whether steps 2 and 3 succeeded or not
//!
//! A failure in steps 2 or 3 is returned to the caller after tear-down; it is
//! never turned into a decline.

use std::fmt;

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use tracing::{Span, debug, debug_span, error, trace};

use crate::codec::HttpMessageParser;
use crate::ensure;
use crate::protocol::{Entity, HttpClientError, HttpMessage, Request, Response};
use crate::transport::HttpTransport;

/// Whether a command took responsibility for the request.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ChainStatus {
    /// The command produced a response; the chain stops here.
    Handled,
    /// The command did not try; the chain moves on.
    Declined,
}

/// Per-execution state passed along the transport chain.
///
/// Created for a single `execute` call and dropped at its end.
#[derive(Debug)]
pub struct ExecutionContext<'a> {
    request: &'a Request,
    response: Option<Response>,
}

impl<'a> ExecutionContext<'a> {
    pub fn new(request: &'a Request) -> Self {
        Self { request, response: None }
    }

    pub fn request(&self) -> &'a Request {
        self.request
    }

    pub fn put_response(&mut self, response: Response) {
        self.response = Some(response);
    }

    pub fn take_response(&mut self) -> Option<Response> {
        self.response.take()
    }
}

pub struct HttpExecutionCommand {
    transport: Box<dyn HttpTransport>,
    parser: HttpMessageParser,
    span: Span,
}

impl fmt::Debug for HttpExecutionCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpExecutionCommand").field("transport", &self.transport.name()).finish_non_exhaustive()
    }
}

impl HttpExecutionCommand {
    pub fn new<T: HttpTransport + 'static>(transport: T) -> Self {
        Self::from_boxed(Box::new(transport))
    }

    pub fn from_boxed(transport: Box<dyn HttpTransport>) -> Self {
        let span = debug_span!("transport", name = transport.name());
        Self { transport, parser: HttpMessageParser, span }
    }

    /// Replaces the span this command logs under.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn transport_name(&self) -> &'static str {
        self.transport.name()
    }

    /// Runs the command against the request in `context`.
    ///
    /// On success the response is published into the context and
    /// [`ChainStatus::Handled`] is returned.
    pub fn execute(&mut self, context: &mut ExecutionContext<'_>) -> Result<ChainStatus, HttpClientError> {
        let span = self.span.clone();
        let _entered = span.enter();

        let request = context.request();
        debug!(%request, "seeing if able to handle");

        if !self.transport.is_available() || !self.transport.can_handle(request) {
            debug!(%request, "declined to handle");
            return Ok(ChainStatus::Declined);
        }

        debug!(%request, "offered to handle, now initializing");
        let response = self.handle(request)?;
        context.put_response(response);
        Ok(ChainStatus::Handled)
    }

    /// Executes `request` on the transport, tearing down on every path.
    pub fn handle(&mut self, request: &Request) -> Result<Response, HttpClientError> {
        let result = self.run_lifecycle(request);

        if let Err(e) = &result {
            error!(%request, cause = %e, "caught error when handling, will re-raise after tear down");
        }

        debug!(%request, "tearing down");
        self.transport.tear_down();

        if result.is_ok() {
            debug!(%request, "successfully handled");
        }
        result
    }

    fn run_lifecycle(&mut self, request: &Request) -> Result<Response, HttpClientError> {
        debug!(%request, "preparing to handle");
        self.transport.prepare_to_handle_new_request(request)?;

        debug!(%request, "now handling");
        let raw = self.transport.handle_request(request)?;

        debug!(%request, "assembling response");
        self.build_response(&raw, request)
    }

    fn build_response(&self, raw: &[u8], request: &Request) -> Result<Response, HttpClientError> {
        let headers_section = self.parser.headers_section(raw);
        ensure!(!headers_section.is_empty(), HttpClientError::malformed("could not parse headers from response"));

        let body = self.parser.body_section(raw).unwrap_or_default();
        let header_lines = self.parser.header_lines(headers_section);
        let headers = self.parser.parse_header_block(&String::from_utf8_lossy(header_lines));

        let mut response = Response::new();

        let status_code = self.transport.response_code()?;
        debug!(%request, status = status_code, "received status");
        response.set_status_code(status_code);

        ensure!(!headers.is_empty(), HttpClientError::malformed(format!("no headers in response from {request}")));
        trace!(count = headers.len(), "response headers");
        for (name, values) in headers.iter() {
            for value in values {
                trace!(header = name, value = value.as_str(), "response header");
                response.headers_mut().append(name, value.as_str());
            }
        }

        let mut entity = Entity::new(Bytes::copy_from_slice(body));
        if let Some(content_type) = response.headers().get(CONTENT_TYPE) {
            entity.set_content_type(content_type.into_owned());
        }
        response.set_entity(entity);

        Ok(response)
    }
}
