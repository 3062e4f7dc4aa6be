//! The client facade.
//!
//! [`HttpClient`] runs a request through the transport chain, passes the
//! response through every registered decoder in order, and returns it or hands
//! it to a response handler.
//!
//! # Example
//!
//! ```no_run
//! use micro_http_client::client::HttpClient;
//! use micro_http_client::config::ClientConfig;
//! use micro_http_client::protocol::Request;
//!
//! # fn main() -> Result<(), micro_http_client::protocol::HttpClientError> {
//! let mut client = HttpClient::from_config(&ClientConfig::default());
//! let response = client.execute(&Request::get("http://example.com/")?)?;
//! println!("status: {}", response.status_code());
//! # Ok(())
//! # }
//! ```

use tracing::{Span, debug, debug_span, trace};

use bytes::Bytes;

use crate::config::ClientConfig;
use crate::decoding::{DecoderChain, ResponseDecoder};
use crate::exec::{HttpExecutionCommand, TransportChain};
use crate::handler::HttpResponseHandler;
use crate::protocol::{HttpClientError, HttpMessage, Request, Response};
use crate::transport::{HttpTransport, SocketTransport, TokioTransport, UreqTransport};

pub struct HttpClient {
    transports: TransportChain,
    decoders: Vec<Box<dyn ResponseDecoder>>,
    span: Span,
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("transports", &self.transports.transport_names().collect::<Vec<_>>())
            .field("decoders", &self.decoders.len())
            .finish()
    }
}

impl HttpClient {
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::new()
    }

    /// Builds the default pipeline: `ureq`, `tokio` and `socket` transports in
    /// that order, then the transfer and content decoders enabled in `config`.
    pub fn from_config(config: &ClientConfig) -> Self {
        let mut builder = Self::builder()
            .transport(UreqTransport::from_config(config))
            .transport(TokioTransport::from_config(config))
            .transport(SocketTransport::from_config(config));

        if config.decode_transfer_encoding {
            builder = builder.decoder(DecoderChain::transfer());
        }
        if config.decode_content_encoding {
            builder = builder.decoder(DecoderChain::content());
        }

        builder.build()
    }

    pub fn transport_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.transports.transport_names()
    }

    /// Executes `request` and returns the decoded response.
    pub fn execute(&mut self, request: &Request) -> Result<Response, HttpClientError> {
        let span = self.span.clone();
        let _entered = span.enter();

        let mut response = self.transports.execute(request, &span)?;
        log_response(request, &response);

        for decoder in &self.decoders {
            decoder.decode(&mut response)?;
        }

        Ok(response)
    }

    /// Executes `request` and returns what `handler` extracts from the
    /// decoded response.
    pub fn execute_and_handle_response<H>(&mut self, request: &Request, handler: &H) -> Result<Option<Bytes>, HttpClientError>
    where
        H: HttpResponseHandler + ?Sized,
    {
        let response = self.execute(request)?;
        handler.handle(&response)
    }
}

fn log_response(request: &Request, response: &Response) {
    debug!(%request, status = response.status_code(), headers = response.headers().len(), "received response");
    for (name, values) in response.headers().iter() {
        trace!(header = name, value = %values.join(", "), "response header");
    }
}

/// Assembles an [`HttpClient`] from explicit transports and decoders.
pub struct HttpClientBuilder {
    transports: TransportChain,
    decoders: Vec<Box<dyn ResponseDecoder>>,
    span: Span,
}

impl std::fmt::Debug for HttpClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClientBuilder")
            .field("transports", &self.transports.transport_names().collect::<Vec<_>>())
            .field("decoders", &self.decoders.len())
            .finish()
    }
}

impl HttpClientBuilder {
    fn new() -> Self {
        Self { transports: TransportChain::new(), decoders: Vec::new(), span: debug_span!("http_client") }
    }

    /// Appends a transport; transports are tried in the order added.
    pub fn transport<T: HttpTransport + 'static>(mut self, transport: T) -> Self {
        self.transports.add_command(HttpExecutionCommand::new(transport));
        self
    }

    /// Appends a decoder; decoders run in the order added.
    pub fn decoder<D: ResponseDecoder + 'static>(mut self, decoder: D) -> Self {
        self.decoders.push(Box::new(decoder));
        self
    }

    pub fn span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn build(self) -> HttpClient {
        HttpClient { transports: self.transports, decoders: self.decoders, span: self.span }
    }
}
