//! Transports perform the raw HTTP exchange for a request.
//!
//! A transport only has to report whether it can run in the current
//! environment, whether it understands a request's scheme, and how to turn a
//! request into raw response bytes. The fixed lifecycle around those hooks
//! (prepare, handle, assemble the response, tear down) lives in
//! [`HttpExecutionCommand`](crate::exec::HttpExecutionCommand), so every
//! transport gets identical parsing, logging and clean-up behaviour.
//!
//! The bundled transports, in default priority order:
//!
//! - [`UreqTransport`]: blocking HTTP library, `http` and `https`
//! - [`TokioTransport`]: HTTP/1.0 over a tokio socket, `http` only
//! - [`SocketTransport`]: HTTP/1.0 over a std socket, `http` only

use bytes::Bytes;

use crate::protocol::{HttpClientError, Request};

mod socket_transport;
pub use socket_transport::SocketTransport;

mod tokio_transport;
pub use tokio_transport::TokioTransport;

mod ureq_transport;
pub use ureq_transport::UreqTransport;

mod wire;

/// Raw I/O capability wrapped by the execution chain.
///
/// Implementations may keep per-request scratch state between
/// [`prepare_to_handle_new_request`](HttpTransport::prepare_to_handle_new_request)
/// and [`tear_down`](HttpTransport::tear_down); `tear_down` is always called
/// after a handled request, on success and on failure, and must leave nothing
/// behind for the next request.
#[cfg_attr(test, mockall::automock)]
pub trait HttpTransport: Send {
    /// Short name used in logs and in `ClientConfig::disabled_transports`.
    fn name(&self) -> &'static str;

    /// Whether the underlying mechanism can be used in this environment.
    /// Must not perform I/O.
    fn is_available(&self) -> bool;

    /// Whether this transport supports the request, usually by scheme.
    /// Must not perform I/O.
    fn can_handle(&self, request: &Request) -> bool;

    /// Builds the per-request configuration.
    fn prepare_to_handle_new_request(&mut self, _request: &Request) -> Result<(), HttpClientError> {
        Ok(())
    }

    /// Performs the exchange and returns the raw response message: status
    /// line, header lines, blank line, body.
    fn handle_request(&mut self, request: &Request) -> Result<Bytes, HttpClientError>;

    /// Status code of the response read by the last `handle_request`.
    fn response_code(&self) -> Result<u16, HttpClientError>;

    /// Releases per-request scratch state.
    fn tear_down(&mut self) {}
}
