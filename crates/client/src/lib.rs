//! A blocking micro HTTP client with pluggable transports and decoders
//!
//! This crate executes HTTP requests through an ordered chain of transport
//! backends, normalizes the raw wire response into a structured [`Response`],
//! and post-processes the response body through a chain of decoders.
//!
//! # Features
//!
//! - Transport selection by availability and URL scheme, first match wins
//! - Bundled transports: `ureq`, tokio socket, std socket
//! - Lenient HTTP/1.x message parsing
//! - Chunked transfer decoding
//! - `gzip`, `deflate`, `zstd` and `br` content decoding
//! - Structured logging through `tracing`
//!
//! # Example
//!
//! ```no_run
//! use micro_http_client::client::HttpClient;
//! use micro_http_client::config::ClientConfig;
//! use micro_http_client::handler::EntityContentHandler;
//! use micro_http_client::protocol::Request;
//! use tracing::{Level, error, info};
//! use tracing_subscriber::FmtSubscriber;
//!
//! fn main() {
//!     let subscriber = FmtSubscriber::builder().with_max_level(Level::DEBUG).finish();
//!     tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
//!
//!     let mut client = HttpClient::from_config(&ClientConfig::default());
//!     let request = match Request::get("http://example.com/") {
//!         Ok(request) => request,
//!         Err(e) => {
//!             error!(cause = %e, "invalid request");
//!             return;
//!         }
//!     };
//!
//!     match client.execute_and_handle_response(&request, &EntityContentHandler) {
//!         Ok(Some(body)) => info!(len = body.len(), "received body"),
//!         Ok(None) => info!("received no body"),
//!         Err(e) => error!(cause = %e, "request failed"),
//!     }
//! }
//! ```
//!
//! # Architecture
//!
//! - [`protocol`]: request, response, headers, entity and the error type
//! - [`codec`]: raw message splitting, header and status line parsing, chunked framing
//! - [`transport`]: the [`transport::HttpTransport`] capability and its implementations
//! - [`exec`]: the per-transport lifecycle driver and the transport chain
//! - [`decoding`]: decoder chains applied to parsed responses
//! - [`handler`]: response handlers for the handler-based call shape
//! - [`client`]: the [`client::HttpClient`] facade
//! - [`config`]: [`config::ClientConfig`], deserializable with serde
//!
//! # Error Handling
//!
//! Every fallible operation returns [`protocol::HttpClientError`]. A transport
//! that declines a request is not an error; the next transport is tried. A
//! transport that fails ends the execution with its error, after tear-down.
//!
//! [`Response`]: protocol::Response

pub mod client;
pub mod codec;
pub mod config;
pub mod decoding;
pub mod exec;
pub mod handler;
pub mod protocol;
pub mod transport;

mod utils;
pub(crate) use utils::ensure;
