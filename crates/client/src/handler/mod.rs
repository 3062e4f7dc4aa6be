//! Response handlers for [`HttpClient::execute_and_handle_response`].
//!
//! A handler receives the decoded response and extracts the raw content the
//! caller is interested in. Closures are turned into handlers with
//! [`make_handler`].
//!
//! [`HttpClient::execute_and_handle_response`]: crate::client::HttpClient::execute_and_handle_response

use bytes::Bytes;

use crate::protocol::{HttpClientError, HttpMessage, Response};

pub trait HttpResponseHandler {
    /// Returns the content extracted from `response`, `None` when there is
    /// nothing to extract.
    fn handle(&self, response: &Response) -> Result<Option<Bytes>, HttpClientError>;
}

#[derive(Debug)]
pub struct HandlerFn<F> {
    f: F,
}

impl<F> HttpResponseHandler for HandlerFn<F>
where
    F: Fn(&Response) -> Result<Option<Bytes>, HttpClientError>,
{
    fn handle(&self, response: &Response) -> Result<Option<Bytes>, HttpClientError> {
        (self.f)(response)
    }
}

pub fn make_handler<F>(f: F) -> HandlerFn<F>
where
    F: Fn(&Response) -> Result<Option<Bytes>, HttpClientError>,
{
    HandlerFn { f }
}

/// Returns the entity content of successful (2xx) responses and fails on
/// anything else.
#[derive(Debug, Default, Clone, Copy)]
pub struct EntityContentHandler;

impl HttpResponseHandler for EntityContentHandler {
    fn handle(&self, response: &Response) -> Result<Option<Bytes>, HttpClientError> {
        if !response.is_success() {
            return Err(HttpClientError::handler(format!("unexpected status code {}", response.status_code())));
        }

        Ok(response.entity().map(|entity| entity.content().clone()))
    }
}
