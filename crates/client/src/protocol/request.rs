//! HTTP request value handed to the client.
//!
//! A [`Request`] is assembled once through [`RequestBuilder`] and never changes
//! afterwards; transports only ever see it by shared reference.

use std::fmt;

use http::{Method, Uri};

use crate::protocol::{Entity, Headers, HttpClientError, HttpMessage};

#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    uri: Uri,
    headers: Headers,
    entity: Option<Entity>,
}

impl Request {
    /// Starts a request for `uri`, which must be absolute (scheme and host).
    pub fn builder<U: AsRef<str>>(method: Method, uri: U) -> RequestBuilder {
        RequestBuilder::new(method, uri.as_ref())
    }

    /// Shorthand for a bodyless `GET`.
    pub fn get<U: AsRef<str>>(uri: U) -> Result<Self, HttpClientError> {
        Self::builder(Method::GET, uri).build()
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// The URI scheme, empty when absent.
    pub fn scheme(&self) -> &str {
        self.uri.scheme_str().unwrap_or_default()
    }
}

impl HttpMessage for Request {
    fn headers(&self) -> &Headers {
        &self.headers
    }

    fn entity(&self) -> Option<&Entity> {
        self.entity.as_ref()
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.uri)
    }
}

/// Builder for [`Request`]; URI errors are reported by [`RequestBuilder::build`].
#[derive(Debug)]
pub struct RequestBuilder {
    method: Method,
    uri: Result<Uri, HttpClientError>,
    headers: Headers,
    entity: Option<Entity>,
}

impl RequestBuilder {
    fn new(method: Method, uri: &str) -> Self {
        let uri = uri.parse::<Uri>().map_err(|e| HttpClientError::invalid_request(format!("invalid uri {uri}: {e}")));
        Self { method, uri, headers: Headers::new(), entity: None }
    }

    /// Appends a header value; repeated names accumulate.
    #[must_use]
    pub fn header<N: AsRef<str>, V: Into<String>>(mut self, name: N, value: V) -> Self {
        self.headers.append(name, value);
        self
    }

    #[must_use]
    pub fn entity(mut self, entity: Entity) -> Self {
        self.entity = Some(entity);
        self
    }

    pub fn build(self) -> Result<Request, HttpClientError> {
        let uri = self.uri?;
        if uri.scheme().is_none() || uri.host().is_none() {
            return Err(HttpClientError::invalid_request(format!("uri {uri} is not absolute")));
        }

        Ok(Request { method: self.method, uri, headers: self.headers, entity: self.entity })
    }
}
