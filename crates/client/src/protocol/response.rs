//! HTTP response assembled from a transport's raw output.

use http::header::CONTENT_TYPE;

use crate::protocol::{Entity, Headers, HttpMessage};

/// A response as seen by callers of the client.
///
/// The status code is whatever the transport reported; `0` means the status
/// line carried no numeric code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    status_code: u16,
    headers: Headers,
    entity: Option<Entity>,
}

impl Response {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn set_status_code(&mut self, status_code: u16) {
        self.status_code = status_code;
    }

    /// Returns true for 2xx status codes.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    pub fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }

    pub fn set_header<N: AsRef<str>, V: Into<String>>(&mut self, name: N, value: V) {
        self.headers.set(name, value);
    }

    pub fn entity_mut(&mut self) -> Option<&mut Entity> {
        self.entity.as_mut()
    }

    pub fn set_entity(&mut self, entity: Entity) {
        self.entity = Some(entity);
    }

    pub fn take_entity(&mut self) -> Option<Entity> {
        self.entity.take()
    }

    /// Value of the `Content-Type` header, if any.
    pub fn content_type(&self) -> Option<String> {
        self.headers.get(CONTENT_TYPE).map(|value| value.into_owned())
    }
}

impl HttpMessage for Response {
    fn headers(&self) -> &Headers {
        &self.headers
    }

    fn entity(&self) -> Option<&Entity> {
        self.entity.as_ref()
    }
}
