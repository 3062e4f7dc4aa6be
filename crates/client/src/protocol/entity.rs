//! HTTP entity: a message body plus its derived metadata.

use bytes::Bytes;
use mime::Mime;

/// The body of an HTTP message.
///
/// The content length is derived from the content itself, so it always equals
/// the byte length of whatever content was last assigned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entity {
    content: Bytes,
    content_type: Option<String>,
}

impl Entity {
    pub fn new<B: Into<Bytes>>(content: B) -> Self {
        Self { content: content.into(), content_type: None }
    }

    pub fn with_content_type<B: Into<Bytes>, S: Into<String>>(content: B, content_type: S) -> Self {
        Self { content: content.into(), content_type: Some(content_type.into()) }
    }

    pub fn content(&self) -> &Bytes {
        &self.content
    }

    pub fn set_content<B: Into<Bytes>>(&mut self, content: B) {
        self.content = content.into();
    }

    pub fn into_content(self) -> Bytes {
        self.content
    }

    #[inline]
    pub fn content_length(&self) -> usize {
        self.content.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn set_content_type<S: Into<String>>(&mut self, content_type: S) {
        self.content_type = Some(content_type.into());
    }

    /// Parses the content type, `None` when it is absent or not a valid media type.
    pub fn mime(&self) -> Option<Mime> {
        self.content_type.as_deref()?.parse().ok()
    }
}
