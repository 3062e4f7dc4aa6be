//! Post-processing of response entities.
//!
//! A [`ResponseDecoder`] inspects a parsed [`Response`] and, when its trigger
//! header is present, rewrites the entity content. The bundled decoders are
//! [`DecoderChain`]s, each an ordered list of [`DecodeStep`]s tried until one
//! reports something other than [`DecodeStatus::Declined`]:
//!
//! - [`DecoderChain::transfer`] removes chunked transfer framing
//! - [`DecoderChain::content`] undoes `gzip`, `deflate`, `zstd` and `br`
//!   content codings
//!
//! Declining is silent. Only a codec failing on content it claimed is an
//! error.

use bytes::Bytes;

use crate::protocol::{HttpClientError, HttpMessage, Response};

mod content;

mod decoder_chain;
pub use decoder_chain::DecodeStep;
pub use decoder_chain::DecoderChain;

mod transfer;

/// Outcome of a single decode step.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DecodeStatus {
    /// Decoded content was published into the context.
    Decoded,
    /// Not applicable; the next step is tried.
    Declined,
    /// Applicable, but the content must be left as it is. No further steps run.
    Stop,
}

/// Per-decode state passed along a decoder chain.
///
/// Created for one `decode` call and dropped at its end.
#[derive(Debug)]
pub struct DecodingContext<'a> {
    raw_response: &'a Response,
    decoded: Option<Bytes>,
}

impl<'a> DecodingContext<'a> {
    pub fn new(raw_response: &'a Response) -> Self {
        Self { raw_response, decoded: None }
    }

    pub fn raw_response(&self) -> &'a Response {
        self.raw_response
    }

    /// The undecoded entity content, empty when there is no entity.
    pub fn content(&self) -> &'a [u8] {
        self.raw_response.entity().map(|entity| &entity.content()[..]).unwrap_or_default()
    }

    pub fn put_decoded(&mut self, decoded: Bytes) {
        self.decoded = Some(decoded);
    }

    pub fn take_decoded(&mut self) -> Option<Bytes> {
        self.decoded.take()
    }
}

/// Rewrites response entities in place.
pub trait ResponseDecoder: Send {
    /// False when the response has no entity, the entity is empty, or the
    /// decoder's trigger header is absent.
    fn needs_to_be_decoded(&self, response: &Response) -> bool;

    /// Decodes the entity of `response` if [`needs_to_be_decoded`] holds.
    ///
    /// On success the entity content is replaced, its length follows the new
    /// content and its content type is copied again from the `Content-Type`
    /// header. Headers themselves are never changed.
    ///
    /// [`needs_to_be_decoded`]: ResponseDecoder::needs_to_be_decoded
    fn decode(&self, response: &mut Response) -> Result<(), HttpClientError>;
}
