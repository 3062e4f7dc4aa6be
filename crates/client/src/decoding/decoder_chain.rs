use std::borrow::Cow;

use http::HeaderName;
use http::header::{CONTENT_ENCODING, CONTENT_TYPE, TRANSFER_ENCODING};
use tracing::{Span, debug, debug_span};

use crate::decoding::content::{self, Coding};
use crate::decoding::{DecodeStatus, DecodingContext, ResponseDecoder, transfer};
use crate::protocol::{HttpClientError, HttpMessage, Response};

/// One step of a [`DecoderChain`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DecodeStep {
    /// Removes chunked transfer framing.
    ChunkedTransfer,
    /// `gzip` or `x-gzip` content coding.
    Gzip,
    /// `deflate` content coding, zlib wrapped or raw.
    Deflate,
    /// `zstd` content coding.
    Zstd,
    /// `br` content coding.
    Brotli,
}

impl DecodeStep {
    pub fn name(&self) -> &'static str {
        match self {
            DecodeStep::ChunkedTransfer => "chunked",
            DecodeStep::Gzip => Coding::Gzip.name(),
            DecodeStep::Deflate => Coding::Deflate.name(),
            DecodeStep::Zstd => Coding::Zstd.name(),
            DecodeStep::Brotli => Coding::Br.name(),
        }
    }

    fn process(&self, context: &mut DecodingContext<'_>) -> Result<DecodeStatus, HttpClientError> {
        match self {
            DecodeStep::ChunkedTransfer => transfer::chunked(context),
            DecodeStep::Gzip => content::decompress(Coding::Gzip, context),
            DecodeStep::Deflate => content::decompress(Coding::Deflate, context),
            DecodeStep::Zstd => content::decompress(Coding::Zstd, context),
            DecodeStep::Brotli => content::decompress(Coding::Br, context),
        }
    }
}

/// Decoder driven by one trigger header and an ordered list of steps.
#[derive(Debug)]
pub struct DecoderChain {
    header: HeaderName,
    steps: Vec<DecodeStep>,
    span: Span,
}

impl DecoderChain {
    pub fn new<I: IntoIterator<Item = DecodeStep>>(header: HeaderName, steps: I) -> Self {
        let span = debug_span!("decoder", header = header.as_str());
        Self { header, steps: steps.into_iter().collect(), span }
    }

    /// Chain triggered by `Transfer-Encoding`.
    pub fn transfer() -> Self {
        Self::new(TRANSFER_ENCODING, [DecodeStep::ChunkedTransfer])
    }

    /// Chain triggered by `Content-Encoding`.
    pub fn content() -> Self {
        Self::new(CONTENT_ENCODING, [DecodeStep::Gzip, DecodeStep::Deflate, DecodeStep::Zstd, DecodeStep::Brotli])
    }

    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn header_name(&self) -> &HeaderName {
        &self.header
    }

    pub fn steps(&self) -> &[DecodeStep] {
        &self.steps
    }

    fn run(&self, context: &mut DecodingContext<'_>) -> Result<DecodeStatus, HttpClientError> {
        for step in &self.steps {
            match step.process(context)? {
                DecodeStatus::Declined => continue,
                status => {
                    debug!(step = step.name(), ?status, "step finished the chain");
                    return Ok(status);
                }
            }
        }
        Ok(DecodeStatus::Declined)
    }
}

impl ResponseDecoder for DecoderChain {
    fn needs_to_be_decoded(&self, response: &Response) -> bool {
        let _entered = self.span.enter();

        let Some(entity) = response.entity() else {
            debug!("response contains no entity");
            return false;
        };

        if entity.is_empty() {
            debug!("response entity contains no content");
            return false;
        }

        if !response.headers().contains(&self.header) {
            debug!("response does not contain {} header, no need to decode", self.header);
            return false;
        }

        debug!("response contains {} header, will attempt decode", self.header);
        true
    }

    fn decode(&self, response: &mut Response) -> Result<(), HttpClientError> {
        if !self.needs_to_be_decoded(response) {
            return Ok(());
        }

        let _entered = self.span.enter();
        let mut context = DecodingContext::new(response);
        let status = self.run(&mut context)?;
        let decoded = context.take_decoded();

        let (DecodeStatus::Decoded, Some(decoded)) = (status, decoded) else {
            debug!(?status, "response left unchanged");
            return Ok(());
        };

        let content_type = response.headers().get(CONTENT_TYPE).map(Cow::into_owned);
        if let Some(entity) = response.entity_mut() {
            entity.set_content(decoded);
            if let Some(content_type) = content_type {
                entity.set_content_type(content_type);
            }
        }
        Ok(())
    }
}
