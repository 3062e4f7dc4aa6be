use http::header::TRANSFER_ENCODING;
use tracing::debug;

use crate::codec::{decode_chunked, looks_chunked};
use crate::decoding::{DecodeStatus, DecodingContext};
use crate::protocol::{HttpClientError, HttpMessage};

/// Removes chunk framing when `chunked` is the final transfer coding.
///
/// Content that does not open with a chunk-size line was already de-chunked
/// by the transport; the chain stops there instead of failing.
pub(crate) fn chunked(context: &mut DecodingContext<'_>) -> Result<DecodeStatus, HttpClientError> {
    let Some(value) = context.raw_response().headers().get(TRANSFER_ENCODING) else {
        return Ok(DecodeStatus::Declined);
    };

    if !is_chunked(&value) {
        debug!(transfer_encoding = %value, "not chunked, declining");
        return Ok(DecodeStatus::Declined);
    }

    let content = context.content();
    if !looks_chunked(content) {
        debug!("content carries no chunk framing, leaving it as is");
        return Ok(DecodeStatus::Stop);
    }

    let decoded = decode_chunked(content).map_err(|e| HttpClientError::decoding(format!("invalid chunked content: {e}")))?;
    debug!(from = content.len(), to = decoded.len(), "removed chunk framing");
    context.put_decoded(decoded);
    Ok(DecodeStatus::Decoded)
}

/// `chunked` must be the last coding when present.
fn is_chunked(value: &str) -> bool {
    value.rsplit(',').next().is_some_and(|coding| coding.trim().eq_ignore_ascii_case("chunked"))
}
