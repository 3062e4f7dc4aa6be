use std::io::{self, Read};

use bytes::Bytes;
use flate2::read::{DeflateDecoder, GzDecoder, ZlibDecoder};
use http::header::CONTENT_ENCODING;
use tracing::{debug, trace};

use crate::decoding::{DecodeStatus, DecodingContext};
use crate::protocol::{HttpClientError, HttpMessage};

const BROTLI_BUFFER_SIZE: usize = 32 * 1024;

/// Supported content codings.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Coding {
    Gzip,
    Deflate,
    Zstd,
    Br,
}

impl Coding {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Coding::Gzip => "gzip",
            Coding::Deflate => "deflate",
            Coding::Zstd => "zstd",
            Coding::Br => "br",
        }
    }

    fn matches(&self, coding: &str) -> bool {
        match self {
            Coding::Gzip => coding.eq_ignore_ascii_case("gzip") || coding.eq_ignore_ascii_case("x-gzip"),
            other => coding.eq_ignore_ascii_case(other.name()),
        }
    }

    fn decompress(&self, content: &[u8]) -> Result<Vec<u8>, io::Error> {
        let mut decoded = Vec::with_capacity(content.len() * 4);
        match self {
            Coding::Gzip => {
                GzDecoder::new(content).read_to_end(&mut decoded)?;
            }
            Coding::Deflate => {
                // servers disagree on whether `deflate` carries the zlib wrapper
                if ZlibDecoder::new(content).read_to_end(&mut decoded).is_err() {
                    trace!("not zlib wrapped, retrying as raw deflate");
                    decoded.clear();
                    DeflateDecoder::new(content).read_to_end(&mut decoded)?;
                }
            }
            Coding::Zstd => {
                decoded = zstd::stream::decode_all(content)?;
            }
            Coding::Br => {
                brotli::Decompressor::new(content, BROTLI_BUFFER_SIZE).read_to_end(&mut decoded)?;
            }
        }
        Ok(decoded)
    }
}

/// Decodes the entity when `Content-Encoding` names exactly `coding`.
///
/// Stacked codings (`gzip, br`) stop the chain: undoing only the outer one
/// would leave headers that no longer describe the content.
pub(crate) fn decompress(coding: Coding, context: &mut DecodingContext<'_>) -> Result<DecodeStatus, HttpClientError> {
    let Some(value) = context.raw_response().headers().get(CONTENT_ENCODING) else {
        return Ok(DecodeStatus::Declined);
    };

    let mut codings = value.split(',').map(str::trim).filter(|coding| !coding.is_empty());
    let (Some(only), None) = (codings.next(), codings.next()) else {
        debug!(content_encoding = %value, "stacked content codings, leaving content as is");
        return Ok(DecodeStatus::Stop);
    };

    if !coding.matches(only) {
        return Ok(DecodeStatus::Declined);
    }

    let content = context.content();
    let decoded = coding
        .decompress(content)
        .map_err(|e| HttpClientError::decoding(format!("could not decode {} content: {e}", coding.name())))?;

    debug!(coding = coding.name(), from = content.len(), to = decoded.len(), "decoded content");
    context.put_decoded(Bytes::from(decoded));
    Ok(DecodeStatus::Decoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{Entity, Response};
    use flate2::Compression;
    use flate2::write::{DeflateEncoder, GzEncoder, ZlibEncoder};
    use std::io::Write;

    const TEXT: &[u8] = b"the quick brown fox jumps over the lazy dog, again and again and again";

    fn response(content_encoding: &str, content: Vec<u8>) -> Response {
        let mut response = Response::new();
        response.set_header(CONTENT_ENCODING, content_encoding);
        response.set_entity(Entity::new(content));
        response
    }

    fn run(coding: Coding, response: &Response) -> (DecodeStatus, Option<Bytes>) {
        let mut context = DecodingContext::new(response);
        let status = decompress(coding, &mut context).unwrap();
        (status, context.take_decoded())
    }

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn gzip_and_x_gzip() {
        for name in ["gzip", "x-gzip", "GZIP"] {
            let (status, decoded) = run(Coding::Gzip, &response(name, gzip(TEXT)));

            assert_eq!(status, DecodeStatus::Decoded);
            assert_eq!(decoded.unwrap(), TEXT);
        }
    }

    #[test]
    fn deflate_zlib_wrapped() {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(TEXT).unwrap();

        let (status, decoded) = run(Coding::Deflate, &response("deflate", encoder.finish().unwrap()));

        assert_eq!(status, DecodeStatus::Decoded);
        assert_eq!(decoded.unwrap(), TEXT);
    }

    #[test]
    fn deflate_raw() {
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(TEXT).unwrap();

        let (status, decoded) = run(Coding::Deflate, &response("deflate", encoder.finish().unwrap()));

        assert_eq!(status, DecodeStatus::Decoded);
        assert_eq!(decoded.unwrap(), TEXT);
    }

    #[test]
    fn zstd() {
        let encoded = zstd::stream::encode_all(TEXT, 3).unwrap();

        let (status, decoded) = run(Coding::Zstd, &response("zstd", encoded));

        assert_eq!(status, DecodeStatus::Decoded);
        assert_eq!(decoded.unwrap(), TEXT);
    }

    #[test]
    fn brotli() {
        let mut encoded = Vec::new();
        {
            let mut writer = brotli::CompressorWriter::new(&mut encoded, 4096, 5, 22);
            writer.write_all(TEXT).unwrap();
        }

        let (status, decoded) = run(Coding::Br, &response("br", encoded));

        assert_eq!(status, DecodeStatus::Decoded);
        assert_eq!(decoded.unwrap(), TEXT);
    }

    #[test]
    fn decline_other_coding() {
        let (status, decoded) = run(Coding::Zstd, &response("gzip", gzip(TEXT)));

        assert_eq!(status, DecodeStatus::Declined);
        assert!(decoded.is_none());
    }

    #[test]
    fn stop_on_stacked_codings() {
        let (status, decoded) = run(Coding::Gzip, &response("gzip, br", gzip(TEXT)));

        assert_eq!(status, DecodeStatus::Stop);
        assert!(decoded.is_none());
    }

    #[test]
    fn corrupted_content_is_error() {
        let response = response("gzip", b"definitely not gzip".to_vec());
        let mut context = DecodingContext::new(&response);

        let result = decompress(Coding::Gzip, &mut context);

        match result {
            Err(HttpClientError::Decoding { reason }) => assert!(reason.starts_with("could not decode gzip content")),
            other => panic!("unexpected result {other:?}"),
        }
    }
}
