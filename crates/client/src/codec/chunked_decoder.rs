//! Chunked transfer coding, see [RFC 9112 Section 7.1](https://www.rfc-editor.org/rfc/rfc9112#section-7.1).
//!
//! [`ChunkedDecoder`] is a byte-level state machine exposed through
//! [`tokio_util::codec::Decoder`], so it can consume a body that arrives in
//! pieces. [`decode_chunked`] drives it over a complete entity, which is how the
//! transfer decoding chain uses it.

use bytes::{Buf, Bytes, BytesMut};
use std::io;
use std::io::ErrorKind;
use std::task::Poll;
use tokio_util::codec::Decoder;
use tracing::trace;
use ChunkedState::*;

/// One decoded piece of a chunked body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkItem {
    Chunk(Bytes),
    /// The zero-sized last chunk and any trailers were consumed.
    Eof,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkedDecoder {
    state: ChunkedState,
    remaining_size: u64,
}

impl Default for ChunkedDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ChunkedDecoder {
    pub fn new() -> Self {
        Self { state: Size, remaining_size: 0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChunkedState {
    Size,
    SizeLws,
    Extension,
    SizeLf,
    Body,
    BodyCr,
    BodyLf,
    Trailer,
    TrailerLf,
    EndCr,
    EndLf,
    End,
}

impl Decoder for ChunkedDecoder {
    type Item = ChunkItem;
    type Error = io::Error;

    /// Returns the next chunk, `Eof` after the last chunk, or `None` when more
    /// bytes are needed.
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        loop {
            if self.state == End {
                trace!("finished reading chunked data");
                return Ok(Some(ChunkItem::Eof));
            }

            if src.is_empty() {
                return Ok(None);
            }

            let mut buf = None;

            self.state = match self.state.step(src, &mut self.remaining_size, &mut buf) {
                Poll::Pending => return Ok(None),
                Poll::Ready(Ok(new_state)) => new_state,
                Poll::Ready(Err(e)) => return Err(e),
            };

            if let Some(bytes) = buf {
                trace!(len = bytes.len(), "read chunked bytes");
                return Ok(Some(ChunkItem::Chunk(bytes)));
            }
        }
    }
}

/// Removes chunk framing from a complete chunked body.
///
/// Fails when the framing is invalid or the body ends before the last chunk.
pub fn decode_chunked(content: &[u8]) -> Result<Bytes, io::Error> {
    let mut src = BytesMut::from(content);
    let mut decoder = ChunkedDecoder::new();
    let mut decoded = BytesMut::with_capacity(content.len());

    loop {
        match decoder.decode(&mut src)? {
            Some(ChunkItem::Chunk(bytes)) => decoded.extend_from_slice(&bytes),
            Some(ChunkItem::Eof) => return Ok(decoded.freeze()),
            None => return Err(io::Error::new(ErrorKind::UnexpectedEof, "chunked content ended before the last chunk")),
        }
    }
}

/// Returns true when `content` opens with a chunk-size line (hex digits, then
/// optional whitespace or extensions, then CRLF).
pub fn looks_chunked(content: &[u8]) -> bool {
    let digits = content.iter().take_while(|b| b.is_ascii_hexdigit()).count();
    if digits == 0 {
        return false;
    }

    match content[digits..].iter().position(|b| *b == b'\n') {
        Some(lf) => {
            let rest = &content[digits..digits + lf];
            rest.ends_with(b"\r") && matches!(rest.first(), Some(b'\r' | b';' | b' ' | b'\t'))
        }
        None => false,
    }
}

macro_rules! try_next_byte {
    ($src:ident) => {{
        if $src.len() > 0 {
            $src.get_u8()
        } else {
            return Poll::Pending;
        }
    }};
}

fn invalid(msg: &'static str) -> Poll<Result<ChunkedState, io::Error>> {
    Poll::Ready(Err(io::Error::new(ErrorKind::InvalidData, msg)))
}

impl ChunkedState {
    fn step(&self, src: &mut BytesMut, remaining_size: &mut u64, buf: &mut Option<Bytes>) -> Poll<Result<ChunkedState, io::Error>> {
        match self {
            Size => ChunkedState::read_size(src, remaining_size),
            SizeLws => ChunkedState::read_size_lws(src),
            Extension => ChunkedState::read_extension(src),
            SizeLf => ChunkedState::read_size_lf(src, *remaining_size),
            Body => ChunkedState::read_body(src, remaining_size, buf),
            BodyCr => ChunkedState::read_body_cr(src),
            BodyLf => ChunkedState::read_body_lf(src),
            Trailer => ChunkedState::read_trailer(src),
            TrailerLf => ChunkedState::read_trailer_lf(src),
            EndCr => ChunkedState::read_end_cr(src),
            EndLf => ChunkedState::read_end_lf(src),
            End => Poll::Ready(Ok(End)),
        }
    }

    /// Accumulates one hex digit of the chunk size.
    fn read_size(src: &mut BytesMut, size: &mut u64) -> Poll<Result<ChunkedState, io::Error>> {
        let digit = match try_next_byte!(src) {
            b @ b'0'..=b'9' => b - b'0',
            b @ b'a'..=b'f' => b + 10 - b'a',
            b @ b'A'..=b'F' => b + 10 - b'A',
            b'\t' | b' ' => return Poll::Ready(Ok(SizeLws)),
            b';' => return Poll::Ready(Ok(Extension)),
            b'\r' => return Poll::Ready(Ok(SizeLf)),
            _ => return invalid("invalid chunk size line: Invalid Size"),
        };

        match size.checked_mul(16).and_then(|s| s.checked_add(u64::from(digit))) {
            Some(new_size) => {
                *size = new_size;
                Poll::Ready(Ok(Size))
            }
            None => invalid("invalid overflow chunked length"),
        }
    }

    fn read_size_lws(src: &mut BytesMut) -> Poll<Result<ChunkedState, io::Error>> {
        match try_next_byte!(src) {
            b'\t' | b' ' => Poll::Ready(Ok(SizeLws)),
            b';' => Poll::Ready(Ok(Extension)),
            b'\r' => Poll::Ready(Ok(SizeLf)),
            _ => invalid("invalid chunk size linear white space"),
        }
    }

    /// Extensions are ignored up to CRLF; a bare LF is rejected.
    fn read_extension(src: &mut BytesMut) -> Poll<Result<ChunkedState, io::Error>> {
        match try_next_byte!(src) {
            b'\r' => Poll::Ready(Ok(SizeLf)),
            b'\n' => invalid("invalid chunk extension contains newline"),
            _ => Poll::Ready(Ok(Extension)),
        }
    }

    fn read_size_lf(src: &mut BytesMut, size: u64) -> Poll<Result<ChunkedState, io::Error>> {
        match try_next_byte!(src) {
            b'\n' if size == 0 => Poll::Ready(Ok(EndCr)),
            b'\n' => Poll::Ready(Ok(Body)),
            _ => invalid("invalid chunk size LF"),
        }
    }

    fn read_body(src: &mut BytesMut, size: &mut u64, buf: &mut Option<Bytes>) -> Poll<Result<ChunkedState, io::Error>> {
        if src.is_empty() {
            return Poll::Ready(Ok(Body));
        }

        if *size == 0 {
            return Poll::Ready(Ok(BodyCr));
        }

        let remaining = usize::try_from(*size).unwrap_or(usize::MAX);
        let read_size = std::cmp::min(remaining, src.len());

        *size -= read_size as u64;
        *buf = Some(src.split_to(read_size).freeze());

        if *size > 0 { Poll::Ready(Ok(Body)) } else { Poll::Ready(Ok(BodyCr)) }
    }

    fn read_body_cr(src: &mut BytesMut) -> Poll<Result<ChunkedState, io::Error>> {
        match try_next_byte!(src) {
            b'\r' => Poll::Ready(Ok(BodyLf)),
            _ => invalid("invalid chunk body CR"),
        }
    }

    fn read_body_lf(src: &mut BytesMut) -> Poll<Result<ChunkedState, io::Error>> {
        match try_next_byte!(src) {
            b'\n' => Poll::Ready(Ok(Size)),
            _ => invalid("invalid chunk body LF"),
        }
    }

    fn read_trailer(src: &mut BytesMut) -> Poll<Result<ChunkedState, io::Error>> {
        match try_next_byte!(src) {
            b'\r' => Poll::Ready(Ok(TrailerLf)),
            _ => Poll::Ready(Ok(Trailer)),
        }
    }

    fn read_trailer_lf(src: &mut BytesMut) -> Poll<Result<ChunkedState, io::Error>> {
        match try_next_byte!(src) {
            b'\n' => Poll::Ready(Ok(EndCr)),
            _ => invalid("invalid trailer end LF"),
        }
    }

    /// Anything but CR after the last chunk starts a trailer field.
    fn read_end_cr(src: &mut BytesMut) -> Poll<Result<ChunkedState, io::Error>> {
        match try_next_byte!(src) {
            b'\r' => Poll::Ready(Ok(EndLf)),
            _ => Poll::Ready(Ok(Trailer)),
        }
    }

    fn read_end_lf(src: &mut BytesMut) -> Poll<Result<ChunkedState, io::Error>> {
        match try_next_byte!(src) {
            b'\n' => Poll::Ready(Ok(End)),
            _ => invalid("invalid chunk end LF"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_single_chunk() {
        let mut buffer = BytesMut::from(&b"10\r\n1234567890abcdef\r\n0\r\n\r\n"[..]);
        let mut decoder = ChunkedDecoder::new();

        let item = decoder.decode(&mut buffer).unwrap().unwrap();
        assert_eq!(item, ChunkItem::Chunk(Bytes::from_static(b"1234567890abcdef")));

        assert_eq!(decoder.decode(&mut buffer).unwrap(), Some(ChunkItem::Eof));
    }

    #[test]
    fn decode_incrementally() {
        let mut buffer = BytesMut::from(&b"5\r\nhel"[..]);
        let mut decoder = ChunkedDecoder::new();

        let chunk = decoder.decode(&mut buffer).unwrap().unwrap();
        assert_eq!(chunk, ChunkItem::Chunk(Bytes::from_static(b"hel")));
        assert!(decoder.decode(&mut buffer).unwrap().is_none());

        buffer.extend_from_slice(b"lo\r\n0\r\n\r\n");

        let chunk = decoder.decode(&mut buffer).unwrap().unwrap();
        assert_eq!(chunk, ChunkItem::Chunk(Bytes::from_static(b"lo")));
        assert_eq!(decoder.decode(&mut buffer).unwrap(), Some(ChunkItem::Eof));
    }

    #[test]
    fn decode_whole_body() {
        let decoded = decode_chunked(b"5\r\nhello\r\n7\r\n, world\r\n0\r\n\r\n").unwrap();
        assert_eq!(&decoded[..], b"hello, world");
    }

    #[test]
    fn decode_with_extensions_and_trailers() {
        let decoded = decode_chunked(b"5;chunk-ext=value\r\nhello\r\n0\r\nTrailer: value\r\n\r\n").unwrap();
        assert_eq!(&decoded[..], b"hello");
    }

    #[test]
    fn decode_large_chunk() {
        let size = 256 * 1024;
        let mut data = format!("{size:x}\r\n").into_bytes();
        data.extend(vec![b'A'; size]);
        data.extend(b"\r\n0\r\n\r\n");

        let decoded = decode_chunked(&data).unwrap();
        assert_eq!(decoded.len(), size);
        assert!(decoded.iter().all(|&b| b == b'A'));
    }

    #[test]
    fn decode_empty_body() {
        assert!(decode_chunked(b"0\r\n\r\n").unwrap().is_empty());
    }

    #[test]
    fn reject_invalid_size() {
        let error = decode_chunked(b"xyz\r\n").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn reject_missing_crlf() {
        let error = decode_chunked(b"5\r\nhelloBad").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn reject_truncated_body() {
        let error = decode_chunked(b"5\r\nhello\r\n").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::UnexpectedEof);
    }

    #[test]
    fn detect_chunk_size_line() {
        assert!(looks_chunked(b"5\r\nhello\r\n0\r\n\r\n"));
        assert!(looks_chunked(b"1A;name=value\r\n"));
        assert!(looks_chunked(b"0 \r\n\r\n"));

        assert!(!looks_chunked(b"hello world"));
        assert!(!looks_chunked(b"cafe is not a size line"));
        assert!(!looks_chunked(b"5\nhello"));
        assert!(!looks_chunked(b""));
    }
}
