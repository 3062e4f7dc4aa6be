//! Status line helpers shared by the socket-level transports.

use std::borrow::Cow;

use crate::protocol::HttpClientError;

/// Returns the first line of a raw message, without its line terminator.
pub fn first_line(raw: &[u8]) -> Cow<'_, str> {
    let end = raw.iter().position(|b| *b == b'\n').unwrap_or(raw.len());
    let line = &raw[..end];
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    String::from_utf8_lossy(line)
}

/// Extracts the numeric code from a status line such as `HTTP/1.1 200 OK`.
///
/// The line needs at least two whitespace separated tokens. The second token is
/// read like a lenient integer parse: leading digits count, anything else
/// yields `0` rather than an error, and out-of-range values saturate.
pub fn parse_status_code(status_line: &str) -> Result<u16, HttpClientError> {
    let mut tokens = status_line.split_whitespace();

    match (tokens.next(), tokens.next()) {
        (Some(_version), Some(code)) => Ok(lenient_code(code)),
        _ => Err(HttpClientError::malformed(format!("invalid status line: {status_line}"))),
    }
}

fn lenient_code(token: &str) -> u16 {
    let token = token.strip_prefix('+').unwrap_or(token);
    token
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0u16, |code, digit| code.saturating_mul(10).saturating_add(u16::from(digit - b'0')))
}
