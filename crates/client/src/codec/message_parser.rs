//! Lenient splitting and parsing of raw HTTP/1.x messages.
//!
//! Transports hand back the response exactly as it came off the wire (or as
//! close to it as their underlying mechanism allows). This module separates
//! that blob into the header block and the body, and turns the header block
//! into a [`Headers`] multimap.
//!
//! Parsing is deliberately forgiving:
//!
//! - a message without a blank line is treated as headers only, with no body
//! - header lines without a colon, with an empty name or with an empty value
//!   are dropped instead of failing the whole parse
//! - the status line is cut off with [`HttpMessageParser::header_lines`]
//!   before parsing, since a reason phrase may itself contain a colon

use crate::protocol::{Headers, HttpMessage};

/// The blank line separating the header block from the body.
pub const MESSAGE_SEPARATOR: &[u8] = b"\r\n\r\n";

/// Splits raw messages and converts header blocks to and from wire form.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpMessageParser;

impl HttpMessageParser {
    pub fn new() -> Self {
        Self
    }

    /// Returns everything before the first blank line, or the whole input when
    /// there is no blank line.
    pub fn headers_section<'a>(&self, raw: &'a [u8]) -> &'a [u8] {
        match find_separator(raw) {
            Some(index) => &raw[..index],
            None => raw,
        }
    }

    /// Returns everything after the first blank line, `None` when there is no
    /// blank line.
    pub fn body_section<'a>(&self, raw: &'a [u8]) -> Option<&'a [u8]> {
        find_separator(raw).map(|index| &raw[index + MESSAGE_SEPARATOR.len()..])
    }

    /// Returns the header section without its status line; empty when the
    /// section is a status line only.
    pub fn header_lines<'a>(&self, headers_section: &'a [u8]) -> &'a [u8] {
        match headers_section.iter().position(|b| *b == b'\n') {
            Some(lf) => &headers_section[lf + 1..],
            None => &[],
        }
    }

    /// Parses `Name: Value` lines into an ordered multimap.
    ///
    /// Lines are split on the first colon and values are trimmed. Repeated
    /// names accumulate their values in order of appearance.
    pub fn parse_header_block(&self, raw: &str) -> Headers {
        let mut headers = Headers::new();

        for line in raw.lines() {
            let Some((name, value)) = line.split_once(':') else {
                continue;
            };

            let name = name.trim();
            let value = value.trim();
            if name.is_empty() || value.is_empty() {
                continue;
            }

            headers.append(name, value);
        }

        headers
    }

    /// Serializes the message headers back to wire form, one
    /// `Name: Value\r\n` line per header name.
    pub fn serialize_headers<M: HttpMessage + ?Sized>(&self, message: &M) -> String {
        message.headers().to_string()
    }
}

fn find_separator(raw: &[u8]) -> Option<usize> {
    raw.windows(MESSAGE_SEPARATOR.len()).position(|window| window == MESSAGE_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Response;
    use indoc::indoc;

    const PARSER: HttpMessageParser = HttpMessageParser;

    #[test]
    fn headers_before_separator() {
        assert_eq!(PARSER.headers_section(b"headers\r\n\r\nHeaders"), b"headers");
    }

    #[test]
    fn headers_without_separator_is_whole_message() {
        assert_eq!(PARSER.headers_section(b"something"), b"something");
        assert_eq!(PARSER.headers_section(b""), b"");
    }

    #[test]
    fn body_after_separator() {
        assert_eq!(PARSER.body_section(b"headers\r\n\r\nbody"), Some(&b"body"[..]));
        assert_eq!(PARSER.body_section(b"headers\r\n\r\n"), Some(&b""[..]));
    }

    #[test]
    fn body_without_separator_is_none() {
        assert_eq!(PARSER.body_section(b"something"), None);
        assert_eq!(PARSER.body_section(b""), None);
        assert_eq!(PARSER.body_section(b"headers\r\n"), None);
    }

    #[test]
    fn split_at_first_separator_recovers_parts() {
        for (headers, body) in [
            ("HTTP/1.1 200 OK\r\nA: b", "hello"),
            ("x", ""),
            ("HTTP/1.0 204 No Content", "line\r\n\r\nwith separator inside"),
            ("", "body only"),
        ] {
            let raw = format!("{headers}\r\n\r\n{body}");
            assert_eq!(PARSER.headers_section(raw.as_bytes()), headers.as_bytes());
            assert_eq!(PARSER.body_section(raw.as_bytes()), Some(body.as_bytes()));
        }
    }

    #[test]
    fn parse_empty_block() {
        assert!(PARSER.parse_header_block("").is_empty());
    }

    #[test]
    fn parse_block_without_colons() {
        assert!(PARSER.parse_header_block("this is a string with nothing in it").is_empty());
        assert!(PARSER.parse_header_block("one\r\ntwo\nthree").is_empty());
    }

    #[test]
    fn parse_skips_bad_lines() {
        let headers = PARSER.parse_header_block(
            "Header: Value\r\ntthis is a string with nothing in it\r\nAnother: \theader\r\nHeader21:\r\n: no name\r\n",
        );

        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get_all("Header"), &["Value".to_string()]);
        assert_eq!(headers.get_all("Another"), &["header".to_string()]);
        assert!(!headers.contains("Header21"));
    }

    #[test]
    fn parse_accumulates_repeats() {
        let headers = PARSER.parse_header_block("Header: Value\r\nAnother: \theader\r\nHeader: something else\r\n");

        let parsed: Vec<(&str, &[String])> = headers.iter().collect();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].0, "Header");
        assert_eq!(parsed[0].1, &["Value".to_string(), "something else".to_string()]);
        assert_eq!(parsed[1].0, "Another");
        assert_eq!(parsed[1].1, &["header".to_string()]);
    }

    #[test]
    fn parse_splits_on_first_colon() {
        let headers = PARSER.parse_header_block("Location: http://example.com:8080/path\r\n");
        assert_eq!(headers.get("location").as_deref(), Some("http://example.com:8080/path"));
    }

    #[test]
    fn parse_response_header_block() {
        let raw = indoc! {"
            HTTP/1.1 200 OK
            Content-Type: text/html; charset=utf-8
            Set-Cookie: a=1
            Set-Cookie: b=2
            Content-Length: 11
        "};

        let headers = PARSER.parse_header_block(&String::from_utf8_lossy(PARSER.header_lines(raw.as_bytes())));

        assert_eq!(headers.len(), 3);
        assert_eq!(headers.get("content-type").as_deref(), Some("text/html; charset=utf-8"));
        assert_eq!(headers.get("set-cookie").as_deref(), Some("a=1, b=2"));
        assert_eq!(headers.get("content-length").as_deref(), Some("11"));
    }

    #[test]
    fn header_lines_drop_status_line() {
        assert_eq!(PARSER.header_lines(b"HTTP/1.1 200 OK\r\nServer: x"), b"Server: x");
        assert_eq!(PARSER.header_lines(b"HTTP/1.1 200 OK\nServer: x\nVia: y"), b"Server: x\nVia: y");
        assert_eq!(PARSER.header_lines(b"HTTP/1.1 200 OK"), b"");
        assert_eq!(PARSER.header_lines(b""), b"");
    }

    #[test]
    fn colon_in_reason_phrase_is_not_a_header() {
        let section = b"HTTP/1.1 500 Error: backend down\r\nServer: x\r\n";

        let headers = PARSER.parse_header_block(&String::from_utf8_lossy(PARSER.header_lines(section)));

        let parsed: Vec<(&str, &[String])> = headers.iter().collect();
        assert_eq!(parsed, vec![("Server", &["x".to_string()][..])]);
    }

    #[test]
    fn serialize_in_insertion_order() {
        let mut message = Response::new();
        message.set_header("one", "two");
        message.set_header("three", "four");

        assert_eq!(PARSER.serialize_headers(&message), "one: two\r\nthree: four\r\n");
    }

    #[test]
    fn serialize_joins_repeated_values() {
        let mut message = Response::new();
        message.headers_mut().append("Accept", "text/html");
        message.headers_mut().append("Accept", "*/*");

        assert_eq!(PARSER.serialize_headers(&message), "Accept: text/html, */*\r\n");
        assert_eq!(PARSER.serialize_headers(&Response::new()), "");
    }
}
