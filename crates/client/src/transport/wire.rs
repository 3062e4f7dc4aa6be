//! Request serialization shared by the socket-level transports.

use bytes::{Bytes, BytesMut};
use http::header::{CONNECTION, CONTENT_LENGTH, CONTENT_TYPE, HOST, USER_AGENT};

use crate::codec::HttpMessageParser;
use crate::protocol::{HttpClientError, HttpMessage, Request};

/// Version written on the request line. HTTP/1.0 with `Connection: close`
/// means the response ends when the peer closes the socket.
const PROTOCOL_VERSION: &str = "HTTP/1.0";

const DEFAULT_HTTP_PORT: u16 = 80;

/// True for `http` URIs, the only scheme a plain socket can speak.
pub(crate) fn is_plain_http(request: &Request) -> bool {
    request.scheme().eq_ignore_ascii_case("http")
}

/// Host and port to connect to.
pub(crate) fn target(request: &Request) -> Result<(String, u16), HttpClientError> {
    let uri = request.uri();
    let host = uri.host().ok_or_else(|| HttpClientError::invalid_request(format!("{request} has no host")))?;
    // bracketed IPv6 literals come back with their brackets
    let host = host.trim_start_matches('[').trim_end_matches(']');
    Ok((host.to_string(), uri.port_u16().unwrap_or(DEFAULT_HTTP_PORT)))
}

/// Serializes `request` into HTTP/1.0 wire form.
///
/// `Host`, `User-Agent`, `Connection`, `Content-Type` and `Content-Length` are
/// filled in unless the request already carries them.
pub(crate) fn encode_request(parser: &HttpMessageParser, request: &Request, user_agent: &str) -> Bytes {
    let uri = request.uri();
    let target = match uri.path_and_query().map(|pq| pq.as_str()) {
        Some(pq) if !pq.is_empty() => pq,
        _ => "/",
    };

    let mut head = format!("{} {target} {PROTOCOL_VERSION}\r\n", request.method());

    let headers = request.headers();
    if !headers.contains(HOST) {
        if let Some(authority) = uri.authority() {
            let authority = authority.as_str();
            let authority = authority.rsplit_once('@').map_or(authority, |(_userinfo, host)| host);
            head.push_str(&format!("Host: {authority}\r\n"));
        }
    }
    if !headers.contains(USER_AGENT) {
        head.push_str(&format!("User-Agent: {user_agent}\r\n"));
    }
    if !headers.contains(CONNECTION) {
        head.push_str("Connection: close\r\n");
    }

    head.push_str(&parser.serialize_headers(request));

    let entity = request.entity();
    if let Some(entity) = entity {
        if let Some(content_type) = entity.content_type()
            && !headers.contains(CONTENT_TYPE)
        {
            head.push_str(&format!("Content-Type: {content_type}\r\n"));
        }
        if !headers.contains(CONTENT_LENGTH) {
            head.push_str(&format!("Content-Length: {}\r\n", entity.content_length()));
        }
    }
    head.push_str("\r\n");

    let body_len = entity.map_or(0, |entity| entity.content_length());
    let mut wire = BytesMut::with_capacity(head.len() + body_len);
    wire.extend_from_slice(head.as_bytes());
    if let Some(entity) = entity {
        wire.extend_from_slice(entity.content());
    }
    wire.freeze()
}
