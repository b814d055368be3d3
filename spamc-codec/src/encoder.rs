mod header;

pub use header::*;

use crate::compress::compress;
use crate::error::{Error, Result};
use crate::types::{Body, HeaderValue, Headers, Request, Response};
use crate::SPAMC_VERSION;

use log::debug;

use std::borrow::Cow;

/// Encode a request as `<method> SPAMC/1.5\r\n<headers>\r\n<body>`.
///
/// The body is compressed when `request.compress` is set or a `Compress`
/// header is present, and a `Compress` header is added if it's missing.
/// A `Content-length` header is never added, but one supplied by the caller is
/// rewritten to the length of the body as it appears on the wire.
pub fn encode_request(request: &Request) -> Result<Vec<u8>> {
    // A line break would end the request line early
    if request.method.contains(|c: char| c == '\r' || c == '\n') {
        return Err(Error::NotARequest);
    }

    let start_line = format!("{} SPAMC/{}\r\n", request.method, SPAMC_VERSION);
    let body = request.body.as_ref().map(Body::as_bytes).unwrap_or_default();

    encode_message(start_line, &request.headers, body, request.compress)
}

/// Encode a response as `SPAMD/1.5 <code> <message>\r\n<headers>\r\n<body>`,
/// following the same body rules as `encode_request`
pub fn encode_response(response: &Response) -> Result<Vec<u8>> {
    if response.message.contains(|c: char| c == '\r' || c == '\n') {
        return Err(Error::MalformedStatusLine(response.message.clone()));
    }

    let start_line = format!(
        "SPAMD/{} {} {}\r\n",
        SPAMC_VERSION,
        response.status.code(),
        response.message
    );
    let body = response.body.as_deref().unwrap_or_default();

    encode_message(start_line, &response.headers, body, false)
}

fn encode_message(
    start_line: String,
    headers: &Headers,
    body: &[u8],
    compress_body: bool,
) -> Result<Vec<u8>> {
    let compressed = compress_body || headers.is_compressed();

    let body: Cow<[u8]> = if compressed {
        Cow::Owned(compress(body))
    } else {
        Cow::Borrowed(body)
    };
    let headers = wire_headers(headers, compressed, body.len());

    let mut encoded = start_line.into_bytes();
    encoded.append(&mut encode_headers(&headers)?);
    encoded.extend_from_slice(b"\r\n");
    encoded.extend_from_slice(&body);

    Ok(encoded)
}

fn wire_headers(headers: &Headers, compressed: bool, body_len: usize) -> Cow<Headers> {
    let body_len = body_len as u64;
    let missing_compress = compressed && !headers.is_compressed();
    let stale_length = headers
        .content_length()
        .map_or(false, |len| len != body_len);

    if !missing_compress && !stale_length {
        return Cow::Borrowed(headers);
    }

    let mut headers = headers.clone();
    if missing_compress {
        headers.insert(HeaderValue::Compress);
    }
    if stale_length {
        debug!("Rewriting Content-length to the {} byte wire body", body_len);
        headers.insert(HeaderValue::ContentLength(body_len));
    }

    Cow::Owned(headers)
}
