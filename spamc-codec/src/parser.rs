mod header;

pub use header::*;

use crate::compress::decompress;
use crate::error::{Error, Result};
use crate::helpers::{lines, split_message, u8_to_string};
use crate::types::{Body, Headers, Request, Response, StatusCode};
use crate::SPAMC_VERSION;

use log::{debug, trace};
use nom::{
    bytes::complete::{tag, take_while1},
    character::complete::{char, digit1, space0, space1},
    combinator::{all_consuming, recognize, rest},
    sequence::tuple,
    IResult,
};

use std::convert::TryFrom;

fn protocol_version(d: &[u8]) -> IResult<&[u8], &[u8]> {
    recognize(tuple((digit1, char('.'), digit1)))(d)
}

/// `SPAMD/<version> <status> <message>`, the message runs to the end of the
/// line
pub fn status_line(d: &[u8]) -> IResult<&[u8], (&[u8], &[u8], &[u8])> {
    let (d, _) = tag("SPAMD/")(d)?;
    let (d, version) = protocol_version(d)?;
    let (d, _) = space1(d)?;
    let (d, status) = digit1(d)?;
    let (d, _) = space1(d)?;
    let (d, message) = rest(d)?;

    Ok((d, (version, status, message)))
}

/// `<method> SPAMC/<version>`
pub fn request_line(d: &[u8]) -> IResult<&[u8], (&[u8], &[u8])> {
    let (d, method) = take_while1(|c: u8| c.is_ascii_graphic())(d)?;
    let (d, _) = space1(d)?;
    let (d, _) = tag("SPAMC/")(d)?;
    let (d, version) = protocol_version(d)?;
    let (d, _) = space0(d)?;

    Ok((d, (method, version)))
}

fn parse_status_code(status: &[u8], line: &[u8]) -> Result<StatusCode> {
    let code: u32 = std::str::from_utf8(status)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| Error::MalformedStatusLine(u8_to_string(line).into_owned()))?;

    StatusCode::try_from(code)
}

fn parse_headers<'a>(lines: impl Iterator<Item = &'a [u8]>) -> Result<Headers> {
    let mut headers = Headers::new();

    for line in lines {
        if line.iter().all(u8::is_ascii_whitespace) {
            trace!("Skipping blank line in header block");
            continue;
        }

        let line = u8_to_string(line);
        let header = parse_header_line(&line).map_err(|e| match e {
            Error::MalformedHeader { .. } => e,
            cause => Error::MalformedHeader {
                line: line.clone().into_owned(),
                cause: Some(Box::new(cause)),
            },
        })?;

        if let Some(old) = headers.insert(header) {
            debug!("Header {} appears more than once, keeping the last", old.name());
        }
    }

    Ok(headers)
}

fn decode_body(headers: &Headers, body: Option<&[u8]>) -> Result<Option<Vec<u8>>> {
    let body = match body {
        Some(b) => b,
        None => return Ok(None),
    };

    if let Some(len) = headers.content_length() {
        if len != body.len() as u64 {
            debug!(
                "Content-length is {} but {} bytes of body were received",
                len,
                body.len()
            );
        }
    }

    if !headers.is_compressed() {
        return Ok(Some(body.to_vec()));
    }

    // A compressed empty body is still no body
    let body = decompress(body)?;
    Ok(if body.is_empty() { None } else { Some(body) })
}

/// Parse a complete, buffered SPAMD response
pub fn parse_response(raw: &[u8]) -> Result<Response> {
    let (head, body) = split_message(raw);
    let mut lines = lines(head);

    let first = lines.next().unwrap_or_default();
    let (_, (version, status, message)) =
        status_line(first).map_err(|_| Error::NotAResponse)?;

    let status = parse_status_code(status, first)?;
    let headers = parse_headers(lines)?;
    let body = decode_body(&headers, body)?;

    Ok(Response {
        protocol_version: u8_to_string(version).into_owned(),
        status,
        message: u8_to_string(message).trim().to_owned(),
        headers,
        body,
    })
}

/// Parse a complete, buffered SPAMC request, as a daemon would see it
pub fn parse_request(raw: &[u8]) -> Result<Request> {
    let (head, body) = split_message(raw);
    let mut lines = lines(head);

    let first = lines.next().unwrap_or_default();
    let (_, (method, version)) =
        all_consuming(request_line)(first).map_err(|_| Error::NotARequest)?;

    if version != SPAMC_VERSION.as_bytes() {
        debug!(
            "Request uses protocol version {}, expected {}",
            u8_to_string(version),
            SPAMC_VERSION
        );
    }

    let headers = parse_headers(lines)?;
    let body = decode_body(&headers, body)?;

    Ok(Request {
        method: u8_to_string(method).into_owned(),
        compress: headers.is_compressed(),
        headers,
        body: body.map(Body::Bytes),
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::compress::compress;
    use crate::types::{ActionOption, HeaderValue, MessageClass};

    #[test]
    fn ok_response() {
        let response = parse_response(b"SPAMD/1.5 0 EX_OK\r\n\r\n").unwrap();

        assert_eq!(response.protocol_version, "1.5");
        assert_eq!(response.status, StatusCode::ExOk);
        assert_eq!(response.status.description(), "No problems");
        assert_eq!(response.message, "EX_OK");
        assert!(response.headers.is_empty());
        assert_eq!(response.body, None);
    }

    #[test]
    fn response_without_separator() {
        let response = parse_response(b"SPAMD/1.5 0 EX_OK").unwrap();

        assert_eq!(response.message, "EX_OK");
        assert_eq!(response.body, None);
    }

    #[test]
    fn response_with_headers_and_body() {
        let raw = b"SPAMD/1.5 0 EX_OK\r\n\
            Spam: True ; 1000.0 / 5.0\r\n\
            Content-length: 10\r\n\
            \r\n\
            Test body\n";
        let response = parse_response(raw).unwrap();

        assert_eq!(
            response.headers.iter().map(HeaderValue::name).collect::<Vec<_>>(),
            vec!["Spam", "Content-length"]
        );
        assert_eq!(
            response.headers.get("Spam"),
            Some(&HeaderValue::generic("Spam", "True ; 1000.0 / 5.0"))
        );
        assert_eq!(response.headers.content_length(), Some(10));
        assert_eq!(response.body.as_deref(), Some(&b"Test body\n"[..]));
    }

    #[test]
    fn compressed_body_is_decompressed() {
        let mut raw = b"SPAMD/1.5 0 EX_OK\r\nCompress: zlib\r\n\r\n".to_vec();
        raw.extend_from_slice(&compress(b"Test body\n"));

        let response = parse_response(&raw).unwrap();

        assert!(response.headers.is_compressed());
        assert_eq!(response.body.as_deref(), Some(&b"Test body\n"[..]));
    }

    #[test]
    fn large_compressed_body() {
        let body = b"Test body\n".repeat(100);
        let mut raw = b"SPAMD/1.5 0 EX_OK\r\nCompress: zlib\r\n\r\n".to_vec();
        raw.extend_from_slice(&compress(&body));

        let response = parse_response(&raw).unwrap();

        assert_eq!(response.body, Some(body));
    }

    #[test]
    fn compressed_empty_body_is_none() {
        let mut raw = b"SPAMD/1.5 0 EX_OK\r\nCompress:\r\n\r\n".to_vec();
        raw.extend_from_slice(&compress(b""));

        assert_eq!(parse_response(&raw).unwrap().body, None);
    }

    #[test]
    fn corrupt_compressed_body() {
        let raw = b"SPAMD/1.5 0 EX_OK\r\nCompress:\r\n\r\nTest body\n";

        match parse_response(raw) {
            Err(Error::CorruptCompressedBody(_)) => {}
            other => panic!("Expected a corrupt body error, got {:?}", other),
        }
    }

    #[test]
    fn not_a_response() {
        let inputs: &[&[u8]] = &[
            b"",
            b"\r\n\r\n",
            b"HTTP/1.1 200 OK\r\n\r\n",
            b"SPAMC/1.5 0 EX_OK\r\n\r\n",
            b"SPAMD/1.5 0\r\n\r\n",
            b"SPAMD/1 0 EX_OK\r\n\r\n",
            b"SPAMD/1.5 EX_OK\r\n\r\n",
            b"SPAMD/1.5 -1 EX_OK\r\n\r\n",
            b" SPAMD/1.5 0 EX_OK\r\n\r\n",
            b"\xff\xfe\x00garbage",
        ];

        for input in inputs {
            assert_eq!(parse_response(input), Err(Error::NotAResponse), "{:?}", input);
        }
    }

    #[test]
    fn unknown_status_code() {
        assert_eq!(
            parse_response(b"SPAMD/1.5 80 EX_WHAT\r\n\r\n"),
            Err(Error::UnknownStatusCode(80))
        );
        assert_eq!(
            parse_response(b"SPAMD/1.5 1 EX_WHAT\r\n\r\n"),
            Err(Error::UnknownStatusCode(1))
        );
    }

    #[test]
    fn status_code_overflow() {
        match parse_response(b"SPAMD/1.5 99999999999 EX_OK\r\n\r\n") {
            Err(Error::MalformedStatusLine(line)) => {
                assert_eq!(line, "SPAMD/1.5 99999999999 EX_OK")
            }
            other => panic!("Expected a malformed status line, got {:?}", other),
        }
    }

    #[test]
    fn error_status_still_parses() {
        let response = parse_response(b"SPAMD/1.5 79 EX_TIMEOUT\r\n\r\n").unwrap();

        assert_eq!(response.status, StatusCode::ExTimeout);
        assert_eq!(response.status.description(), "Read timeout");
        assert_eq!(response.error_for_status().unwrap_err().message, "EX_TIMEOUT");
    }

    #[test]
    fn message_keeps_inner_spaces() {
        let response = parse_response(b"SPAMD/1.5   76   Bad header line: x \r\n\r\n").unwrap();

        assert_eq!(response.status, StatusCode::ExProtocol);
        assert_eq!(response.message, "Bad header line: x");
    }

    #[test]
    fn blank_header_lines_are_skipped() {
        let response = parse_response(b"SPAMD/1.5 0 EX_OK\r\nA: 1\r\n \r\nB: 2\r\n").unwrap();

        assert_eq!(response.headers.len(), 2);
    }

    #[test]
    fn malformed_header_is_an_error() {
        assert_eq!(
            parse_response(b"SPAMD/1.5 0 EX_OK\r\nnot a header\r\n\r\n"),
            Err(Error::MalformedHeader {
                line: "not a header".to_owned(),
                cause: None
            })
        );
    }

    #[test]
    fn invalid_header_value_is_malformed_header() {
        assert_eq!(
            parse_response(b"SPAMD/1.5 0 EX_OK\r\nContent-length: ten\r\n\r\n"),
            Err(Error::MalformedHeader {
                line: "Content-length: ten".to_owned(),
                cause: Some(Box::new(Error::InvalidInteger("ten".to_owned())))
            })
        );
    }

    #[test]
    fn lookup_ignores_case_of_known_names() {
        let response =
            parse_response(b"SPAMD/1.5 0 EX_OK\r\ncontent-length: 5\r\n\r\nhello").unwrap();

        assert_eq!(
            response.headers.get("content-length"),
            Some(&HeaderValue::ContentLength(5))
        );
        assert_eq!(response.headers.content_length(), Some(5));
    }

    #[test]
    fn duplicate_headers_keep_last() {
        let response =
            parse_response(b"SPAMD/1.5 0 EX_OK\r\nUser: a\r\nX: 1\r\nuser: b\r\n\r\n").unwrap();

        assert_eq!(response.headers.len(), 2);
        assert_eq!(response.headers.user().as_deref(), Some("b"));
    }

    #[test]
    fn request() {
        let mut raw = b"TELL SPAMC/1.5\r\n\
            Message-class: spam\r\n\
            Set: local\r\n\
            Compress:\r\n\
            \r\n"
            .to_vec();
        raw.extend_from_slice(&compress(b"Test body\n"));

        let request = parse_request(&raw).unwrap();

        assert_eq!(request.method, "TELL");
        assert!(request.compress);
        assert_eq!(request.headers.message_class(), Some(MessageClass::Spam));
        assert_eq!(request.headers.set(), Some(ActionOption::LOCAL));
        assert_eq!(request.body, Some(Body::Bytes(b"Test body\n".to_vec())));
    }

    #[test]
    fn not_a_request() {
        let inputs: &[&[u8]] = &[
            b"",
            b"TEST\r\n\r\n",
            b"TEST SPAMD/1.5\r\n\r\n",
            b"TEST SPAMC/1.5 extra\r\n\r\n",
            b"SPAMD/1.5 0 EX_OK\r\n\r\n",
        ];

        for input in inputs {
            assert_eq!(parse_request(input), Err(Error::NotARequest), "{:?}", input);
        }
    }
}
