use crate::error::{Error, Result};
use crate::parser::is_header_name;
use crate::types::{HeaderValue, Headers};

/// Render a header as `<Name>: <value>\r\n`, or `<Name>:\r\n` when it has no
/// value
pub fn serialize_header(header: &HeaderValue) -> Result<Vec<u8>> {
    let name = header.name();
    let value = header.value_string();

    if !is_header_name(name) || value.contains(|c: char| c == '\r' || c == '\n') {
        return Err(Error::malformed_header(&format!("{}: {}", name, value)));
    }

    let line = if value.is_empty() {
        format!("{}:\r\n", name)
    } else {
        format!("{}: {}\r\n", name, value)
    };

    Ok(line.into_bytes())
}

pub fn encode_headers(headers: &Headers) -> Result<Vec<u8>> {
    let encoded: Result<Vec<Vec<u8>>> = headers.iter().map(serialize_header).collect();
    Ok(encoded?.concat())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::types::{ActionOption, MessageClass};

    #[test]
    fn known_headers() {
        let cases = vec![
            (HeaderValue::ContentLength(10), "Content-length: 10\r\n"),
            (HeaderValue::Compress, "Compress:\r\n"),
            (
                HeaderValue::MessageClass(MessageClass::Ham),
                "Message-class: ham\r\n",
            ),
            (HeaderValue::Set(ActionOption::BOTH), "Set: local, remote\r\n"),
            (HeaderValue::Remove(ActionOption::LOCAL), "Remove: local\r\n"),
            (HeaderValue::User("alice".to_owned()), "User: alice\r\n"),
            (HeaderValue::generic("X-Header", "value"), "X-Header: value\r\n"),
        ];

        for (header, expected) in cases {
            assert_eq!(serialize_header(&header).unwrap(), expected.as_bytes());
        }
    }

    #[test]
    fn empty_action_has_no_value() {
        assert_eq!(
            serialize_header(&HeaderValue::Set(ActionOption::default())).unwrap(),
            b"Set:\r\n"
        );
    }

    #[test]
    fn refuses_to_break_the_wire_format() {
        serialize_header(&HeaderValue::generic("X-Header", "a\r\nInjected: 1")).unwrap_err();
        serialize_header(&HeaderValue::User("bob\n".to_owned())).unwrap_err();
        serialize_header(&HeaderValue::generic("Bad Name", "v")).unwrap_err();
        serialize_header(&HeaderValue::generic("", "v")).unwrap_err();
    }

    #[test]
    fn headers_in_order() {
        let headers: Headers = vec![
            HeaderValue::generic("X-Header", "value"),
            HeaderValue::generic("X-Header2", "value2"),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            encode_headers(&headers).unwrap(),
            b"X-Header: value\r\nX-Header2: value2\r\n".to_vec()
        );
    }
}
