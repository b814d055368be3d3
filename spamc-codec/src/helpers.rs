use nom::{bytes::complete::take_until, IResult};

use std::borrow::Cow;

/// The blank line between the header block and the body
pub const SEPARATOR: &[u8] = b"\r\n\r\n";

/// Split a message at the first blank line. An empty body counts as no body.
pub fn split_message(raw: &[u8]) -> (&[u8], Option<&[u8]>) {
    let head: IResult<&[u8], &[u8]> = take_until(SEPARATOR)(raw);

    match head {
        Ok((rest, head)) => {
            let body = &rest[SEPARATOR.len()..];
            (head, Some(body).filter(|b| !b.is_empty()))
        }
        Err(_) => (raw, None),
    }
}

/// Lines of a header block, terminated by `\r\n` or a bare `\n`
pub fn lines(block: &[u8]) -> impl Iterator<Item = &[u8]> {
    block
        .split(|&c| c == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
}

pub fn u8_to_string(i: &[u8]) -> Cow<str> {
    String::from_utf8_lossy(i)
}
