use crate::error::{Error, Result};
use crate::types::header::*;

use log::trace;

/// Split a `<name>:<value>` line and parse the value with the grammar of the
/// named header
pub fn parse_header_line(line: &str) -> Result<HeaderValue> {
    let (name, value) = match line.find(':') {
        Some(i) => (line[..i].trim(), line[i + 1..].trim()),
        None => return Err(Error::malformed_header(line)),
    };

    if !is_header_name(name) {
        return Err(Error::malformed_header(line));
    }

    parse_header_value(name, value)
}

pub fn is_header_name(name: &str) -> bool {
    !name.is_empty()
        && !name
            .chars()
            .any(|c| c == ':' || c.is_whitespace() || c.is_control())
}

macro_rules! parse_header_value_builder {
    ($($header:ident => $parse:expr),+$(,)*) => {
        /// Dispatch on the case-insensitive header name, unknown names become
        /// `HeaderValue::Generic`
        pub fn parse_header_value(name: &str, value: &str) -> Result<HeaderValue> {
            $(
                if name.eq_ignore_ascii_case($header) {
                    return $parse(value.trim());
                }
            )+

            trace!("No grammar for header {:?}, passing it through", name);
            Ok(HeaderValue::generic(name, value.trim()))
        }
    }
}

parse_header_value_builder! {
    CONTENT_LENGTH => |v: &str| -> Result<HeaderValue> {
        Ok(HeaderValue::ContentLength(parse_content_length(v)?))
    },
    COMPRESS => |_: &str| -> Result<HeaderValue> { Ok(HeaderValue::Compress) },
    MESSAGE_CLASS => |v: &str| -> Result<HeaderValue> {
        Ok(HeaderValue::MessageClass(parse_message_class(v)?))
    },
    SET => |v: &str| -> Result<HeaderValue> {
        Ok(HeaderValue::Set(parse_action_option(v)?))
    },
    REMOVE => |v: &str| -> Result<HeaderValue> {
        Ok(HeaderValue::Remove(parse_action_option(v)?))
    },
    USER => |v: &str| -> Result<HeaderValue> { Ok(HeaderValue::User(v.to_owned())) },
}

pub fn parse_content_length(v: &str) -> Result<u64> {
    // u64::from_str accepts a leading '+'
    if v.is_empty() || !v.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidInteger(v.to_owned()));
    }

    v.parse().map_err(|_| Error::InvalidInteger(v.to_owned()))
}

pub fn parse_message_class(v: &str) -> Result<MessageClass> {
    if v.eq_ignore_ascii_case("ham") {
        Ok(MessageClass::Ham)
    } else if v.eq_ignore_ascii_case("spam") {
        Ok(MessageClass::Spam)
    } else {
        Err(Error::InvalidMessageClass(v.to_owned()))
    }
}

pub fn parse_action_option(v: &str) -> Result<ActionOption> {
    v.split(',')
        .map(str::trim)
        .filter(|flag| !flag.is_empty())
        .try_fold(ActionOption::default(), |mut action, flag| {
            if flag.eq_ignore_ascii_case("local") {
                action.local = true;
            } else if flag.eq_ignore_ascii_case("remote") {
                action.remote = true;
            } else {
                return Err(Error::InvalidActionFlag(flag.to_owned()));
            }
            Ok(action)
        })
}
