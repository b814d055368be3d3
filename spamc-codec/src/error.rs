use crate::compress::CorruptStream;

use std::{error, fmt};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The first line isn't a `SPAMD/<version> <status> <message>` line
    NotAResponse,
    /// The first line isn't a `<method> SPAMC/<version>` line
    NotARequest,
    MalformedStatusLine(String),
    UnknownStatusCode(u32),
    MalformedHeader {
        line: String,
        cause: Option<Box<Error>>,
    },
    InvalidInteger(String),
    InvalidMessageClass(String),
    InvalidActionFlag(String),
    CorruptCompressedBody(CorruptStream),
}

impl Error {
    pub(crate) fn malformed_header(line: &str) -> Self {
        Self::MalformedHeader {
            line: line.to_owned(),
            cause: None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::NotAResponse => write!(f, "not a SPAMD response"),
            Self::NotARequest => write!(f, "not a SPAMC request"),
            Self::MalformedStatusLine(line) => {
                write!(f, "malformed status line {:?}", line)
            }
            Self::UnknownStatusCode(code) => {
                write!(f, "unknown status code {}", code)
            }
            Self::MalformedHeader { line, cause: None } => {
                write!(f, "malformed header {:?}", line)
            }
            Self::MalformedHeader {
                line,
                cause: Some(cause),
            } => write!(f, "malformed header {:?}: {}", line, cause),
            Self::InvalidInteger(v) => write!(f, "{:?} is not an integer", v),
            Self::InvalidMessageClass(v) => {
                write!(f, "{:?} is not a message class, expected ham or spam", v)
            }
            Self::InvalidActionFlag(v) => {
                write!(f, "{:?} is not an action, expected local or remote", v)
            }
            Self::CorruptCompressedBody(e) => {
                write!(f, "unable to decompress body: {}", e)
            }
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::MalformedHeader {
                cause: Some(cause), ..
            } => Some(cause.as_ref()),
            Self::CorruptCompressedBody(e) => Some(e),
            _ => None,
        }
    }
}

impl std::convert::From<CorruptStream> for Error {
    fn from(e: CorruptStream) -> Self {
        Self::CorruptCompressedBody(e)
    }
}
