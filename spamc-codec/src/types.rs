pub mod header;
pub mod status;

pub use header::{ActionOption, HeaderValue, Headers, MessageClass};
pub use status::{to_error, ErrorClass, StatusCode, StatusError, STATUS_CODES};

use derivative::Derivative;

use std::fmt;

/// Body of a request, either raw bytes or text which is sent as UTF-8
#[derive(Derivative, Clone, PartialEq, Eq)]
#[derivative(Debug)]
pub enum Body {
    Bytes(#[derivative(Debug(format_with = "lossy_body"))] Vec<u8>),
    Text(String),
}

impl Body {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Bytes(b) => b,
            Self::Text(s) => s.as_bytes(),
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Bytes(b) => b,
            Self::Text(s) => s.into_bytes(),
        }
    }
}

macro_rules! body_from {
    ($variant:ident, $type:ty) => {
        impl std::convert::From<$type> for Body {
            fn from(value: $type) -> Self {
                Self::$variant(value.into())
            }
        }
    };
}

body_from!(Bytes, Vec<u8>);
body_from!(Bytes, &[u8]);
body_from!(Text, String);
body_from!(Text, &str);

#[allow(clippy::ptr_arg)]
fn lossy_body(body: &Vec<u8>, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{:?}", String::from_utf8_lossy(body))
}

fn lossy_opt_body(body: &Option<Vec<u8>>, f: &mut fmt::Formatter) -> fmt::Result {
    match body {
        Some(b) => write!(f, "Some({:?})", String::from_utf8_lossy(b)),
        None => write!(f, "None"),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: String,
    pub headers: Headers,
    pub body: Option<Body>,
    /// Compress the body on the wire, same as adding a `Compress` header
    pub compress: bool,
}

impl Request {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            headers: Headers::new(),
            body: None,
            compress: false,
        }
    }

    pub fn header(mut self, value: HeaderValue) -> Self {
        self.headers.insert(value);
        self
    }

    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    pub fn user(self, name: impl Into<String>) -> Self {
        self.header(HeaderValue::User(name.into()))
    }

    pub fn message_class(self, class: MessageClass) -> Self {
        self.header(HeaderValue::MessageClass(class))
    }

    pub fn set(self, action: ActionOption) -> Self {
        self.header(HeaderValue::Set(action))
    }

    pub fn remove(self, action: ActionOption) -> Self {
        self.header(HeaderValue::Remove(action))
    }

    /// Whether the body will be compressed on the wire
    pub fn is_compressed(&self) -> bool {
        self.compress || self.headers.is_compressed()
    }
}

#[derive(Derivative, Clone, PartialEq, Eq)]
#[derivative(Debug)]
pub struct Response {
    pub protocol_version: String,
    pub status: StatusCode,
    pub message: String,
    pub headers: Headers,
    /// Always the decompressed body
    #[derivative(Debug(format_with = "lossy_opt_body"))]
    pub body: Option<Vec<u8>>,
}

impl Response {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            protocol_version: crate::SPAMC_VERSION.to_owned(),
            status,
            message: message.into(),
            headers: Headers::new(),
            body: None,
        }
    }

    pub fn header(mut self, value: HeaderValue) -> Self {
        self.headers.insert(value);
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn to_error(&self) -> StatusError {
        to_error(self.status, &self.message)
    }

    /// `Err` carrying the status and message unless spamd answered `EX_OK`
    pub fn error_for_status(&self) -> Result<&Self, StatusError> {
        if self.status.is_ok() {
            Ok(self)
        } else {
            Err(self.to_error())
        }
    }
}
