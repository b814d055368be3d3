//! Encoder and parser for the SPAMC/SPAMD protocol spoken by SpamAssassin's
//! spamd. Nothing here does I/O, requests are turned into bytes and complete
//! buffered responses are turned back into values.

pub mod compress;
pub mod encoder;
mod error;
mod helpers;
pub mod parser;
pub mod types;

pub use encoder::{encode_request, encode_response};
pub use error::{Error, Result};
pub use parser::{parse_request, parse_response};
pub use types::{
    to_error, ActionOption, Body, ErrorClass, HeaderValue, Headers, MessageClass,
    Request, Response, StatusCode, StatusError,
};

/// The only protocol version this crate speaks
pub const SPAMC_VERSION: &str = "1.5";
