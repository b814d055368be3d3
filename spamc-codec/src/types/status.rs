use std::{convert::TryFrom, error, fmt};

/// Broad grouping of the sysexits style codes spamd answers with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    Ok,
    ClientError,
    ServerError,
    TemporaryError,
    ProtocolError,
    PermissionError,
    ConfigError,
    TimeoutError,
}

macro_rules! status_codes {
    ($name:ident, $(($camel_name:ident, $code:literal, $symbol:literal, $class:ident, $description:literal));+$(;)*) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $(
                $camel_name,
            )+
        }

        pub const STATUS_CODES: &[$name] = &[$($name::$camel_name,)+];

        impl TryFrom<u32> for $name {
            type Error = crate::Error;

            fn try_from(code: u32) -> Result<Self, crate::Error> {
                match code {
                    $(
                        $code => Ok($name::$camel_name),
                    )+
                    c => Err(crate::Error::UnknownStatusCode(c)),
                }
            }
        }

        impl $name {
            pub fn code(&self) -> u32 {
                match self {
                    $(
                        Self::$camel_name => $code,
                    )+
                }
            }

            /// The symbolic name, `EX_OK`, `EX_USAGE`, ...
            pub fn name(&self) -> &'static str {
                match self {
                    $(
                        Self::$camel_name => $symbol,
                    )+
                }
            }

            pub fn description(&self) -> &'static str {
                match self {
                    $(
                        Self::$camel_name => $description,
                    )+
                }
            }

            pub fn class(&self) -> ErrorClass {
                match self {
                    $(
                        Self::$camel_name => ErrorClass::$class,
                    )+
                }
            }
        }
    }
}

status_codes! {
    StatusCode,
    (ExOk, 0, "EX_OK", Ok, "No problems");
    (ExUsage, 64, "EX_USAGE", ClientError, "Command line usage error");
    (ExDataErr, 65, "EX_DATAERR", ClientError, "Data format error");
    (ExNoInput, 66, "EX_NOINPUT", ClientError, "Cannot open input");
    (ExNoUser, 67, "EX_NOUSER", ClientError, "Addressee unknown");
    (ExNoHost, 68, "EX_NOHOST", ClientError, "Host name unknown");
    (ExUnavailable, 69, "EX_UNAVAILABLE", ServerError, "Service unavailable");
    (ExSoftware, 70, "EX_SOFTWARE", ServerError, "Internal software error");
    (ExOsErr, 71, "EX_OSERR", ServerError, "System error");
    (ExOsFile, 72, "EX_OSFILE", ServerError, "Critical OS file missing");
    (ExCantCreat, 73, "EX_CANTCREAT", ServerError, "Can't create output file");
    (ExIoErr, 74, "EX_IOERR", ServerError, "Input/output error");
    (ExTempFail, 75, "EX_TEMPFAIL", TemporaryError, "Temp failure; retry invited");
    (ExProtocol, 76, "EX_PROTOCOL", ProtocolError, "Remote protocol error");
    (ExNoPerm, 77, "EX_NOPERM", PermissionError, "Permission denied");
    (ExConfig, 78, "EX_CONFIG", ConfigError, "Configuration error");
    (ExTimeout, 79, "EX_TIMEOUT", TimeoutError, "Read timeout");
}

impl StatusCode {
    pub fn is_ok(&self) -> bool {
        *self == StatusCode::ExOk
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.code(), self.name())
    }
}

/// A status code turned into an error, along with the message spamd sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusError {
    pub status: StatusCode,
    pub message: String,
}

impl StatusError {
    pub fn description(&self) -> &'static str {
        self.status.description()
    }

    pub fn class(&self) -> ErrorClass {
        self.status.class()
    }
}

impl fmt::Display for StatusError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "spamd returned {} ({}): {}",
            self.status,
            self.description(),
            self.message
        )
    }
}

impl error::Error for StatusError {}

pub fn to_error(status: StatusCode, message: &str) -> StatusError {
    StatusError {
        status,
        message: message.to_owned(),
    }
}
