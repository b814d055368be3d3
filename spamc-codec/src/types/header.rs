use indexmap::IndexMap;

use std::fmt;

pub const CONTENT_LENGTH: &str = "Content-length";
pub const COMPRESS: &str = "Compress";
pub const MESSAGE_CLASS: &str = "Message-class";
pub const SET: &str = "Set";
pub const REMOVE: &str = "Remove";
pub const USER: &str = "User";

const KNOWN_NAMES: &[&str] = &[CONTENT_LENGTH, COMPRESS, MESSAGE_CLASS, SET, REMOVE, USER];

/// The spelling a header is stored under. Known names match in any case,
/// anything else is kept as given.
pub fn canonical_name(name: &str) -> &str {
    KNOWN_NAMES
        .iter()
        .find(|known| known.eq_ignore_ascii_case(name))
        .copied()
        .unwrap_or(name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageClass {
    Ham,
    Spam,
}

impl MessageClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ham => "ham",
            Self::Spam => "spam",
        }
    }
}

impl fmt::Display for MessageClass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which databases a `Set` or `Remove` header applies to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ActionOption {
    pub local: bool,
    pub remote: bool,
}

impl ActionOption {
    pub const LOCAL: Self = Self {
        local: true,
        remote: false,
    };
    pub const REMOTE: Self = Self {
        local: false,
        remote: true,
    };
    pub const BOTH: Self = Self {
        local: true,
        remote: true,
    };

    pub fn is_empty(&self) -> bool {
        !self.local && !self.remote
    }
}

impl fmt::Display for ActionOption {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let flags: Vec<&str> = [(self.local, "local"), (self.remote, "remote")]
            .iter()
            .filter(|(set, _)| *set)
            .map(|(_, name)| *name)
            .collect();

        f.write_str(&flags.join(", "))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum HeaderValue {
    /// Length of the body as it appears on the wire
    ContentLength(u64),
    /// Presence only, the body on the wire is zlib compressed
    Compress,
    MessageClass(MessageClass),
    Set(ActionOption),
    Remove(ActionOption),
    User(String),
    /// Anything not listed above, passed through untouched
    Generic { name: String, value: String },
}

impl HeaderValue {
    pub fn generic(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Generic {
            name: name.into(),
            value: value.into(),
        }
    }

    /// The name this header is written with
    pub fn name(&self) -> &str {
        match self {
            Self::ContentLength(_) => CONTENT_LENGTH,
            Self::Compress => COMPRESS,
            Self::MessageClass(_) => MESSAGE_CLASS,
            Self::Set(_) => SET,
            Self::Remove(_) => REMOVE,
            Self::User(_) => USER,
            Self::Generic { name, .. } => name,
        }
    }

    /// The value text as written on the wire, empty for `Compress`
    pub fn value_string(&self) -> String {
        match self {
            Self::ContentLength(len) => len.to_string(),
            Self::Compress => String::new(),
            Self::MessageClass(class) => class.to_string(),
            Self::Set(action) | Self::Remove(action) => action.to_string(),
            Self::User(name) => name.clone(),
            Self::Generic { value, .. } => value.clone(),
        }
    }
}

macro_rules! header_value_from {
    ($variant:ident, $type:ty) => {
        impl std::convert::From<$type> for HeaderValue {
            fn from(value: $type) -> Self {
                Self::$variant(value)
            }
        }
    };
}

header_value_from!(ContentLength, u64);
header_value_from!(MessageClass, MessageClass);

/// Headers of a request or response, in wire order. Assigning a name twice
/// keeps the position of the first assignment and the value of the last.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    headers: IndexMap<String, HeaderValue>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a header under its own name, returning the value it replaced
    pub fn insert(&mut self, value: HeaderValue) -> Option<HeaderValue> {
        self.headers.insert(value.name().to_owned(), value)
    }

    /// Parse `value` using the grammar for `name` before inserting it
    pub fn insert_str(
        &mut self,
        name: &str,
        value: &str,
    ) -> crate::Result<Option<HeaderValue>> {
        let value = crate::parser::parse_header_value(name, value)?;
        Ok(self.insert(value))
    }

    pub fn get(&self, name: &str) -> Option<&HeaderValue> {
        self.headers.get(canonical_name(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.headers.contains_key(canonical_name(name))
    }

    pub fn remove(&mut self, name: &str) -> Option<HeaderValue> {
        self.headers.shift_remove(canonical_name(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &HeaderValue> {
        self.headers.values()
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    pub fn is_compressed(&self) -> bool {
        self.contains(COMPRESS)
    }
}

macro_rules! header_accessors {
    ($(($fn_name:ident, $header:ident, $variant:ident, $type:ty));+$(;)*) => {
        impl Headers {
            $(
                pub fn $fn_name(&self) -> Option<$type> {
                    match self.get($header)? {
                        HeaderValue::$variant(v) => Some(v.clone()),
                        _ => None,
                    }
                }
            )+
        }
    }
}

header_accessors! {
    (content_length, CONTENT_LENGTH, ContentLength, u64);
    (message_class, MESSAGE_CLASS, MessageClass, MessageClass);
    (set, SET, Set, ActionOption);
    (remove_action, REMOVE, Remove, ActionOption);
    (user, USER, User, String);
}

impl std::iter::FromIterator<HeaderValue> for Headers {
    fn from_iter<I: IntoIterator<Item = HeaderValue>>(iter: I) -> Self {
        let mut headers = Headers::new();
        iter.into_iter().for_each(|h| {
            headers.insert(h);
        });
        headers
    }
}

impl<'a> IntoIterator for &'a Headers {
    type Item = &'a HeaderValue;
    type IntoIter = indexmap::map::Values<'a, String, HeaderValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.headers.values()
    }
}
