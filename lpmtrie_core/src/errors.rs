//! Error handling and stable error codes for lpmtrie

use crate::types::Prefix;
use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Text that is not a dotted-quad address or an `A.B.C.D/M` prefix.
    Parse {
        input: String,
        reason: &'static str,
    },
    /// Mask length outside `0..=32`.
    InvalidMask(u32),
    /// The canonical prefix is already stored; carries the existing record.
    DuplicatePrefix(Prefix),
    /// The node arena cannot be addressed by a 32-bit offset any more.
    CapacityExceeded,
    Io(String),
    /// Any of the above, raised while reading the given 1-based input line.
    AtLine { line: usize, source: Box<Error> },
}

impl Error {
    pub(crate) fn parse(input: &str, reason: &'static str) -> Self {
        Error::Parse {
            input: input.to_owned(),
            reason,
        }
    }

    pub(crate) fn at_line(self, line: usize) -> Self {
        Error::AtLine {
            line,
            source: Box::new(self),
        }
    }

    pub fn code(&self) -> ErrorCode {
        map_error(self)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parse { input, reason } => write!(f, "cannot parse {input:?}: {reason}"),
            Error::InvalidMask(len) => write!(f, "invalid mask length /{len} (expected 0..=32)"),
            Error::DuplicatePrefix(p) => write!(f, "duplicate prefix {p}"),
            Error::CapacityExceeded => write!(f, "trie node capacity exceeded"),
            Error::Io(msg) => write!(f, "I/O error: {msg}"),
            Error::AtLine { line, source } => write!(f, "line {line}: {source}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::AtLine { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorCode {
    ParseError = 2,
    InvalidMask = 3,
    DuplicatePrefix = 4,
    IoError = 5,
    CapacityExceeded = 6,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::ParseError => "Parse error",
            ErrorCode::InvalidMask => "Invalid mask length",
            ErrorCode::DuplicatePrefix => "Duplicate prefix",
            ErrorCode::IoError => "I/O error",
            ErrorCode::CapacityExceeded => "Capacity exceeded",
        }
    }
}

// Map internal Error to ErrorCode; line context does not change the code.
pub fn map_error(e: &Error) -> ErrorCode {
    match e {
        Error::AtLine { source, .. } => map_error(source),
        Error::Parse { .. } => ErrorCode::ParseError,
        Error::InvalidMask(_) => ErrorCode::InvalidMask,
        Error::DuplicatePrefix(_) => ErrorCode::DuplicatePrefix,
        Error::CapacityExceeded => ErrorCode::CapacityExceeded,
        Error::Io(_) => ErrorCode::IoError,
    }
}
