use std::{error, fmt};

/// Reasons a raw request buffer can fail to parse.
///
/// Every variant is recovered at the dispatch boundary and surfaced to the
/// client as the generic 400 response; the variant itself only reaches the
/// logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The buffer is not valid UTF-8.
    InvalidEncoding,
    /// The request line is empty or lacks a URI token.
    InvalidRequestLine,
    /// The path component failed percent-decoding.
    InvalidPath,
    /// A header line before the blank line contains no colon.
    InvalidHeader,
    /// A form parameter is not exactly `key=value` with a non-empty key.
    InvalidFormParam,
}

impl error::Error for ParseError {}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::InvalidEncoding => write!(f, "request buffer is not valid UTF-8"),
            ParseError::InvalidRequestLine => write!(f, "malformed request line"),
            ParseError::InvalidPath => write!(f, "malformed percent-encoding in path"),
            ParseError::InvalidHeader => write!(f, "header line without a colon"),
            ParseError::InvalidFormParam => write!(f, "malformed form parameter"),
        }
    }
}
