use crate::{
    errors::ParseError,
    http::query::{self, ParamMap},
    http::types::Method,
};
use memchr::memchr;
use memchr::memmem;
use percent_encoding::percent_decode_str;
use std::collections::HashMap;

/// A parsed HTTP request.
///
/// Built once from the single read buffer of a connection and dropped when
/// the connection closes, so every component is owned.
///
/// # Input data requirements
///
/// The entire buffer must be valid `UTF-8`; the parser rejects anything else
/// before touching `&str`. Lines are terminated by `CRLF` exactly.
///
/// ## First line
///
/// ```text
/// [METHOD] SP [PATH] (SP [VERSION])? CRLF
/// ```
///
/// The method token is never rejected: unknown tokens parse to
/// [`Method::Unsupported`] and get answered with `501`. The path token is
/// required. The version token is stored but otherwise ignored; responses
/// are always `HTTP/1.1`.
///
/// ## Headers
///
/// Each line up to the first blank line splits on its FIRST colon, with both
/// sides trimmed. A line without a colon fails the whole request. Duplicate
/// names keep the last value.
///
/// ## Body
///
/// Only POST bodies are examined. The body is everything after the blank
/// line, clipped to `Content-Length` when that header is present and within
/// range, and must parse as strict `key=value&key=value` form data.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    method: Method,
    path: String,
    version: String,

    query: ParamMap,
    headers: HashMap<String, String>,
    form: ParamMap,
}

// Public API
impl Request {
    #[inline(always)]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Percent-decoded path component, leading slash preserved.
    #[inline(always)]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Raw version token from the request line (`"HTTP/1.1"` if omitted).
    #[inline(always)]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Decoded query parameters; repeated keys accumulate in order.
    #[inline(always)]
    pub const fn query(&self) -> &ParamMap {
        &self.query
    }

    /// Raw form parameters from a POST body; empty for other methods.
    #[inline(always)]
    pub const fn form(&self) -> &ParamMap {
        &self.form
    }

    /// Returns a header value with case-insensitive name matching
    /// (per [RFC 7230](https://tools.ietf.org/html/rfc7230#section-3.2)).
    /// Uses linear search.
    #[inline]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

impl Request {
    /// Parses one raw request buffer.
    pub fn parse(raw: &[u8]) -> Result<Self, ParseError> {
        let text = simdutf8::basic::from_utf8(raw).map_err(|_| ParseError::InvalidEncoding)?;

        // Head and body split at the first blank line. A buffer without one
        // is all head (a bare request line still parses).
        let (head, body) = match memmem::find(raw, b"\r\n\r\n") {
            Some(pos) => (&text[..pos], &text[pos + 4..]),
            None => (text, ""),
        };

        let mut lines = head.split("\r\n");
        let request_line = lines.next().unwrap_or("");

        let (method, path, version, query) = Self::parse_request_line(request_line)?;

        let mut headers = HashMap::new();
        for line in lines {
            if line.is_empty() {
                break;
            }

            let colon = memchr(b':', line.as_bytes()).ok_or(ParseError::InvalidHeader)?;
            let name = line[..colon].trim();
            let value = line[colon + 1..].trim();

            // Last write wins on duplicate names.
            headers.insert(name.to_owned(), value.to_owned());
        }

        let mut request = Request {
            method,
            path,
            version,
            query,
            headers,
            form: ParamMap::new(),
        };

        if method == Method::Post {
            request.form = query::parse_form(request.clip_body(body))?;
        }

        Ok(request)
    }

    #[inline]
    fn parse_request_line(line: &str) -> Result<(Method, String, String, ParamMap), ParseError> {
        let mut tokens = line.split_ascii_whitespace();

        let method_token = tokens.next().ok_or(ParseError::InvalidRequestLine)?;
        let uri = tokens.next().ok_or(ParseError::InvalidRequestLine)?;
        let version = tokens.next().unwrap_or("HTTP/1.1");

        let (raw_path, raw_query) = match uri.split_once('?') {
            Some((path, query)) => (path, query),
            None => (uri, ""),
        };

        let path = percent_decode_str(raw_path)
            .decode_utf8()
            .map_err(|_| ParseError::InvalidPath)?
            .into_owned();

        Ok((
            Method::from_token(method_token),
            path,
            version.to_owned(),
            query::parse_query(raw_query),
        ))
    }

    // Clips the body to Content-Length when the header carries a usable
    // value; a missing, malformed, or out-of-range length leaves the body
    // as read.
    #[inline]
    fn clip_body<'a>(&self, body: &'a str) -> &'a str {
        let Some(len) = self.header("Content-Length").and_then(|v| v.parse().ok()) else {
            return body;
        };

        match body.get(..len) {
            Some(clipped) => clipped,
            None => body,
        }
    }
}
