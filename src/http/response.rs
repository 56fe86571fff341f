//! HTTP response builder.

use crate::http::types::StatusCode;

/// HTTP response builder for constructing server responses.
///
/// Provides a fluent interface for building responses with a status code,
/// headers, and body. Every response starts from the fixed base header set
/// (`Server: CrudeServer`, `Content-Type: text/html`); [`header()`]
/// overrides a base header instead of duplicating it.
///
/// [`header()`]: Response::header
///
/// # Examples
/// ```
/// use crude_server::{Response, StatusCode};
///
/// let bytes = Response::new(StatusCode::Ok)
///     .header("Content-Type", "text/plain")
///     .body("Done")
///     .into_bytes();
///
/// assert!(bytes.starts_with(b"HTTP/1.1 200 OK\r\n"));
/// assert!(bytes.ends_with(b"\r\n\r\nDone"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    status: StatusCode,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl Response {
    /// Creates a response with the given status and the base header set.
    #[inline]
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: vec![
                ("Server".to_owned(), "CrudeServer".to_owned()),
                ("Content-Type".to_owned(), "text/html".to_owned()),
            ],
            body: Vec::new(),
        }
    }

    /// Sets a header, replacing an existing one with the same name
    /// (ASCII case-insensitive) or appending otherwise.
    #[inline]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        match self
            .headers
            .iter_mut()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
        {
            Some(entry) => *entry = (name.to_owned(), value.to_owned()),
            None => self.headers.push((name.to_owned(), value.to_owned())),
        }

        self
    }

    /// Sets the response body.
    #[inline]
    pub fn body<B: Into<Vec<u8>>>(mut self, body: B) -> Self {
        self.body = body.into();
        self
    }

    /// Serializes the response to wire format.
    ///
    /// Emits the status line, every header line, a blank line, and the
    /// body. The blank line is present even when the body is empty.
    #[inline]
    pub fn into_bytes(self) -> Vec<u8> {
        let mut buffer = Vec::with_capacity(128 + self.body.len());

        buffer.extend_from_slice(self.status.first_line().as_bytes());
        for (name, value) in &self.headers {
            buffer.extend_from_slice(name.as_bytes());
            buffer.extend_from_slice(b": ");
            buffer.extend_from_slice(value.as_bytes());
            buffer.extend_from_slice(b"\r\n");
        }
        buffer.extend_from_slice(b"\r\n");
        buffer.extend_from_slice(&self.body);

        buffer
    }
}
