//! Core HTTP protocol types and utilities

// METHOD

/// HTTP request methods understood by the dispatcher.
///
/// # References
///
/// - [RFC 7231, Section 4](https://datatracker.ietf.org/doc/html/rfc7231#section-4)
///
/// Any other method token parses to [`Method::Unsupported`], which the
/// dispatcher answers with `501 Not Implemented`. Parsing never fails on the
/// method token itself.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Method {
    /// OPTIONS method - describe the communication options for the target resource
    /// [[RFC7231, Section 4.3.7](https://tools.ietf.org/html/rfc7231#section-4.3.7)]
    Options,
    /// GET method - transfer a current representation of the target resource
    /// [[RFC7231, Section 4.3.1](https://tools.ietf.org/html/rfc7231#section-4.3.1)]
    Get,
    /// POST method - perform resource-specific processing on the request payload
    /// [[RFC7231, Section 4.3.3](https://tools.ietf.org/html/rfc7231#section-4.3.3)]
    Post,
    /// DELETE method - remove all current representations of the target resource
    /// [[RFC7231, Section 4.3.5](https://tools.ietf.org/html/rfc7231#section-4.3.5)]
    Delete,
    /// Everything else, including valid HTTP methods this server never
    /// implements (HEAD, PUT, PATCH, ...).
    Unsupported,
}

impl Method {
    #[inline(always)]
    pub(crate) fn from_token(token: &str) -> Self {
        match token {
            "OPTIONS" => Method::Options,
            "GET" => Method::Get,
            "POST" => Method::Post,
            "DELETE" => Method::Delete,
            _ => Method::Unsupported,
        }
    }
}

// STATUS_CODE

macro_rules! set_status_codes {
    ($(
        $(#[$docs:meta])+
        $name:ident = ($num:expr, $str:expr);
    )+) => {
        /// HTTP status codes emitted by this server.
        ///
        /// Only the codes the dispatcher can actually produce are listed;
        /// reason phrases follow
        /// [RFC 9110](https://datatracker.ietf.org/doc/html/rfc9110#section-15).
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum StatusCode { $(
            #[doc = concat!(stringify!($num), " ", $str)]
            $(#[$docs])+
            $name = $num,
        )+ }

        impl StatusCode {
            // Returns the HTTP first line (e.g., `"HTTP/1.1 200 OK\r\n"`).
            // Responses are always stamped HTTP/1.1 regardless of the
            // version token the client sent.
            #[inline]
            pub(crate) const fn first_line(&self) -> &'static str {
                match self { $(
                    StatusCode::$name => concat!("HTTP/1.1 ", $num, " ", $str, "\r\n"),
                )+ }
            }
        }
    }
}

set_status_codes! {
    /// [[RFC9110, Section 15.3.1](https://datatracker.ietf.org/doc/html/rfc9110#section-15.3.1)]
    Ok = (200, "OK");
    /// [[RFC9110, Section 15.5.1](https://datatracker.ietf.org/doc/html/rfc9110#section-15.5.1)]
    BadRequest = (400, "Bad Request");
    /// [[RFC9110, Section 15.5.5](https://datatracker.ietf.org/doc/html/rfc9110#section-15.5.5)]
    NotFound = (404, "Not Found");
    /// [[RFC9110, Section 15.6.2](https://datatracker.ietf.org/doc/html/rfc9110#section-15.6.2)]
    NotImplemented = (501, "Not Implemented");
}

// CONTENT TYPE

/// Best-effort content-type guess from the file extension.
///
/// Unknown and missing extensions fall back to `text/html`, the same
/// default every handler-built response carries.
#[inline]
pub fn guess_content_type(path: &str) -> &'static str {
    let ext = match path.rsplit_once('.') {
        Some((_, ext)) => ext,
        None => return "text/html",
    };

    match ext {
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "js" => "text/javascript",
        "json" => "application/json",
        "txt" => "text/plain",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        _ => "text/html",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_tokens() {
        #[rustfmt::skip]
        let cases = [
            ("OPTIONS", Method::Options),
            ("GET",     Method::Get),
            ("POST",    Method::Post),
            ("DELETE",  Method::Delete),
            ("PATCH",   Method::Unsupported),
            ("HEAD",    Method::Unsupported),
            ("get",     Method::Unsupported),
            ("",        Method::Unsupported),
        ];

        for (token, expected) in cases {
            assert_eq!(Method::from_token(token), expected, "token: {token:?}");
        }
    }

    #[test]
    fn status_first_lines() {
        #[rustfmt::skip]
        let cases = [
            (StatusCode::Ok,             "HTTP/1.1 200 OK\r\n"),
            (StatusCode::BadRequest,     "HTTP/1.1 400 Bad Request\r\n"),
            (StatusCode::NotFound,       "HTTP/1.1 404 Not Found\r\n"),
            (StatusCode::NotImplemented, "HTTP/1.1 501 Not Implemented\r\n"),
        ];

        for (status, expected) in cases {
            assert_eq!(status.first_line(), expected);
        }
    }

    #[test]
    fn content_type_guess() {
        #[rustfmt::skip]
        let cases = [
            ("index.html",      "text/html"),
            ("page.htm",        "text/html"),
            ("style.css",       "text/css"),
            ("app.js",          "text/javascript"),
            ("data.json",       "application/json"),
            ("notes.txt",       "text/plain"),
            ("logo.png",        "image/png"),
            ("photo.jpg",       "image/jpeg"),
            ("photo.jpeg",      "image/jpeg"),
            ("anim.gif",        "image/gif"),
            ("icon.svg",        "image/svg+xml"),
            ("favicon.ico",     "image/x-icon"),
            ("archive.tar.gz",  "text/html"),
            ("no_extension",    "text/html"),
            ("",                "text/html"),
        ];

        for (path, expected) in cases {
            assert_eq!(guess_content_type(path), expected, "path: {path:?}");
        }
    }
}
