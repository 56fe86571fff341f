//! URL query and form-body parameter parsing.

use crate::errors::ParseError;
use memchr::{memchr, memchr_iter};
use std::collections::HashMap;

/// Multi-valued parameter map: repeated keys accumulate in arrival order.
pub type ParamMap = HashMap<String, Vec<String>>;

/// Parses a URL query string into a multi-valued map.
///
/// Standard `application/x-www-form-urlencoded` decoding applies: `+`
/// becomes a space and percent-escapes are expanded. Pairs with an empty
/// key or an empty value are dropped, so `?a=1&flag&b=` yields only `a`.
///
/// # Examples
/// ```
/// use crude_server::query::parse_query;
///
/// let params = parse_query("x=1&x=2&name=John+Doe");
/// assert_eq!(params["x"], ["1", "2"]);
/// assert_eq!(params["name"], ["John Doe"]);
/// ```
#[inline]
pub fn parse_query(raw: &str) -> ParamMap {
    let mut params = ParamMap::new();

    for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
        if key.is_empty() || value.is_empty() {
            continue;
        }

        params
            .entry(key.into_owned())
            .or_default()
            .push(value.into_owned());
    }

    params
}

/// Parses a POST body in `key=value&key=value` form.
///
/// Stricter than [`parse_query`]: every `&`-separated parameter must
/// contain exactly one `=` and a non-empty key, otherwise the whole body
/// is rejected. Values are kept as received, with no percent or `+`
/// decoding.
///
/// # Examples
/// ```
/// use crude_server::query::parse_form;
///
/// let form = parse_form("name=John+Doe&mis=123").unwrap();
/// assert_eq!(form["name"], ["John+Doe"]);
///
/// assert!(parse_form("broken").is_err());
/// assert!(parse_form("a=b=c").is_err());
/// ```
#[inline]
pub fn parse_form(raw: &str) -> Result<ParamMap, ParseError> {
    let mut params = ParamMap::new();

    if raw.is_empty() {
        return Ok(params);
    }

    for param in raw.split('&') {
        let bytes = param.as_bytes();

        if memchr_iter(b'=', bytes).count() != 1 {
            return Err(ParseError::InvalidFormParam);
        }

        // Single '=' guaranteed above.
        let split = match memchr(b'=', bytes) {
            Some(pos) => pos,
            None => return Err(ParseError::InvalidFormParam),
        };

        let (key, value) = (&param[..split], &param[split + 1..]);
        if key.is_empty() {
            return Err(ParseError::InvalidFormParam);
        }

        params
            .entry(key.to_owned())
            .or_default()
            .push(value.to_owned());
    }

    Ok(params)
}
