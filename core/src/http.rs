//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The core
//! crate builds `HttpRequest` values and classifies `HttpResponse` values; the
//! `Dispatcher` in `dispatch.rs` is the only place that touches the network.
//!
//! A `RawOutcome` is either a transport failure or a received response. The
//! response body is `None` when no bytes were received at all.

use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_8};

use crate::error::TransportError;

/// HTTP method for a request. GraphQL operations are always posted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Post,
}

impl HttpMethod {
    pub const fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Post => "POST",
        }
    }
}

/// An HTTP request described as plain data.
///
/// Built by a `RequestBuilder`. Dispatchers execute it and report the
/// corresponding `RawOutcome`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl HttpResponse {
    /// True for any 2xx status code.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// The lowercased `charset` parameter of the `Content-Type` header, if any.
    pub fn charset(&self) -> Option<String> {
        self.header("content-type").and_then(charset_param)
    }
}

/// What a dispatcher reports back for a single request.
pub type RawOutcome = Result<HttpResponse, TransportError>;

pub(crate) fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

pub(crate) fn charset_param(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        if !key.trim().eq_ignore_ascii_case("charset") {
            return None;
        }
        let value = value.trim().trim_matches('"');
        (!value.is_empty()).then(|| value.to_ascii_lowercase())
    })
}

/// Decode `bytes` as text in the given charset label, falling back to UTF-8
/// for absent or unrecognized labels. Returns `None` when the bytes are not
/// valid in that encoding.
pub(crate) fn decode_text(bytes: &[u8], charset: Option<&str>) -> Option<String> {
    let encoding = charset
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(UTF_8);
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(Cow::into_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, headers: &[(&str, &str)]) -> HttpResponse {
        HttpResponse {
            status,
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body: None,
        }
    }

    #[test]
    fn success_range_is_2xx_only() {
        assert!(response(200, &[]).is_success());
        assert!(response(204, &[]).is_success());
        assert!(response(299, &[]).is_success());
        assert!(!response(199, &[]).is_success());
        assert!(!response(300, &[]).is_success());
        assert!(!response(404, &[]).is_success());
    }

    #[test]
    fn header_lookup_ignores_case() {
        let resp = response(200, &[("Content-Type", "application/json")]);
        assert_eq!(resp.header("content-type"), Some("application/json"));
        assert_eq!(resp.header("CONTENT-TYPE"), Some("application/json"));
        assert_eq!(resp.header("accept"), None);
    }

    #[test]
    fn charset_is_parsed_from_content_type() {
        let resp = response(200, &[("content-type", "text/plain; charset=\"ISO-8859-1\"")]);
        assert_eq!(resp.charset().as_deref(), Some("iso-8859-1"));

        let resp = response(200, &[("content-type", "application/json")]);
        assert_eq!(resp.charset(), None);
    }

    #[test]
    fn decode_text_handles_latin1_and_utf8() {
        assert_eq!(decode_text(&[0x63, 0x61, 0x66, 0xe9], Some("iso-8859-1")).as_deref(), Some("café"));
        assert_eq!(decode_text("café".as_bytes(), None).as_deref(), Some("café"));
        assert_eq!(decode_text(&[0xff, 0xfe], Some("utf-8")), None);
    }

    #[test]
    fn decode_text_handles_utf16() {
        assert_eq!(decode_text(&[0x68, 0x00, 0x69, 0x00], Some("utf-16le")).as_deref(), Some("hi"));
        assert_eq!(decode_text(&[0x00, 0x68, 0x00, 0x69], Some("utf-16be")).as_deref(), Some("hi"));
        // Lone high surrogate.
        assert_eq!(decode_text(&[0x00, 0xd8], Some("utf-16le")), None);
    }

    #[test]
    fn decode_text_handles_windows_1252() {
        assert_eq!(decode_text(&[0x80, 0x35], Some("windows-1252")).as_deref(), Some("€5"));
    }

    #[test]
    fn decode_text_handles_multibyte_legacy_charsets() {
        assert_eq!(decode_text(&[0x93, 0xfa, 0x96, 0x7b], Some("shift_jis")).as_deref(), Some("日本"));
    }

    #[test]
    fn unknown_charset_falls_back_to_utf8() {
        assert_eq!(decode_text(b"plain", Some("x-unknown")).as_deref(), Some("plain"));
        assert_eq!(decode_text(&[0xc3, 0x28], Some("x-unknown")), None);
    }
}
