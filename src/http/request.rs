//! HTTP/1.1 request parsing using the [`httparse`] crate.

use std::str;

use bytes::Bytes;
use thiserror::Error;

use super::{Headers, Method};

/// Errors that can occur while parsing an HTTP/1.1 request.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("request is incomplete — more data needed")]
    Incomplete,

    #[error("HTTP parse error: {0}")]
    Parse(#[from] httparse::Error),

    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("request path must start with '/'")]
    InvalidPath,
}

/// A fully parsed HTTP/1.1 request.
///
/// Created by [`Request::parse`] from a raw byte buffer and immutable
/// thereafter. The path is split from its query string; a file server has no
/// use for query parameters, but a `?` must not end up in a filesystem path.
///
/// # Examples
///
/// ```
/// use webroot::http::Request;
///
/// let raw = b"GET /docs/readme.txt HTTP/1.1\r\nHost: localhost\r\n\r\n";
/// let (request, _offset) = Request::parse(raw).unwrap();
/// assert_eq!(request.method().as_str(), "GET");
/// assert_eq!(request.path(), "/docs/readme.txt");
/// ```
#[derive(Debug)]
pub struct Request {
    method: Method,
    path: String,
    /// HTTP minor version: 0 for HTTP/1.0, 1 for HTTP/1.1.
    version: u8,
    headers: Headers,
    query: Option<String>,
    body: Bytes,
}

impl Request {
    /// Maximum number of headers accepted per request.
    const MAX_HEADERS: usize = 64;

    /// Parse a raw HTTP/1.1 request from a byte slice.
    ///
    /// Returns the parsed `Request` and the byte offset at which the body
    /// begins in `buf` (immediately after the `\r\n\r\n` header terminator).
    /// The body slice after that offset is copied into the request; callers
    /// that buffer incrementally should re-parse once
    /// `buf.len() >= offset + content_length`.
    ///
    /// # Errors
    ///
    /// - [`RequestError::Incomplete`] — the header block is not yet complete.
    /// - [`RequestError::Parse`] — the data is malformed.
    /// - [`RequestError::MissingField`] — method, path, or version is absent.
    /// - [`RequestError::InvalidPath`] — the path does not start with `/`.
    pub fn parse(buf: &[u8]) -> Result<(Self, usize), RequestError> {
        let mut headers = [httparse::EMPTY_HEADER; Self::MAX_HEADERS];
        let mut raw = httparse::Request::new(&mut headers);

        let body_offset = match raw.parse(buf)? {
            httparse::Status::Complete(offset) => offset,
            httparse::Status::Partial => return Err(RequestError::Incomplete),
        };

        let method: Method = raw
            .method
            .ok_or(RequestError::MissingField { field: "method" })?
            .parse()
            .unwrap(); // Infallible

        let target = raw
            .path
            .ok_or(RequestError::MissingField { field: "path" })?;
        if !target.starts_with('/') {
            return Err(RequestError::InvalidPath);
        }

        let (path, query) = match target.find('?') {
            Some(pos) => (
                target[..pos].to_owned(),
                Some(target[pos + 1..].to_owned()),
            ),
            None => (target.to_owned(), None),
        };

        let version = raw
            .version
            .ok_or(RequestError::MissingField { field: "version" })?;

        let mut header_map = Headers::with_capacity(raw.headers.len());
        for header in raw.headers.iter() {
            if let Ok(value) = str::from_utf8(header.value) {
                header_map.insert(header.name, value);
            }
        }

        // Trim the body to Content-Length so pipelined bytes from a
        // following request are not captured.
        let raw_body = &buf[body_offset..];
        let declared = header_map
            .get("content-length")
            .and_then(|v| v.parse::<usize>().ok());
        let body = match declared {
            Some(n) if raw_body.len() > n => Bytes::copy_from_slice(&raw_body[..n]),
            _ => Bytes::copy_from_slice(raw_body),
        };

        Ok((
            Self {
                method,
                path,
                version,
                headers: header_map,
                query,
                body,
            },
            body_offset,
        ))
    }

    /// Returns the HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request path without the query string.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the HTTP minor version (0 = HTTP/1.0, 1 = HTTP/1.1).
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Returns the request headers.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Returns the raw query string without the leading `?`, if any.
    pub fn query_string(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Returns the request body bytes.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Returns `true` if the connection should be kept alive after this
    /// request. HTTP/1.1 defaults to keep-alive; HTTP/1.0 defaults to close.
    pub fn is_keep_alive(&self) -> bool {
        match self.headers.get("connection") {
            Some(conn) => conn.eq_ignore_ascii_case("keep-alive"),
            None => self.version == 1,
        }
    }

    /// Returns the `Content-Length` header parsed as a `usize`, if present.
    pub fn content_length(&self) -> Option<usize> {
        self.headers.get("content-length")?.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_get() {
        let raw = b"GET /index.html HTTP/1.1\r\nHost: localhost\r\n\r\n";
        let (req, offset) = Request::parse(raw).unwrap();
        assert_eq!(req.method(), &Method::Get);
        assert_eq!(req.path(), "/index.html");
        assert_eq!(req.version(), 1);
        assert_eq!(req.headers().get("host"), Some("localhost"));
        assert_eq!(offset, raw.len()); // no body
    }

    #[test]
    fn query_string_split_off_path() {
        let raw = b"GET /search?q=rust HTTP/1.1\r\nHost: x\r\n\r\n";
        let (req, _) = Request::parse(raw).unwrap();
        assert_eq!(req.path(), "/search");
        assert_eq!(req.query_string(), Some("q=rust"));
    }

    #[test]
    fn incomplete_request() {
        let raw = b"GET / HTTP/1.1\r\nHost:";
        assert!(matches!(Request::parse(raw), Err(RequestError::Incomplete)));
    }

    #[test]
    fn path_must_be_absolute() {
        let raw = b"GET index.html HTTP/1.1\r\nHost: x\r\n\r\n";
        assert!(matches!(
            Request::parse(raw),
            Err(RequestError::InvalidPath)
        ));
    }

    #[test]
    fn post_body_and_content_length() {
        let raw = b"POST /echo HTTP/1.1\r\nHost: x\r\nContent-Length: 5\r\n\r\nhello";
        let (req, body_offset) = Request::parse(raw).unwrap();
        assert_eq!(req.method(), &Method::Post);
        assert_eq!(req.content_length(), Some(5));
        assert_eq!(&raw[body_offset..], b"hello");
        assert_eq!(req.body().as_ref(), b"hello");
    }

    #[test]
    fn keep_alive_defaults() {
        let raw = b"GET / HTTP/1.1\r\nHost: x\r\n\r\n";
        let (req, _) = Request::parse(raw).unwrap();
        assert!(req.is_keep_alive());

        let raw = b"GET / HTTP/1.1\r\nHost: x\r\nConnection: close\r\n\r\n";
        let (req, _) = Request::parse(raw).unwrap();
        assert!(!req.is_keep_alive());
    }
}
