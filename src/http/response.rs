//! HTTP/1.1 response builder and wire serialization.

use bytes::{BufMut, Bytes, BytesMut};

use super::{Headers, StatusCode};

/// An HTTP/1.1 response, ready to be serialized and sent.
///
/// Built fluently and serialized with [`into_bytes`](Self::into_bytes), which
/// writes the status line, headers, an automatic `Content-Length`, and the
/// `Connection` header.
///
/// # Examples
///
/// ```
/// use webroot::http::{Response, StatusCode};
///
/// let response = Response::new(StatusCode::Ok)
///     .content_type("text/html")
///     .body("<h1>hi</h1>");
/// let bytes = response.into_bytes();
/// let text = std::str::from_utf8(&bytes).unwrap();
/// assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
/// assert!(text.contains("Content-Type: text/html\r\n"));
/// ```
#[derive(Debug)]
pub struct Response {
    status: StatusCode,
    headers: Headers,
    body: Bytes,
    keep_alive: bool,
}

impl Response {
    /// Creates a response with the given status and an empty body.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Headers::new(),
            body: Bytes::new(),
            keep_alive: true,
        }
    }

    /// Appends a response header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Sets the `Content-Type` header.
    #[must_use]
    pub fn content_type(self, value: impl Into<String>) -> Self {
        self.header("Content-Type", value)
    }

    /// Sets the response body from a string.
    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Bytes::from(body.into());
        self
    }

    /// Sets the response body from raw bytes.
    #[must_use]
    pub fn body_bytes(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Builds an HTML response: status, `Content-Type: text/html`, body.
    pub fn html(status: StatusCode, body: impl Into<String>) -> Self {
        Self::new(status).content_type("text/html").body(body)
    }

    /// Controls the `Connection: keep-alive` / `Connection: close` header.
    #[must_use]
    pub fn keep_alive(mut self, keep_alive: bool) -> Self {
        self.keep_alive = keep_alive;
        self
    }

    /// Returns the status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the body bytes.
    pub fn body_ref(&self) -> &Bytes {
        &self.body
    }

    /// Serializes the response into HTTP/1.1 wire format.
    ///
    /// `Content-Type: text/plain; charset=utf-8` is added when the body is
    /// non-empty and no content type was set. `Content-Length` is always
    /// written, as is `Connection`.
    pub fn into_bytes(mut self) -> BytesMut {
        let content_length = self.body.len();

        if !self.body.is_empty() && !self.headers.contains("content-type") {
            self.headers
                .insert("Content-Type", "text/plain; charset=utf-8");
        }

        let connection = if self.keep_alive { "keep-alive" } else { "close" };
        self.headers.insert("Connection", connection);

        let estimated = 128 + self.headers.len() * 48 + content_length;
        let mut buf = BytesMut::with_capacity(estimated);

        buf.put(format!("HTTP/1.1 {}\r\n", self.status).as_bytes());
        for (name, value) in self.headers.iter() {
            buf.put(format!("{name}: {value}\r\n").as_bytes());
        }
        buf.put(format!("Content-Length: {content_length}\r\n").as_bytes());
        buf.put(&b"\r\n"[..]);
        buf.put(self.body.as_ref());

        buf
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new(StatusCode::Ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_string(bytes: BytesMut) -> String {
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn simple_ok_response() {
        let r = Response::new(StatusCode::Ok).body("Hello");
        let s = to_string(r.into_bytes());
        assert!(s.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(s.contains("Content-Length: 5\r\n"));
        assert!(s.ends_with("\r\n\r\nHello"));
    }

    #[test]
    fn html_helper_sets_content_type() {
        let r = Response::html(StatusCode::NotFound, "<p>gone</p>");
        assert_eq!(r.status(), StatusCode::NotFound);
        let s = to_string(r.into_bytes());
        assert!(s.starts_with("HTTP/1.1 404 Not Found\r\n"));
        assert!(s.contains("Content-Type: text/html\r\n"));
    }

    #[test]
    fn default_content_type_for_plain_body() {
        let r = Response::new(StatusCode::Ok).body("ok");
        let s = to_string(r.into_bytes());
        assert!(s.contains("Content-Type: text/plain; charset=utf-8\r\n"));
    }

    #[test]
    fn empty_body_no_content_type() {
        let r = Response::new(StatusCode::Ok);
        let s = to_string(r.into_bytes());
        assert!(!s.contains("Content-Type"));
        assert!(s.contains("Content-Length: 0\r\n"));
    }

    #[test]
    fn connection_close() {
        let r = Response::new(StatusCode::Ok).keep_alive(false);
        let s = to_string(r.into_bytes());
        assert!(s.contains("Connection: close\r\n"));
    }

    #[test]
    fn binary_body_preserved() {
        let payload: Vec<u8> = vec![0x89, b'P', b'N', b'G', 0x00];
        let r = Response::new(StatusCode::Ok)
            .content_type("image/png")
            .body_bytes(payload.clone());
        let bytes = r.into_bytes();
        assert!(bytes.ends_with(&payload));
    }
}
