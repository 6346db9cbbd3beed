//! HTTP/1.1 protocol types and parsing.
//!
//! The transport-level primitives: [`Method`], [`StatusCode`], [`Headers`],
//! [`Request`], and [`Response`]. The file-serving logic never touches raw
//! sockets; it sees a parsed [`Request`] and produces a [`Response`].

use std::fmt;

pub mod headers;
pub mod request;
pub mod response;

pub use headers::Headers;
pub use request::Request;
pub use response::Response;

/// The subset of HTTP status codes this server emits.
///
/// # Examples
///
/// ```
/// use webroot::http::StatusCode;
///
/// assert_eq!(StatusCode::NotFound.as_u16(), 404);
/// assert_eq!(StatusCode::NotFound.reason(), "Not Found");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum StatusCode {
    Ok = 200,
    BadRequest = 400,
    NotFound = 404,
    MethodNotAllowed = 405,
    PayloadTooLarge = 413,
    InternalServerError = 500,
}

impl StatusCode {
    /// Returns the numeric status code.
    pub fn as_u16(self) -> u16 {
        self as u16
    }

    /// Returns the canonical reason phrase.
    pub fn reason(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::BadRequest => "Bad Request",
            Self::NotFound => "Not Found",
            Self::MethodNotAllowed => "Method Not Allowed",
            Self::PayloadTooLarge => "Payload Too Large",
            Self::InternalServerError => "Internal Server Error",
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.reason())
    }
}

/// An HTTP request method.
///
/// The server routes `GET` and `POST`; every other method parses into
/// [`Method::Other`] and is rejected with `405 Method Not Allowed` at the
/// service layer rather than at parse time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Other(String),
}

impl Method {
    /// Returns the method as a string slice.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Other(s) => s.as_str(),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Method {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "GET" => Self::Get,
            "POST" => Self::Post,
            other => Self::Other(other.to_owned()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_code_display() {
        assert_eq!(StatusCode::Ok.to_string(), "200 OK");
        assert_eq!(StatusCode::InternalServerError.to_string(), "500 Internal Server Error");
    }

    #[test]
    fn method_parse_known() {
        let m: Method = "GET".parse().unwrap();
        assert_eq!(m, Method::Get);
        let m: Method = "POST".parse().unwrap();
        assert_eq!(m, Method::Post);
    }

    #[test]
    fn method_parse_other() {
        let m: Method = "DELETE".parse().unwrap();
        assert_eq!(m, Method::Other("DELETE".to_owned()));
        assert_eq!(m.as_str(), "DELETE");
    }

    #[test]
    fn head_is_not_a_routed_method() {
        let m: Method = "HEAD".parse().unwrap();
        assert_eq!(m, Method::Other("HEAD".to_owned()));
    }
}
